use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use centerstar::*;

use crate::inputs::{emit, read_fasta, MatrixArgs};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat { Simple, Fasta }

/// Options for the `msa` subcommand.
#[derive(Debug, Args)]
pub struct MsaCmd {
    /// Multi-FASTA file with the sequences to align.
    #[arg(long, value_name="FILE", required_unless_present="demo")]
    pub input: Option<PathBuf>,
    /// Align the built-in retroviral reference set instead of a file.
    #[arg(long, conflicts_with="input")]
    pub demo: bool,
    #[command(flatten)]
    pub matrix: MatrixArgs,
    /// Score added per gap column.
    #[arg(long, default_value_t=-4, allow_negative_numbers=true)]
    pub gap: i32,
    /// Alignment output format.
    #[arg(long, value_enum, default_value_t=OutputFormat::Simple)]
    pub format: OutputFormat,
    /// Line width for FASTA output (0 = no wrapping).
    #[arg(long, default_value_t=60)]
    pub width: usize,
    /// Append a majority consensus line with this threshold (0.0..=1.0).
    #[arg(long, value_name="FRACTION")]
    pub consensus: Option<f64>,
    /// Output file for the alignment (stdout if omitted).
    #[arg(long, value_name="FILE")]
    pub outfile: Option<PathBuf>,
    /// Write the score matrix as TSV.
    #[arg(long, value_name="TSV")]
    pub distances: Option<PathBuf>,
}

pub fn run(cmd: MsaCmd) -> Result<()> {
    let seqs = match &cmd.input {
        Some(path) => read_fasta(path)?,
        None => reference_dataset(),
    };
    let table = cmd.matrix.load()?;
    if let Some(t) = cmd.consensus {
        if !(0.0..=1.0).contains(&t) { anyhow::bail!("--consensus must be within 0.0..=1.0, got {t}"); }
    }

    let start = Instant::now();
    let result = center_star(&seqs, &table, cmd.gap)?;
    log::info!("aligned {} sequences in {} ms", seqs.len(), start.elapsed().as_millis());
    log::info!("sum-of-pairs score: {}", result.alignment.sum_of_pairs(&table, cmd.gap));

    let mut out = match cmd.format {
        OutputFormat::Simple => format!("{}\n{}", format_distance_matrix(&result.distances), format_alignment(&result.alignment)),
        OutputFormat::Fasta => format_fasta(&result.alignment, cmd.width),
    };
    if let Some(t) = cmd.consensus {
        let cons = result.alignment.consensus(t);
        match cmd.format {
            OutputFormat::Simple => out.push_str(&format!("         {:>5}: {}\n", "cons", cons)),
            OutputFormat::Fasta => out.push_str(&format!(">consensus\n{cons}\n")),
        }
    }
    emit(cmd.outfile.as_deref(), &out)?;

    if let Some(path) = &cmd.distances {
        let mut w = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)
            .with_context(|| format!("create {}", path.display()))?;
        let mut header = vec![String::new()];
        header.extend(seqs.iter().map(|s| s.name().to_string()));
        w.write_record(&header)?;
        for (seq, row) in seqs.iter().zip(result.distances.rows()) {
            let mut record = vec![seq.name().to_string()];
            record.extend(row.iter().map(i32::to_string));
            w.write_record(&record)?;
        }
        w.flush()?;
    }
    Ok(())
}
