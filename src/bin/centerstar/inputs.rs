//! Options and file readers shared by the subcommands.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use centerstar::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MatrixChoice { Blosum62, Dna }

/// Substitution matrix selection.
#[derive(Debug, Args)]
pub struct MatrixArgs {
    /// Built-in scoring matrix to use.
    #[arg(long, value_enum, default_value_t=MatrixChoice::Blosum62)]
    pub matrix: MatrixChoice,
    /// DNA match score (when --matrix dna).
    #[arg(long, default_value_t=1, allow_negative_numbers=true)]
    pub match_score: i32,
    /// DNA mismatch score (when --matrix dna).
    #[arg(long, default_value_t=-1, allow_negative_numbers=true)]
    pub mismatch: i32,
    /// Matrix file in NCBI/EMBOSS text format; overrides --matrix.
    #[arg(long, value_name="FILE")]
    pub datafile: Option<PathBuf>,
}

impl MatrixArgs {
    pub fn load(&self) -> Result<SubstitutionMatrix> {
        if let Some(path) = &self.datafile {
            let text = std::fs::read_to_string(path).with_context(|| format!("open matrix: {}", path.display()))?;
            let matrix = SubstitutionMatrix::from_ncbi_str(&text).with_context(|| format!("parse matrix: {}", path.display()))?;
            log::info!("loaded {}x{} matrix from {}", matrix.alphabet().len(), matrix.alphabet().len(), path.display());
            return Ok(matrix);
        }
        Ok(match self.matrix {
            MatrixChoice::Blosum62 => SubstitutionMatrix::blosum62(),
            MatrixChoice::Dna => SubstitutionMatrix::dna(self.match_score, self.mismatch),
        })
    }
}

/// Read every record of a FASTA file; fails on files without records.
pub fn read_fasta(path: &Path) -> Result<Vec<Sequence>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("open FASTA: {}", path.display()))?;
    let recs = parse_fasta(&text);
    if recs.is_empty() { anyhow::bail!("no FASTA records in {}", path.display()); }
    log::debug!("read {} records from {}", recs.len(), path.display());
    Ok(recs)
}

/// Write `text` to `path`, or to stdout when no path is given.
pub fn emit(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(p) => std::fs::write(p, text).with_context(|| format!("write {}", p.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
