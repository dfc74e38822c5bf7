use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use centerstar::*;

use crate::inputs::{emit, read_fasta, MatrixArgs};

/// Options for the `pair` subcommand.
#[derive(Debug, Args)]
pub struct PairCmd {
    /// A-sequence FASTA file (first record used).
    #[arg(long, value_name="FILE")]
    pub asequence: PathBuf,
    /// B-sequence FASTA file (first record used).
    #[arg(long, value_name="FILE")]
    pub bsequence: PathBuf,
    #[command(flatten)]
    pub matrix: MatrixArgs,
    /// Score added per gap column.
    #[arg(long, default_value_t=-4, allow_negative_numbers=true)]
    pub gap: i32,
    /// Score leading gaps too (classic Needleman–Wunsch borders).
    #[arg(long)]
    pub penalize_end_gaps: bool,
    /// Output file for the alignment report (stdout if omitted).
    #[arg(long, value_name="FILE")]
    pub outfile: Option<PathBuf>,
}

pub fn run(cmd: PairCmd) -> Result<()> {
    let first = |path: &PathBuf| -> Result<Sequence> {
        read_fasta(path)?.into_iter().next().with_context(|| format!("no FASTA records in {}", path.display()))
    };
    let a = first(&cmd.asequence)?;
    let b = first(&cmd.bsequence)?;
    let table = cmd.matrix.load()?;
    let params = AlignParams {
        gap_penalty: cmd.gap,
        end_gaps: if cmd.penalize_end_gaps { EndGaps::Penalized } else { EndGaps::Free },
    };

    let aln = align(&a, &b, &table, &params)?;
    log::info!("{} vs {}: score {}, {} columns", a.name(), b.name(), aln.score, aln.len());
    emit(cmd.outfile.as_deref(), &format_pairwise(a.name(), b.name(), &aln))
}
