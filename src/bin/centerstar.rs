//! Command-line interface for the `centerstar` crate.
//!
//! Subcommands are implemented in separate files under `src/bin/centerstar/`:
//! - `pair_cmd.rs`: one global pairwise alignment
//! - `msa_cmd.rs`: center-star multiple alignment
//!
use std::io::Write;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};

#[derive(Debug, Parser)]
#[command(name="centerstar", version=env!("CARGO_PKG_VERSION"), about="Center-star multiple sequence alignment", disable_help_subcommand=true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Specify multiple times to increase verbosity (e.g. -vv for debug output).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbosity: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Needleman–Wunsch global alignment of two sequences.
    Pair(pair_cmd::PairCmd),
    /// Center-star multiple alignment of a sequence set.
    Msa(msa_cmd::MsaCmd),
}

#[path = "centerstar/inputs.rs"] mod inputs;
#[path = "centerstar/pair_cmd.rs"] mod pair_cmd;
#[path = "centerstar/msa_cmd.rs"] mod msa_cmd;

fn init_verbose(verbosity: u8) {
    let filter_level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match level {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };
            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(cli.verbosity);
    let name = match cli.command {
        Command::Pair(_) => "pair",
        Command::Msa(_) => "msa",
    };
    log::info!("Running {}-{} [{name}]", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    match cli.command {
        Command::Pair(cmd) => pair_cmd::run(cmd)?,
        Command::Msa(cmd) => msa_cmd::run(cmd)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}
