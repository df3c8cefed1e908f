//! Strobe CLI — binds a circuit to its trace sinks and runs the
//! interactive simulation loop.
//!
//! `strobe run` opens the waveform trace (and optional tee transcript),
//! instantiates the selected circuit, and serves the line-oriented command
//! protocol on stdin/stdout. `strobe signals` lists a circuit's signal
//! names, widths, and roles.

#![warn(missing_docs)]

mod circuits;
mod run;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// Strobe — a cycle-accurate circuit simulation runtime.
#[derive(Parser, Debug)]
#[command(name = "strobe", version, about = "Strobe circuit simulator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `strobe.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an interactive simulation session.
    Run(RunArgs),
    /// List a circuit's signals.
    Signals(SignalsArgs),
}

/// Arguments for the `strobe run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Circuit to simulate.
    #[arg(long)]
    pub circuit: Option<String>,

    /// Waveform trace output path.
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Transcript echo output path.
    #[arg(long)]
    pub tee: Option<PathBuf>,

    /// Seed for the fill generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Clock divisor (global ticks per circuit evaluation).
    #[arg(long)]
    pub divisor: Option<u64>,
}

/// Arguments for the `strobe signals` subcommand.
#[derive(Parser, Debug)]
pub struct SignalsArgs {
    /// Circuit to describe.
    #[arg(long)]
    pub circuit: Option<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Signals(ref args) => run::signals(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
