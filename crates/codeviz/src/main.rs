//! CodeViz - Heuristic Execution Tracer
//!
//! Approximates the step-by-step runtime behavior of short programs without
//! executing them, and renders the resulting trace as JSON or as a textual
//! playback.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

use codeviz_tracer::TracerConfig;

mod cmd;

/// Command-line interface for CodeViz
#[derive(Debug, Parser)]
#[command(name = "codeviz")]
#[command(about = "CodeViz - step-by-step heuristic execution tracing for short programs")]
#[command(version)]
pub struct Cli {
    /// Surface grammar to trace with ("brace"/"java" or "indent"/"python");
    /// inferred from the file extension when omitted
    #[arg(long, global = true, env = "CODEVIZ_GRAMMAR")]
    pub grammar: Option<String>,

    /// Ceiling on replayed loop iterations
    #[arg(long, default_value = "5", env = "CODEVIZ_MAX_LOOP_ITERATIONS")]
    pub max_loop_iterations: usize,

    /// Also write logs to a file under the system temp directory
    #[arg(long)]
    pub log_to_file: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Trace a source file and print the snapshot list as JSON
    Trace {
        /// Source file to trace
        file: PathBuf,
    },
    /// Trace a source file and print a step-by-step textual playback
    Play {
        /// Source file to trace
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    codeviz_common::logging::init_logging("codeviz", cli.log_to_file)?;

    let config = TracerConfig { max_loop_iterations: cli.max_loop_iterations };

    match &cli.command {
        Commands::Trace { file } => {
            tracing::info!(file = %file.display(), "tracing to JSON");
            cmd::trace_to_json(file, cli.grammar.as_deref(), config)
        }
        Commands::Play { file } => {
            tracing::info!(file = %file.display(), "tracing for playback");
            cmd::play_trace(file, cli.grammar.as_deref(), config)
        }
    }
}
