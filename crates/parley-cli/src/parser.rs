//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Preview text-to-speech voices and visualize their playback.
#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Preview text-to-speech voices from the terminal")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
