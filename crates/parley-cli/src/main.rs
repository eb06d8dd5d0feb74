//! CLI entry point - the composition root.
//!
//! Loads `.env`, parses arguments, installs logging and dispatches to the
//! command handlers.

use std::process::ExitCode;

use clap::Parser;

use parley_cli::handlers::snapshot::SnapshotOptions;
use parley_cli::{Cli, CliError, Commands, handlers, logging};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so clap's `env` fallbacks see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Voices { catalog } => handlers::voices::execute(catalog.as_deref()),
        Commands::Decode { input, format } => {
            handlers::decode::execute(&input, format.pcm_format())
        }
        Commands::Play { input, format } => {
            handlers::play::execute(&input, format.pcm_format()).await
        }
        Commands::Speak {
            text,
            voice,
            catalog,
            gemini,
        } => {
            handlers::speak::execute(&text, voice.as_deref(), catalog.as_deref(), &gemini).await
        }
        Commands::Snapshot {
            out,
            phase,
            width,
            height,
            dpr,
            idle,
            color,
        } => handlers::snapshot::execute(
            &out,
            &SnapshotOptions {
                phase,
                width,
                height,
                dpr,
                idle,
                color,
            },
        ),
    }
}
