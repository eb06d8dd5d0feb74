//! Speak command handler.

use std::path::Path;
use std::sync::Arc;

use parley_core::PcmFormat;
use parley_gemini::DefaultGeminiClient;

use super::{session, voices};
use crate::commands::GeminiArgs;
use crate::error::CliError;

/// Execute the speak command.
pub async fn execute(
    text: &str,
    voice: Option<&str>,
    catalog: Option<&Path>,
    gemini: &GeminiArgs,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        return Err(CliError::Arguments("text must not be empty".to_string()).into());
    }

    let config = gemini.client_config();
    if !config.has_api_key() {
        return Err(CliError::Config(
            "GEMINI_API_KEY is not set (use --api-key or a .env file)".to_string(),
        )
        .into());
    }

    let catalog = voices::load_catalog(catalog)?;
    let client =
        DefaultGeminiClient::new(&config).map_err(|e| CliError::Config(e.to_string()))?;
    let (controller, mut events) = session::controller(Arc::new(client), PcmFormat::default());
    let controller = controller.with_catalog(catalog);

    if let Some(name) = voice {
        controller.select_voice(name).map_err(CliError::from)?;
    }

    println!(
        "Synthesizing with {} ({}). Press Ctrl-C to stop.",
        controller.selected_voice(),
        config.model()
    );
    let outcome = controller
        .play_selected(text)
        .await
        .map_err(CliError::from)?;
    session::follow(&controller, &mut events, outcome).await?;
    Ok(())
}
