//! Play command handler.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parley_core::{PcmFormat, SpeechSynthesizer, SynthesisError, SynthesizedSpeech};

use super::{read_payload, session};
use crate::error::CliError;

/// Synthesizer for payload-only sessions. Never reached by `play`, which
/// hands the controller audio directly.
struct PayloadOnly;

#[async_trait]
impl SpeechSynthesizer for PayloadOnly {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &str,
    ) -> Result<SynthesizedSpeech, SynthesisError> {
        Err(SynthesisError::InvalidResponse(
            "no speech service configured".to_string(),
        ))
    }
}

/// Execute the play command.
pub async fn execute(input: &Path, format: PcmFormat) -> anyhow::Result<()> {
    let payload = read_payload(input)?;
    let (controller, mut events) = session::controller(Arc::new(PayloadOnly), format);

    println!(
        "Playing {} ({} Hz, {} channel(s)). Press Ctrl-C to stop.",
        input.display(),
        format.sample_rate,
        format.channels
    );
    let outcome = controller
        .play_payload(&payload, format)
        .map_err(CliError::from)?;
    session::follow(&controller, &mut events, outcome).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_only_synthesizer_refuses_text() {
        let result = tokio_test::block_on(PayloadOnly.synthesize("hello", "Kore"));
        assert!(matches!(result, Err(SynthesisError::InvalidResponse(_))));
    }
}
