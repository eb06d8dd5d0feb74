//! Decode command handler.

use std::path::Path;

use parley_core::{DecodedAudioBuffer, PcmFormat};

use super::read_payload;

/// Execute the decode command.
pub fn execute(input: &Path, format: PcmFormat) -> anyhow::Result<()> {
    let payload = read_payload(input)?;
    let buffer = parley_audio::decode_with_format(&payload, format)
        .map_err(crate::error::CliError::from)?;

    for line in summarize(&buffer) {
        println!("{line}");
    }
    Ok(())
}

/// Human-readable description of a decoded buffer.
pub fn summarize(buffer: &DecodedAudioBuffer) -> Vec<String> {
    let mut lines = vec![
        format!("Frames:      {}", buffer.frame_count()),
        format!("Channels:    {}", buffer.channel_count()),
        format!("Sample rate: {} Hz", buffer.sample_rate()),
        format!("Duration:    {:.3}s", buffer.duration().as_secs_f64()),
    ];
    for channel in 0..buffer.channel_count() {
        let peak = buffer.peak(channel).unwrap_or_default();
        lines.push(format!("Peak ch{channel}:    {peak:.4}"));
    }
    lines
}
