//! Audio payload and buffer types.
//!
//! An [`EncodedAudioPayload`] is what a speech service hands back: base64
//! text wrapping little-endian signed 16-bit PCM, interleaved by channel.
//! A [`DecodedAudioBuffer`] is what an output device consumes: planar `f32`
//! samples, one `Vec` per channel, all of the same length.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sample rate used by the remote speech contract when nothing else is known.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Channel count used by the remote speech contract (mono).
pub const DEFAULT_CHANNELS: u16 = 1;

// ── Encoded payload ────────────────────────────────────────────────

/// Base64 text of raw 16-bit PCM, exactly as received from a speech service.
///
/// The payload is an immutable value. It is consumed once by the decoder
/// and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudioPayload(String);

impl EncodedAudioPayload {
    /// Wrap base64 text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the base64 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the payload carries no text at all (whitespace counts as empty).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Unwrap the base64 text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for EncodedAudioPayload {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for EncodedAudioPayload {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

// ── PCM format ─────────────────────────────────────────────────────

/// Sample rate and channel layout of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcmFormat {
    /// Samples per second, per channel.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

impl PcmFormat {
    /// Create a format from explicit values.
    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Derive a format from a MIME type such as `audio/L16;codec=pcm;rate=24000`.
    ///
    /// Parameters that are missing or unparsable keep their default value.
    pub fn from_mime_type(mime: &str) -> Self {
        let mut format = Self::default();

        for param in mime.split(';').skip(1) {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match key.trim().to_ascii_lowercase().as_str() {
                "rate" => {
                    if let Ok(rate) = value.parse::<u32>() {
                        if rate > 0 {
                            format.sample_rate = rate;
                        }
                    }
                }
                "channels" => {
                    if let Ok(channels) = value.parse::<u16>() {
                        if channels > 0 {
                            format.channels = channels;
                        }
                    }
                }
                _ => {}
            }
        }

        format
    }
}

// ── Decoded buffer ─────────────────────────────────────────────────

/// Owned, fixed-length, multi-channel buffer of samples in `[-1.0, 1.0]`.
///
/// Invariant: every channel holds exactly [`frame_count`](Self::frame_count)
/// samples, so `total_samples == frame_count * channel_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
    frame_count: usize,
}

impl DecodedAudioBuffer {
    /// Build a buffer from planar channel data.
    ///
    /// Returns `None` when there are no channels, the sample rate is zero,
    /// or the channels differ in length.
    pub fn from_planar(channels: Vec<Vec<f32>>, sample_rate: u32) -> Option<Self> {
        if sample_rate == 0 {
            return None;
        }
        let frame_count = channels.first()?.len();
        if channels.iter().any(|c| c.len() != frame_count) {
            return None;
        }

        Some(Self {
            channels,
            sample_rate,
            frame_count,
        })
    }

    /// A buffer of `frames` zero samples in the given format.
    pub fn silent(format: PcmFormat, frames: usize) -> Option<Self> {
        let channels = (0..format.channels).map(|_| vec![0.0; frames]).collect();
        Self::from_planar(channels, format.sample_rate)
    }

    /// Samples per second, per channel.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub const fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Total number of samples across all channels.
    pub fn total_samples(&self) -> usize {
        self.frame_count * self.channels.len()
    }

    /// Whether the buffer holds no frames.
    pub const fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Samples of a single channel.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Format describing this buffer.
    pub fn format(&self) -> PcmFormat {
        PcmFormat {
            sample_rate: self.sample_rate,
            channels: u16::try_from(self.channels.len()).unwrap_or(u16::MAX),
        }
    }

    /// Playback length at the buffer's sample rate.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count as f64 / f64::from(self.sample_rate))
    }

    /// Largest absolute sample value in a channel, or `None` for a bad index.
    pub fn peak(&self, index: usize) -> Option<f32> {
        self.channel(index)
            .map(|samples| samples.iter().fold(0.0_f32, |peak, s| peak.max(s.abs())))
    }

    /// Re-interleave the channels (frame by frame) for devices that expect it.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.total_samples());
        for frame in 0..self.frame_count {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }
}
