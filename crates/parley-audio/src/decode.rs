//! PCM payload decoding — base64 text to a planar `f32` buffer.
//!
//! Every pair of bytes is a little-endian signed 16-bit sample. Samples are
//! normalized by dividing by 32768, which maps `-32768` to exactly `-1.0`
//! and `32767` to `0.999969…`. The range is deliberately asymmetric.
//!
//! Interleaved input is split into channels so that sample `i` of channel
//! `c` is source sample `i * channels + c`.

use std::borrow::Cow;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use parley_core::{DecodedAudioBuffer, EncodedAudioPayload, PcmFormat};

use crate::error::DecodeError;

/// Divisor mapping a signed 16-bit sample onto `[-1.0, 1.0)`.
pub const PCM16_SCALE: f32 = 32_768.0;

const BYTES_PER_SAMPLE: usize = 2;

/// Standard alphabet, padding optional, trailing bits ignored.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64 PCM payload into a buffer.
///
/// ASCII whitespace anywhere in the payload is ignored.
pub fn decode(
    payload: &EncodedAudioPayload,
    sample_rate: u32,
    channel_count: u16,
) -> Result<DecodedAudioBuffer, DecodeError> {
    validate_format(sample_rate, channel_count)?;

    let text = strip_whitespace(payload.as_str());
    let bytes = FORGIVING
        .decode(text.as_bytes())
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))?;

    decode_bytes(&bytes, sample_rate, channel_count)
}

/// [`decode`] with the rate and channel count taken from a [`PcmFormat`].
pub fn decode_with_format(
    payload: &EncodedAudioPayload,
    format: PcmFormat,
) -> Result<DecodedAudioBuffer, DecodeError> {
    decode(payload, format.sample_rate, format.channels)
}

/// Decode raw little-endian 16-bit PCM bytes.
///
/// Fails with [`DecodeError::MalformedFrame`] instead of truncating when the
/// byte count is not a whole number of frames.
pub fn decode_bytes(
    bytes: &[u8],
    sample_rate: u32,
    channel_count: u16,
) -> Result<DecodedAudioBuffer, DecodeError> {
    validate_format(sample_rate, channel_count)?;

    let channels = usize::from(channel_count);
    let frame_bytes = BYTES_PER_SAMPLE * channels;
    if bytes.len() % BYTES_PER_SAMPLE != 0 || bytes.len() % frame_bytes != 0 {
        return Err(DecodeError::MalformedFrame {
            len: bytes.len(),
            channels: channel_count,
        });
    }

    let frame_count = bytes.len() / frame_bytes;
    let mut planar: Vec<Vec<f32>> = (0..channels)
        .map(|_| Vec::with_capacity(frame_count))
        .collect();

    for (index, pair) in bytes.chunks_exact(BYTES_PER_SAMPLE).enumerate() {
        let sample = i16::from_le_bytes([pair[0], pair[1]]);
        planar[index % channels].push(normalize(sample));
    }

    tracing::trace!(frame_count, channels, sample_rate, "Decoded PCM payload");

    DecodedAudioBuffer::from_planar(planar, sample_rate).ok_or_else(|| {
        DecodeError::InvalidFormat(format!(
            "{channels} channel(s) at {sample_rate} Hz did not form a buffer"
        ))
    })
}

/// Map a signed 16-bit sample onto `[-1.0, 1.0)`.
#[inline]
pub fn normalize(sample: i16) -> f32 {
    f32::from(sample) / PCM16_SCALE
}

fn validate_format(sample_rate: u32, channel_count: u16) -> Result<(), DecodeError> {
    if sample_rate == 0 {
        return Err(DecodeError::InvalidFormat(
            "sample rate must be positive".to_string(),
        ));
    }
    if channel_count == 0 {
        return Err(DecodeError::InvalidFormat(
            "at least one channel is required".to_string(),
        ));
    }
    Ok(())
}

fn strip_whitespace(text: &str) -> Cow<'_, str> {
    if text.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(text.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(text)
    }
}
