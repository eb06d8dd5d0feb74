//! Domain types: audio payloads and buffers, voices, colors.

mod audio;
mod color;
mod voice;

pub use audio::{
    DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE, DecodedAudioBuffer, EncodedAudioPayload, PcmFormat,
};
pub use color::Rgb;
pub use voice::{CatalogError, Voice, VoiceCatalog};
