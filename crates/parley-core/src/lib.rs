#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    CatalogError, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE, DecodedAudioBuffer, EncodedAudioPayload,
    PcmFormat, Rgb, Voice, VoiceCatalog,
};
pub use ports::{
    DrawingSurface, EndedSender, LineCap, LineJoin, OutputContext, OutputError, OutputFactory,
    SourceNode, SpeechSynthesizer, StopError, StrokeStyle, SynthesisError, SynthesizedSpeech,
};
