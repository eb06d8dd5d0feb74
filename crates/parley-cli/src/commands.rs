//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use parley_core::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE, PcmFormat};
use parley_gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClientConfig};

#[derive(Subcommand)]
pub enum Commands {
    /// List the voices available for synthesis
    Voices {
        /// Load the catalog from a JSON file instead of the built-in list
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Decode a base64 PCM file and print a summary
    Decode {
        /// File containing the base64 payload
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Decode a base64 PCM file and play it on the default output device
    Play {
        /// File containing the base64 payload
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Synthesize text with Gemini and play it
    Speak {
        /// Text to speak
        #[arg(short, long)]
        text: String,

        /// Voice name (defaults to the first voice in the catalog)
        #[arg(long)]
        voice: Option<String>,

        /// Load the catalog from a JSON file instead of the built-in list
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        gemini: GeminiArgs,
    },

    /// Render a single waveform frame to an SVG file
    Snapshot {
        /// Output SVG path
        #[arg(short, long)]
        out: PathBuf,

        /// Animation phase to render at
        #[arg(long, default_value_t = 0.0)]
        phase: f64,

        /// Surface width in CSS pixels
        #[arg(long, default_value_t = 600.0)]
        width: f64,

        /// Surface height in CSS pixels
        #[arg(long, default_value_t = 120.0)]
        height: f64,

        /// Device pixel ratio
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,

        /// Draw the idle line instead of the animated curves
        #[arg(long)]
        idle: bool,

        /// Base color used when idle (hex, e.g. #3186ff)
        #[arg(long, default_value = "#3186ff")]
        color: String,
    },
}

/// Raw PCM layout of an input payload.
#[derive(Args, Debug, Clone, Copy)]
pub struct FormatArgs {
    /// Sample rate in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    pub rate: u32,

    /// Interleaved channel count
    #[arg(long, default_value_t = DEFAULT_CHANNELS, value_parser = clap::value_parser!(u16).range(1..))]
    pub channels: u16,
}

impl FormatArgs {
    pub const fn pcm_format(self) -> PcmFormat {
        PcmFormat::new(self.rate, self.channels)
    }
}

/// Connection settings for the Gemini speech endpoint.
#[derive(Args, Debug, Clone)]
pub struct GeminiArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Speech model
    #[arg(long, env = "GEMINI_TTS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl GeminiArgs {
    pub fn client_config(&self) -> GeminiClientConfig {
        GeminiClientConfig::new()
            .with_base_url(&self.base_url)
            .with_model(&self.model)
            .with_optional_api_key(self.api_key.clone())
    }
}
