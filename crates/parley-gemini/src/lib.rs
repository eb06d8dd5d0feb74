#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultGeminiClient is meant to be used through the SpeechSynthesizer
// trait, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultGeminiClient;

// Configuration
pub use config::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClientConfig};

// Errors
pub use error::GeminiError;
