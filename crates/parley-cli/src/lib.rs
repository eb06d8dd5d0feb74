//! `parley` command-line front end.
//!
//! The binary in `main.rs` is the composition root: it loads `.env`, parses
//! arguments, installs logging, and dispatches to [`handlers`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used only by main.rs
use dotenvy as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod parser;

// Re-export primary types for convenient access
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
