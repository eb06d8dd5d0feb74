//! Voices command handler.

use std::path::Path;

use parley_core::VoiceCatalog;

use crate::error::CliError;

/// Load the catalog from `path`, or the built-in one.
pub fn load_catalog(path: Option<&Path>) -> Result<VoiceCatalog, CliError> {
    let Some(path) = path else {
        return Ok(VoiceCatalog::builtin());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    Ok(VoiceCatalog::from_json(&json)?)
}

/// Execute the voices command.
pub fn execute(catalog: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;

    if catalog.is_empty() {
        println!("No voices in catalog.");
        return Ok(());
    }

    println!(
        "{:<14} {:<8} {:<14} CHARACTERISTICS",
        "NAME", "GENDER", "PITCH"
    );
    for voice in catalog.voices() {
        println!(
            "{:<14} {:<8} {:<14} {}",
            voice.name,
            voice.gender,
            voice.pitch,
            voice.characteristics.join(", ")
        );
    }
    println!();
    println!("{} voice(s)", catalog.len());
    Ok(())
}
