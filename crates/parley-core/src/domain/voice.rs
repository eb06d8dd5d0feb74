//! Voice catalog — the ordered list of voices a caller can choose from.
//!
//! Only [`Voice::name`] matters to the audio core: it is passed verbatim to
//! the speech service. The remaining attributes are display metadata.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A selectable speech voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Identifier sent to the speech service (e.g. `"Kore"`).
    pub name: String,
    /// Display gender label.
    pub gender: String,
    /// Display pitch label (e.g. `"Middle"`).
    pub pitch: String,
    /// Short descriptive tags.
    #[serde(default)]
    pub characteristics: Vec<String>,
}

impl Voice {
    pub fn new(
        name: impl Into<String>,
        gender: impl Into<String>,
        pitch: impl Into<String>,
        characteristics: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            gender: gender.into(),
            pitch: pitch.into(),
            characteristics: characteristics.iter().map(ToString::to_string).collect(),
        }
    }

    /// `"Kore (Female)"` — the label a voice selector shows.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.gender)
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog JSON could not be parsed.
    #[error("Invalid voice catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Two voices share the same name.
    #[error("Duplicate voice name in catalog: {0}")]
    DuplicateName(String),
}

/// Ordered list of voices. Order is meaningful: the first voice is the
/// fallback selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceCatalog {
    voices: Vec<Voice>,
}

impl VoiceCatalog {
    /// Build a catalog, rejecting duplicate names.
    pub fn new(voices: Vec<Voice>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for voice in &voices {
            if !seen.insert(voice.name.as_str()) {
                return Err(CatalogError::DuplicateName(voice.name.clone()));
            }
        }
        Ok(Self { voices })
    }

    /// Parse a JSON array of voices.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let voices: Vec<Voice> = serde_json::from_str(json)?;
        Self::new(voices)
    }

    /// The prebuilt voices offered by the hosted speech service.
    pub fn builtin() -> Self {
        Self {
            voices: vec![
                Voice::new("Zephyr", "Female", "Higher", &["Bright", "Clear"]),
                Voice::new("Puck", "Male", "Middle", &["Upbeat", "Lively"]),
                Voice::new("Charon", "Male", "Lower", &["Informative", "Steady"]),
                Voice::new("Kore", "Female", "Middle", &["Firm", "Confident"]),
                Voice::new("Fenrir", "Male", "Lower middle", &["Excitable", "Warm"]),
                Voice::new("Leda", "Female", "Higher", &["Youthful", "Light"]),
                Voice::new("Orus", "Male", "Lower middle", &["Firm", "Measured"]),
                Voice::new("Aoede", "Female", "Middle", &["Breezy", "Relaxed"]),
            ],
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Look up a voice by exact name.
    pub fn get(&self, name: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.name == name)
    }

    /// First voice in catalog order.
    pub fn first(&self) -> Option<&Voice> {
        self.voices.first()
    }

    /// Resolve a selection: the named voice if present, otherwise the first
    /// voice. `None` only when the catalog is empty.
    pub fn resolve(&self, selected: &str) -> Option<&Voice> {
        self.get(selected).or_else(|| {
            let fallback = self.first();
            if let Some(voice) = fallback {
                tracing::debug!(
                    selected,
                    fallback = %voice.name,
                    "Selected voice not in catalog, using first voice"
                );
            }
            fallback
        })
    }

    /// Voice names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.voices.iter().map(|v| v.name.as_str())
    }
}
