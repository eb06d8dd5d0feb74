//! Command handlers, one module per subcommand.

pub mod decode;
pub mod play;
pub mod snapshot;
pub mod speak;
pub mod voices;

mod session;

use std::path::Path;

use parley_core::EncodedAudioPayload;

use crate::error::CliError;

/// Read a base64 payload from disk. Surrounding whitespace is left in place;
/// the decoder ignores it.
pub fn read_payload(path: &Path) -> Result<EncodedAudioPayload, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let payload = EncodedAudioPayload::new(text);
    if payload.as_str().trim().is_empty() {
        return Err(CliError::Arguments(format!(
            "{} contains no audio data",
            path.display()
        )));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_payload_keeps_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "AEAAQA==").unwrap();

        let payload = read_payload(file.path()).unwrap();
        assert_eq!(payload.as_str().trim(), "AEAAQA==");
    }

    #[test]
    fn test_read_payload_rejects_blank_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();

        let err = read_payload(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Arguments(_)));
    }

    #[test]
    fn test_read_payload_missing_file() {
        let err = read_payload(Path::new("/nonexistent/speech.b64")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
