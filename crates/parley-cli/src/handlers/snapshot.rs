//! Snapshot command handler.

use std::path::{Path, PathBuf};

use parley_audio::{RecordingSurface, WaveformRenderer};
use parley_core::Rgb;

use crate::error::CliError;

/// Inputs for one rendered frame.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    pub phase: f64,
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
    pub idle: bool,
    pub color: String,
}

/// Render one frame and return it as SVG.
pub fn render_svg(options: &SnapshotOptions) -> Result<String, CliError> {
    if !(options.width > 0.0 && options.height > 0.0) {
        return Err(CliError::Arguments(
            "width and height must be positive".to_string(),
        ));
    }
    let color = Rgb::parse_hex(&options.color)
        .ok_or_else(|| CliError::Arguments(format!("invalid color: {}", options.color)))?;

    let mut surface =
        RecordingSurface::new(options.width, options.height).with_device_pixel_ratio(options.dpr);
    let mut renderer = WaveformRenderer::new().with_phase(options.phase);
    renderer.resize(&mut surface);
    renderer.draw_frame(&mut surface, !options.idle, color);

    tracing::debug!(
        strokes = surface.stroke_count(),
        backing = ?surface.backing_size(),
        "Rendered waveform frame"
    );
    Ok(surface.to_svg())
}

/// Execute the snapshot command.
pub fn execute(out: &Path, options: &SnapshotOptions) -> anyhow::Result<()> {
    let svg = render_svg(options)?;
    std::fs::write(out, svg).map_err(|e| CliError::Io(format!("{}: {e}", out.display())))?;
    println!("Wrote {}", display_path(out).display());
    Ok(())
}

fn display_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
