//! In-memory drawing surface.
//!
//! [`RecordingSurface`] keeps every call it receives as a [`DrawOp`]. Tests
//! assert on the recording; the CLI turns it into an SVG snapshot.

use std::fmt::Write as _;

use parley_core::{DrawingSurface, Rgb, StrokeStyle};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetBackingSize { width: u32, height: u32 },
    Scale { x: f64, y: f64 },
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    SetStroke(StrokeStyle),
    Stroke,
}

/// A path as it was stroked: its points and the style in effect.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokedPath {
    pub points: Vec<(f64, f64)>,
    pub style: StrokeStyle,
}

/// A [`DrawingSurface`] that records instead of rasterizing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    ratio: f64,
    backing: (u32, u32),
    scale: (f64, f64),
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// A surface of the given display size at a pixel ratio of 1.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ratio: 1.0,
            backing: (0, 0),
            scale: (1.0, 1.0),
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    pub const fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    /// Accumulated scale of the current transform.
    pub const fn transform_scale(&self) -> (f64, f64) {
        self.scale
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recording, leaving the surface state intact.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn stroke_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Stroke)).count()
    }

    /// Replay the recording into the paths that are visible at the end.
    ///
    /// A clear covering the whole display wipes earlier strokes; partial
    /// clears are ignored.
    pub fn paths(&self) -> Vec<StrokedPath> {
        let mut visible = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        let mut style = StrokeStyle::new(Rgb::BLACK, 1.0, 1.0);

        for op in &self.ops {
            match *op {
                DrawOp::ClearRect {
                    x,
                    y,
                    width,
                    height,
                } => {
                    if x <= 0.0 && y <= 0.0 && width >= self.width && height >= self.height {
                        visible.clear();
                    }
                }
                DrawOp::BeginPath => current.clear(),
                DrawOp::MoveTo { x, y } | DrawOp::LineTo { x, y } => current.push((x, y)),
                DrawOp::SetStroke(next) => style = next,
                DrawOp::Stroke => visible.push(StrokedPath {
                    points: current.clone(),
                    style,
                }),
                DrawOp::SetBackingSize { .. } | DrawOp::Scale { .. } => {}
            }
        }
        visible
    }

    /// Render the visible paths as a standalone SVG document in display
    /// units.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );

        for path in self.paths() {
            let Some((&(x0, y0), rest)) = path.points.split_first() else {
                continue;
            };
            let mut d = format!("M{x0:.2} {y0:.2}");
            for &(x, y) in rest {
                let _ = write!(d, " L{x:.2} {y:.2}");
            }
            let style = path.style;
            let _ = writeln!(
                svg,
                r#"  <path d="{d}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linecap="{}" stroke-linejoin="{}"/>"#,
                style.color.to_hex(),
                style.width,
                style.alpha,
                style.cap.as_str(),
                style.join.as_str(),
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawingSurface for RecordingSurface {
    fn display_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.ratio
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.scale = (1.0, 1.0);
        self.ops.push(DrawOp::SetBackingSize { width, height });
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.scale = (self.scale.0 * x, self.scale.1 * y);
        self.ops.push(DrawOp::Scale { x, y });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo { x, y });
    }

    fn set_stroke(&mut self, style: StrokeStyle) {
        self.ops.push(DrawOp::SetStroke(style));
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }
}
