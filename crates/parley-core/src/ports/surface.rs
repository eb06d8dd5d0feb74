//! 2D drawing surface port — the subset of a raster canvas the waveform needs.

use crate::domain::Rgb;

/// Shape drawn at the ends of open paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    /// CSS/SVG keyword.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Shape drawn where two path segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    /// CSS/SVG keyword.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// Everything that affects how the next `stroke()` paints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb,
    pub width: f64,
    /// Global opacity in `[0, 1]`.
    pub alpha: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeStyle {
    pub const fn new(color: Rgb, width: f64, alpha: f64) -> Self {
        Self {
            color,
            width,
            alpha,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
        }
    }

    #[must_use]
    pub const fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    #[must_use]
    pub const fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}

/// A 2D raster surface with a path API.
///
/// Coordinates passed to drawing calls are in displayed (CSS) pixels; the
/// surface maps them to its backing store through the current scale.
pub trait DrawingSurface {
    /// Displayed size in CSS pixels `(width, height)`.
    fn display_size(&self) -> (f64, f64);

    /// Ratio of physical to CSS pixels.
    fn device_pixel_ratio(&self) -> f64;

    /// Resize the backing store, in physical pixels. Resets the transform.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Multiply the current transform by a scale.
    fn scale(&mut self, x: f64, y: f64);

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// Set the style used by subsequent [`stroke`](Self::stroke) calls.
    fn set_stroke(&mut self, style: StrokeStyle);

    /// Stroke the current path.
    fn stroke(&mut self);
}
