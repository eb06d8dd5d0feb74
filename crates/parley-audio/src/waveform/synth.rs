//! Curve math for the synthetic waveform.
//!
//! The curve is sampled at `SAMPLE_POINTS + 1` evenly spaced points. Each
//! point's vertical offset is a sum of sine harmonics scaled by a half-sine
//! envelope, so both ends sit on the center line for every phase.

use std::f64::consts::PI;

/// Number of segments across the width; points run `0..=SAMPLE_POINTS`.
pub const SAMPLE_POINTS: usize = 100;

/// One sine term: `sin(index * frequency + phase * phase_rate + phase_offset) * amplitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    pub frequency: f64,
    pub phase_rate: f64,
    pub amplitude: f64,
    pub phase_offset: f64,
}

impl Harmonic {
    pub const fn new(frequency: f64, phase_rate: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            phase_rate,
            amplitude,
            phase_offset: 0.0,
        }
    }

    #[must_use]
    pub const fn with_offset(mut self, phase_offset: f64) -> Self {
        self.phase_offset = phase_offset;
        self
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, index: usize, phase: f64) -> f64 {
        (index as f64)
            .mul_add(self.frequency, phase.mul_add(self.phase_rate, self.phase_offset))
            .sin()
            * self.amplitude
    }
}

/// Harmonics of the main curve.
pub const PRIMARY_HARMONICS: [Harmonic; 3] = [
    Harmonic::new(0.2, 1.0, 15.0),
    Harmonic::new(0.5, -2.0, 8.0),
    Harmonic::new(0.1, 0.5, 5.0),
];

/// The single harmonic of the fainter depth curve.
pub const DEPTH_HARMONIC: Harmonic = Harmonic::new(0.2, 1.0, 15.0).with_offset(1.0);

/// Half-sine taper, exactly zero at both edges.
#[allow(clippy::cast_precision_loss)]
pub fn envelope(index: usize) -> f64 {
    if index == 0 || index >= SAMPLE_POINTS {
        return 0.0;
    }
    (index as f64 / SAMPLE_POINTS as f64 * PI).sin()
}

/// Vertical offset of the main curve at `index`.
pub fn primary_offset(index: usize, phase: f64) -> f64 {
    let sum: f64 = PRIMARY_HARMONICS
        .iter()
        .map(|harmonic| harmonic.value(index, phase))
        .sum();
    sum * envelope(index)
}

/// Vertical offset of the depth curve at `index`.
pub fn depth_offset(index: usize, phase: f64) -> f64 {
    DEPTH_HARMONIC.value(index, phase) * envelope(index)
}

/// Screen-space points of a curve across `width`, centred on `center_y`.
#[allow(clippy::cast_precision_loss)]
pub fn curve_points(
    width: f64,
    center_y: f64,
    phase: f64,
    offset: fn(usize, f64) -> f64,
) -> Vec<(f64, f64)> {
    (0..=SAMPLE_POINTS)
        .map(|i| {
            let x = i as f64 / SAMPLE_POINTS as f64 * width;
            (x, center_y + offset(i, phase))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn edges_are_flat_for_any_phase() {
        for phase in [0.0, 0.15, 1.0, 7.3, 123.45] {
            assert_eq!(primary_offset(0, phase), 0.0);
            assert_eq!(primary_offset(SAMPLE_POINTS, phase), 0.0);
            assert_eq!(depth_offset(0, phase), 0.0);
            assert_eq!(depth_offset(SAMPLE_POINTS, phase), 0.0);
        }
    }

    #[test]
    fn envelope_peaks_in_the_middle() {
        assert!((envelope(SAMPLE_POINTS / 2) - 1.0).abs() < 1e-12);
        assert!(envelope(10) < envelope(40));
    }

    #[test]
    fn primary_matches_closed_form() {
        let (i, phase) = (37_usize, 2.4_f64);
        #[allow(clippy::cast_precision_loss)]
        let fi = i as f64;
        let expected = ((fi * 0.2 + phase).sin() * 15.0
            + (fi * 0.5 - phase * 2.0).sin() * 8.0
            + (fi * 0.1 + phase * 0.5).sin() * 5.0)
            * envelope(i);
        assert!((primary_offset(i, phase) - expected).abs() < 1e-9);
    }

    #[test]
    fn depth_is_shifted_primary_term() {
        let (i, phase) = (12_usize, 0.9_f64);
        #[allow(clippy::cast_precision_loss)]
        let expected = (i as f64 * 0.2 + phase + 1.0).sin() * 15.0 * envelope(i);
        assert!((depth_offset(i, phase) - expected).abs() < 1e-9);
    }

    #[test]
    fn curve_spans_the_width() {
        let points = curve_points(300.0, 50.0, 0.0, primary_offset);
        assert_eq!(points.len(), SAMPLE_POINTS + 1);
        assert!((points[0].0).abs() < f64::EPSILON);
        assert!((points[SAMPLE_POINTS].0 - 300.0).abs() < 1e-9);
    }
}
