//! Color cycling through a fixed palette.

use parley_core::Rgb;

/// Blue, red, yellow, green.
pub const PALETTE: [Rgb; 4] = [
    Rgb::new(0x31, 0x86, 0xff),
    Rgb::new(0xfc, 0x41, 0x3d),
    Rgb::new(0xfe, 0xc7, 0x00),
    Rgb::new(0x0e, 0xbc, 0x5f),
];

/// Palette positions advanced per unit of phase.
pub const COLOR_CYCLE_RATE: f64 = 0.05;

/// Position in the palette for a phase value.
pub fn cycle_position(phase: f64) -> f64 {
    phase * COLOR_CYCLE_RATE
}

/// Color for `phase`: blend of the current palette entry and the next one.
///
/// The integer part of the cycle position picks the entry (wrapping after
/// the last color), the fractional part is the blend factor.
pub fn color_at(phase: f64) -> Rgb {
    let position = cycle_position(phase);
    if !position.is_finite() {
        return PALETTE[0];
    }

    let len = PALETTE.len();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (position.floor().rem_euclid(len as f64)) as usize % len;
    let next = (index + 1) % len;
    let factor = position.rem_euclid(1.0);

    PALETTE[index].lerp(PALETTE[next], factor)
}
