//! Integration tests for waveform frames drawn onto a recording surface.

use parley_audio::waveform::{DrawOp, PALETTE, SAMPLE_POINTS, color_at};
use parley_audio::{FrameOutcome, RecordingSurface, WaveformRenderer};
use parley_core::{LineCap, LineJoin, Rgb};

const BASE: Rgb = Rgb::new(0x18, 0x18, 0x1b);

#[test]
#[allow(clippy::float_cmp)]
fn idle_frame_is_one_faint_center_line() {
    let mut renderer = WaveformRenderer::new();
    let mut surface = RecordingSurface::new(300.0, 60.0);

    let outcome = renderer.draw_frame(&mut surface, false, BASE);

    assert_eq!(outcome, FrameOutcome::Halt);
    let paths = surface.paths();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].points, vec![(0.0, 30.0), (300.0, 30.0)]);
    assert_eq!(paths[0].style.color, BASE);
    assert_eq!(paths[0].style.alpha, 0.2);
    assert_eq!(paths[0].style.width, 2.0);
}

#[test]
fn idle_frame_clears_first() {
    let mut renderer = WaveformRenderer::new();
    let mut surface = RecordingSurface::new(300.0, 60.0);

    renderer.draw_frame(&mut surface, false, BASE);

    assert_eq!(
        surface.ops().first(),
        Some(&DrawOp::ClearRect {
            x: 0.0,
            y: 0.0,
            width: 300.0,
            height: 60.0
        })
    );
}

#[test]
#[allow(clippy::float_cmp)]
fn playing_frame_draws_two_tapered_curves() {
    let mut renderer = WaveformRenderer::new().with_phase(4.2);
    let mut surface = RecordingSurface::new(300.0, 60.0);

    let outcome = renderer.draw_frame(&mut surface, true, BASE);

    assert_eq!(outcome, FrameOutcome::Continue);
    let paths = surface.paths();
    assert_eq!(paths.len(), 2);

    for path in &paths {
        // move_to(0, center) then one line_to per point
        assert_eq!(path.points.len(), SAMPLE_POINTS + 2);
        assert_eq!(path.points[0], (0.0, 30.0));
        assert_eq!(path.points[1], (0.0, 30.0));
        assert_eq!(path.points[SAMPLE_POINTS + 1], (300.0, 30.0));
        assert_eq!(path.style.cap, LineCap::Round);
        assert_eq!(path.style.join, LineJoin::Round);
    }

    let expected = color_at(renderer.state().phase);
    assert_eq!(paths[0].style.color, expected);
    assert_eq!(paths[0].style.alpha, 0.8);
    assert_eq!(paths[0].style.width, 2.0);
    assert_eq!(paths[1].style.color, expected);
    assert_eq!(paths[1].style.alpha, 0.3);
    assert_eq!(paths[1].style.width, 1.0);
}

#[test]
fn playing_ignores_base_color() {
    let mut renderer = WaveformRenderer::new();
    let mut surface = RecordingSurface::new(100.0, 20.0);

    renderer.draw_frame(&mut surface, true, Rgb::new(1, 2, 3));

    // phase 0.15 sits just past the first palette entry
    let color = surface.paths()[0].style.color;
    assert_ne!(color, Rgb::new(1, 2, 3));
    assert_eq!(color, PALETTE[0].lerp(PALETTE[1], 0.15 * 0.05));
}

#[test]
fn phase_accumulates_only_while_playing() {
    let mut renderer = WaveformRenderer::new();
    let mut surface = RecordingSurface::new(100.0, 20.0);

    for _ in 0..10 {
        renderer.draw_frame(&mut surface, true, BASE);
    }
    let after_playing = renderer.state().phase;
    renderer.draw_frame(&mut surface, false, BASE);
    renderer.draw_frame(&mut surface, true, BASE);

    assert!((after_playing - 1.5).abs() < 1e-9);
    assert!((renderer.state().phase - 1.65).abs() < 1e-9);
}

#[test]
fn palette_wraps_after_four_colors() {
    let renderer = WaveformRenderer::new().with_phase(80.0);
    assert_eq!(renderer.state().color(), PALETTE[0]);
    let renderer = WaveformRenderer::new().with_phase(60.0);
    assert_eq!(renderer.state().color(), PALETTE[3]);
}

#[test]
fn resize_scales_backing_store_by_pixel_ratio() {
    let renderer = WaveformRenderer::new();
    let mut surface = RecordingSurface::new(300.0, 60.0).with_device_pixel_ratio(2.0);

    renderer.resize(&mut surface);

    assert_eq!(surface.backing_size(), (600, 120));
    assert_eq!(surface.transform_scale(), (2.0, 2.0));
}

#[test]
fn resize_treats_bad_ratio_as_one() {
    let renderer = WaveformRenderer::new();
    for ratio in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let mut surface = RecordingSurface::new(300.0, 60.0).with_device_pixel_ratio(ratio);
        renderer.resize(&mut surface);
        assert_eq!(surface.backing_size(), (300, 60));
        assert_eq!(surface.transform_scale(), (1.0, 1.0));
    }
}

#[test]
fn snapshot_svg_has_one_path_per_curve() {
    let mut renderer = WaveformRenderer::new();
    let mut surface = RecordingSurface::new(300.0, 60.0);
    renderer.draw_frame(&mut surface, true, BASE);

    let svg = surface.to_svg();
    assert_eq!(svg.matches("<path").count(), 2);
    assert!(svg.contains(r#"stroke-linecap="round""#));
}
