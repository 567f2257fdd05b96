// Pure mixing math: falloff, staging, smoothing, spatial mapping and sends.

use glam::{Vec2, Vec3};
use mix_core::falloff::{compute_volume, scaled_fade_radius};
use mix_core::reverb::send_level;
use mix_core::smoothing::{smooth_toward, smoothing_rate};
use mix_core::spatial::{map_to_spatial_coordinates, stereo_pan};
use mix_core::staging::{count_active, reduction_factor, stage_gain};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn falloff_is_boosted_at_center_and_silent_at_radius() {
    let listener = Vec2::new(100.0, 100.0);
    assert!(approx(compute_volume(1.0, listener, listener, 100.0, 1.5), 1.5));
    let edge = Vec2::new(200.0, 100.0);
    assert_eq!(compute_volume(1.0, edge, listener, 100.0, 1.5), 0.0);
    let beyond = Vec2::new(400.0, 100.0);
    assert_eq!(compute_volume(1.0, beyond, listener, 100.0, 1.5), 0.0);
}

#[test]
fn falloff_halfway_applies_decayed_boost() {
    // base 0.5, boost 1 + 0.5 * 0.5
    let v = compute_volume(1.0, Vec2::new(50.0, 0.0), Vec2::ZERO, 100.0, 1.5);
    assert!(approx(v, 0.625), "got {v}");
}

#[test]
fn falloff_decreases_monotonically_with_distance() {
    let mut last = f32::MAX;
    for d in (0..=100).step_by(5) {
        let v = compute_volume(0.8, Vec2::new(d as f32, 0.0), Vec2::ZERO, 100.0, 1.5);
        assert!(v <= last, "volume rose at distance {d}");
        last = v;
    }
    assert_eq!(last, 0.0);
}

#[test]
fn falloff_with_degenerate_radius_is_silent() {
    assert_eq!(compute_volume(1.0, Vec2::ZERO, Vec2::ZERO, 0.0, 1.5), 0.0);
    assert_eq!(compute_volume(1.0, Vec2::ZERO, Vec2::ZERO, -5.0, 1.5), 0.0);
    assert_eq!(compute_volume(1.0, Vec2::ZERO, Vec2::ZERO, f32::NAN, 1.5), 0.0);
}

#[test]
fn fade_radius_scales_with_display_width() {
    assert!(approx(scaled_fade_radius(0.35, 1000.0), 350.0));
    assert!(approx(scaled_fade_radius(0.35, 2000.0), 700.0));
    assert_eq!(scaled_fade_radius(-1.0, 1000.0), 0.0);
}

#[test]
fn reduction_follows_inverse_square_root() {
    assert_eq!(reduction_factor(0), 1.0);
    assert_eq!(reduction_factor(1), 1.0);
    assert!(approx(reduction_factor(4), 0.5));
    assert!(approx(reduction_factor(9), 1.0 / 3.0));
}

#[test]
fn staged_gain_is_capped_then_reduced() {
    assert!(approx(stage_gain(1.5, 1.0, 0.5), 0.5));
    assert!(approx(stage_gain(0.4, 1.0, 0.5), 0.2));
    assert_eq!(stage_gain(-0.2, 1.0, 1.0), 0.0);
}

#[test]
fn staged_sum_stays_bounded_as_sources_pile_up() {
    for n in 1..=32usize {
        let volumes = vec![1.5f32; n];
        let active = count_active(volumes.iter().copied(), 0.01);
        let r = reduction_factor(active);
        let sum: f32 = volumes.iter().map(|v| stage_gain(*v, 1.0, r)).sum();
        assert!(sum <= (n as f32).sqrt() + 1e-4, "n={n} sum={sum}");
    }
}

#[test]
fn count_active_uses_strict_threshold() {
    assert_eq!(count_active([0.0, 0.01, 0.011, 0.9], 0.01), 2);
}

#[test]
fn smoothing_converges_without_overshoot() {
    let rate = smoothing_rate(0.5);
    assert!(rate > 0.0 && rate <= 1.0);
    let mut g = 0.0;
    for _ in 0..400 {
        let next = smooth_toward(g, 1.0, rate);
        assert!(next >= g && next <= 1.0);
        g = next;
    }
    assert!((1.0 - g).abs() < 1e-3);
}

#[test]
fn smoothing_rate_stays_in_unit_interval() {
    assert!(smoothing_rate(0.0) > 0.0);
    assert_eq!(smoothing_rate(100.0), 1.0);
    // a rate of one jumps straight to the target
    assert_eq!(smooth_toward(0.2, 0.7, 1.0), 0.7);
}

#[test]
fn spatial_mapping_puts_right_hand_sources_on_the_right() {
    let p = map_to_spatial_coordinates(Vec2::new(200.0, 100.0), Vec2::new(100.0, 100.0), 1.0);
    assert!(p.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5), "{p:?}");
    let p = map_to_spatial_coordinates(Vec2::new(0.0, 100.0), Vec2::new(100.0, 100.0), 1.0);
    assert!(p.x < 0.0);
}

#[test]
fn spatial_mapping_uses_depth_for_vertical_offset() {
    let p = map_to_spatial_coordinates(Vec2::new(100.0, 300.0), Vec2::new(100.0, 100.0), 0.5);
    assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5), "{p:?}");
}

#[test]
fn zero_strength_collapses_to_listener() {
    let p = map_to_spatial_coordinates(Vec2::new(900.0, 10.0), Vec2::new(100.0, 100.0), 0.0);
    assert_eq!(p, Vec3::ZERO);
}

#[test]
fn stereo_pan_follows_offset_and_clamps() {
    let listener = Vec2::new(100.0, 0.0);
    assert!(approx(stereo_pan(0.0, Vec2::new(150.0, 0.0), listener, 100.0, 1.0), 0.5));
    assert!(approx(stereo_pan(0.0, Vec2::new(50.0, 0.0), listener, 100.0, 1.0), -0.5));
    assert_eq!(stereo_pan(0.8, Vec2::new(900.0, 0.0), listener, 100.0, 1.0), 1.0);
    assert!(approx(stereo_pan(0.3, Vec2::new(900.0, 0.0), listener, 100.0, 0.0), 0.3));
}

#[test]
fn reverb_send_rises_with_distance_when_scaled() {
    assert!(approx(send_level(0.5, 0.0, true), 0.3));
    assert!(approx(send_level(0.5, 1.0, true), 0.6));
    assert!(approx(send_level(0.5, 1.0, false), 0.3));
    assert!(send_level(1.0, 5.0, true) <= 1.0);
    assert_eq!(send_level(0.0, 1.0, true), 0.0);
}
