// Host-side tests for front-end constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn frame_clamp_covers_at_least_the_physics_clamp() {
    // the engine clamps to two 60 Hz frames itself
    assert!(MAX_FRAME_SECS >= 2.0 / mix_core::constants::BASELINE_TICK_HZ);
}

#[test]
fn default_scene_sits_inside_the_content() {
    assert!(!DEFAULT_SOURCES.is_empty());
    for (label, url, x, y) in DEFAULT_SOURCES {
        assert!(!label.is_empty() && !url.is_empty());
        assert!((0.0..=1.0).contains(x), "{label} x={x}");
        assert!((0.0..=1.0).contains(y), "{label} y={y}");
    }
}

#[test]
fn dom_ids_are_distinct() {
    let ids = [CANVAS_ID, PLAY_BUTTON_ID, PAUSE_BUTTON_ID, STOP_BUTTON_ID];
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
