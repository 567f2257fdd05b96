// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;
use mix_core::PointerEvent;

#[test]
fn css_position_scales_to_backing_pixels() {
    // 500x250 CSS box at (10, 20) with a 2x device pixel ratio
    let p = css_to_canvas_px(
        Vec2::new(260.0, 145.0),
        Vec2::new(10.0, 20.0),
        Vec2::new(500.0, 250.0),
        Vec2::new(1000.0, 500.0),
    );
    assert_eq!(p, Vec2::new(500.0, 250.0));
}

#[test]
fn css_position_with_empty_rect_is_origin() {
    let p = css_to_canvas_px(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::ZERO, Vec2::splat(100.0));
    assert_eq!(p, Vec2::ZERO);
}

#[test]
fn press_move_release_is_a_drag() {
    let mut s = PointerState::default();
    let a = Vec2::new(10.0, 10.0);
    let b = Vec2::new(40.0, 30.0);
    assert_eq!(s.on_move(a), PointerEvent::Moved(a));
    assert_eq!(s.on_down(a), PointerEvent::DragStart(a));
    assert_eq!(s.on_move(b), PointerEvent::DragMove(b));
    assert_eq!(s.on_up(), Some(PointerEvent::DragEnd));
    assert_eq!(s.on_move(a), PointerEvent::Moved(a));
}

#[test]
fn release_without_press_is_ignored() {
    let mut s = PointerState::default();
    assert_eq!(s.on_up(), None);
}

#[test]
fn leaving_mid_drag_keeps_the_drag() {
    let mut s = PointerState::default();
    s.on_down(Vec2::ONE);
    assert_eq!(s.on_leave(), None);
    assert!(s.down);
    s.on_up();
    assert_eq!(s.on_leave(), Some(PointerEvent::Left));
    assert_eq!(s.pos, None);
}
