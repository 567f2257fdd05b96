//! Listener distance to source volume.

use glam::Vec2;

/// Target volume for a source at `source_pos` heard from `listener_pos`.
///
/// Linear falloff to zero at `fade_radius`, boosted by `center_boost` at zero
/// distance. The boost itself decays linearly, so at the edge the curve meets
/// the unboosted linear value. The result may exceed 1.0 near the center;
/// gain staging caps it.
pub fn compute_volume(
    source_volume: f32,
    source_pos: Vec2,
    listener_pos: Vec2,
    fade_radius: f32,
    center_boost: f32,
) -> f32 {
    if fade_radius.is_nan() || fade_radius <= 0.0 {
        return 0.0;
    }
    let distance = source_pos.distance(listener_pos);
    if !distance.is_finite() || distance >= fade_radius {
        return 0.0;
    }
    if distance == 0.0 {
        return source_volume * center_boost;
    }
    let r = distance / fade_radius;
    let base = source_volume * (1.0 - r);
    let boost = 1.0 + (center_boost - 1.0) * (1.0 - r);
    (base * boost).max(0.0)
}

/// Fade radius in canvas pixels: a fraction of the displayed content width.
#[inline]
pub fn scaled_fade_radius(fraction: f32, display_width: f32) -> f32 {
    (fraction * display_width).max(0.0)
}
