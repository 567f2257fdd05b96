use crate::constants::SMOOTHING_PER_FADE_SPEED;

/// Per-tick approach rate for a configured fade speed, kept inside (0, 1].
#[inline]
pub fn smoothing_rate(fade_speed: f32) -> f32 {
    (fade_speed * SMOOTHING_PER_FADE_SPEED).clamp(f32::EPSILON, 1.0)
}

/// One geometric step of `current` toward `target`.
#[inline]
pub fn smooth_toward(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}
