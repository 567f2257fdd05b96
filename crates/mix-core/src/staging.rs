//! Anti-clip gain staging.
//!
//! Scales every source down by `1/sqrt(n)` for `n` simultaneously audible
//! sources so their sum stays bounded without loudness metering.

/// `min(1, 1/sqrt(max(1, active)))`.
#[inline]
pub fn reduction_factor(active: usize) -> f32 {
    (1.0 / (active.max(1) as f32).sqrt()).min(1.0)
}

/// Final per-source gain: capped target scaled by the shared reduction.
#[inline]
pub fn stage_gain(target: f32, max_per_source: f32, reduction: f32) -> f32 {
    target.min(max_per_source).max(0.0) * reduction
}

/// Counts volumes above `threshold`.
pub fn count_active<I>(volumes: I, threshold: f32) -> usize
where
    I: IntoIterator<Item = f32>,
{
    volumes.into_iter().filter(|v| *v > threshold).count()
}
