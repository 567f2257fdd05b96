//! Planar canvas offsets to spatializer parameters.

use crate::constants::PIXELS_PER_UNIT;
use crate::host::{AudioGraphHost, HostError, NodeId};
use glam::{Vec2, Vec3};

/// Positioning stage of a source, fixed when the source is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spatializer {
    Hrtf(NodeId),
    /// Fallback when the host has no HRTF panner.
    StereoPan(NodeId),
}

impl Spatializer {
    /// Asks the host for an HRTF panner and falls back to a stereo panner.
    pub fn create<H: AudioGraphHost>(host: &mut H) -> Result<Self, HostError> {
        match host.create_spatializer()? {
            Some(node) => Ok(Self::Hrtf(node)),
            None => {
                log::info!("[spatial] HRTF unavailable, using stereo pan");
                host.create_stereo_panner().map(Self::StereoPan)
            }
        }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        match *self {
            Self::Hrtf(n) | Self::StereoPan(n) => n,
        }
    }
}

/// Source position relative to a listener at the spatializer origin.
///
/// Canvas x maps to spatial X and canvas y to spatial Z; sources share the
/// listener's plane so Y is always zero. The horizontal offset is taken
/// listener-minus-source and negated, which puts sources right of the
/// listener on the right.
pub fn map_to_spatial_coordinates(source: Vec2, listener: Vec2, strength: f32) -> Vec3 {
    let dx = listener.x - source.x;
    let dy = source.y - listener.y;
    Vec3::new(-dx, 0.0, dy) * (strength / PIXELS_PER_UNIT)
}

/// Stereo pan for the fallback path: the user pan, pushed by the horizontal
/// offset normalized to the fade radius.
pub fn stereo_pan(
    user_pan: f32,
    source: Vec2,
    listener: Vec2,
    fade_radius: f32,
    strength: f32,
) -> f32 {
    let offset = if fade_radius > 0.0 {
        ((source.x - listener.x) / fade_radius).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    (user_pan + offset * strength).clamp(-1.0, 1.0)
}
