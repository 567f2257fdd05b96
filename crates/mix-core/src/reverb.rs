//! Shared convolution reverb bus and per-source send levels.

use crate::constants::{
    REVERB_BASE_SEND, REVERB_DISTANCE_SCALE, REVERB_IR_DECAY_SECONDS, REVERB_IR_SECONDS,
    REVERB_WET_LEVEL,
};
use crate::host::{AudioGraphHost, HostError, NodeId};

pub struct ReverbBus {
    pub input: NodeId,
    pub convolver: NodeId,
    pub wet: NodeId,
}

impl ReverbBus {
    /// `input -> convolver -> wet -> output`.
    pub fn build<H: AudioGraphHost>(host: &mut H, output: NodeId) -> Result<Self, HostError> {
        let input = host.create_gain(1.0)?;
        let convolver = host.create_reverb(REVERB_IR_SECONDS, REVERB_IR_DECAY_SECONDS)?;
        let wet = host.create_gain(REVERB_WET_LEVEL)?;
        host.connect(input, convolver)?;
        host.connect(convolver, wet)?;
        host.connect(wet, output)?;
        Ok(Self {
            input,
            convolver,
            wet,
        })
    }
}

/// Send gain into the reverb bus.
///
/// `reverb_amount * REVERB_BASE_SEND`, raised for distant sources when
/// `distance_scaling` is on. `normalized_distance` is distance over fade
/// radius; the dry path is not touched here.
pub fn send_level(reverb_amount: f32, normalized_distance: f32, distance_scaling: bool) -> f32 {
    let base = reverb_amount.max(0.0) * REVERB_BASE_SEND;
    let scaled = if distance_scaling {
        base * (1.0 + REVERB_DISTANCE_SCALE * normalized_distance.clamp(0.0, 1.0))
    } else {
        base
    };
    scaled.clamp(0.0, 1.0)
}
