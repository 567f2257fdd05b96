//! Narrow interfaces to the environment that owns real audio.
//!
//! The engine never touches samples. It creates nodes, connects them and
//! schedules values on their primary parameter; the host forwards those calls
//! to whatever renders audio (WebAudio in the browser, an offline timeline on
//! native and in tests).

use glam::Vec3;
use thiserror::Error;

/// Opaque handle to a node created by an [`AudioGraphHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("no audio graph host available")]
    Unavailable,
    #[error("failed to create {0} node")]
    NodeCreation(String),
    #[error("node {0:?} is disconnected")]
    Disconnected(NodeId),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("scheduling failed: {0}")]
    Schedule(String),
}

/// Audio graph primitives used by the mix engine.
///
/// Scheduling calls address a node's primary parameter: `gain` for gain
/// nodes and `pan` for stereo panners. Times are in seconds on the host's
/// audio clock.
pub trait AudioGraphHost {
    type Media: MediaHandle;

    /// Current time of the audio clock in seconds.
    fn current_time(&self) -> f64;

    /// Final output node.
    fn destination(&self) -> NodeId;

    fn create_gain(&mut self, initial: f32) -> Result<NodeId, HostError>;

    /// Creates an HRTF panner, or returns `Ok(None)` when the environment
    /// lacks one. Callers fall back to [`AudioGraphHost::create_stereo_panner`].
    fn create_spatializer(&mut self) -> Result<Option<NodeId>, HostError>;

    fn create_stereo_panner(&mut self) -> Result<NodeId, HostError>;

    /// Creates a convolution reverb loaded with a decaying impulse response.
    fn create_reverb(&mut self, seconds: f32, decay_seconds: f32) -> Result<NodeId, HostError>;

    /// Wraps a media handle as a graph input.
    fn create_media_input(&mut self, media: &Self::Media) -> Result<NodeId, HostError>;

    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), HostError>;

    /// Detaches every outgoing connection of `node`.
    fn disconnect(&mut self, node: NodeId) -> Result<(), HostError>;

    fn set_value_at_time(&mut self, node: NodeId, value: f32, time: f64) -> Result<(), HostError>;

    fn linear_ramp_to_value_at_time(
        &mut self,
        node: NodeId,
        value: f32,
        time: f64,
    ) -> Result<(), HostError>;

    fn cancel_scheduled_values(&mut self, node: NodeId, time: f64) -> Result<(), HostError>;

    /// Moves an HRTF panner relative to a listener fixed at the origin.
    fn set_position(&mut self, node: NodeId, position: Vec3) -> Result<(), HostError>;
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MediaError {
    /// A play request was cut short by a pause (or the reverse). Expected
    /// when transport is toggled quickly.
    #[error("playback interrupted")]
    Interrupted,
    #[error("media not ready")]
    NotReady,
    #[error("media failure: {0}")]
    Failed(String),
}

/// Playable handle for one track, owned by the engine once loaded.
pub trait MediaHandle {
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self) -> Result<(), MediaError>;
    fn seek(&mut self, seconds: f64) -> Result<(), MediaError>;
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    /// Length in seconds, `0.0` when unknown.
    fn duration(&self) -> f64;
    fn is_ready(&self) -> bool;

    fn stop(&mut self) -> Result<(), MediaError> {
        self.pause()?;
        self.seek(0.0)
    }
}
