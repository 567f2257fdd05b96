use crate::host::NodeId;
use crate::scheduler::ScheduledParam;
use crate::spatial::Spatializer;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// What the caller knows about a track before it is loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceSpec {
    pub label: String,
    pub url: String,
    /// Content-relative placement, 0..1 on both axes.
    pub position: Vec2,
    pub volume: f32,
    pub pan: f32,
    pub muted: bool,
    pub solo: bool,
}

impl SourceSpec {
    pub fn new(label: impl Into<String>, url: impl Into<String>, position: Vec2) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            position,
            volume: 1.0,
            pan: 0.0,
            muted: false,
            solo: false,
        }
    }
}

/// Graph nodes owned by one source.
#[derive(Clone, Debug)]
pub struct SourceNodes {
    pub input: NodeId,
    pub gain: ScheduledParam,
    pub spatializer: Spatializer,
    pub dry: NodeId,
    pub reverb_send: ScheduledParam,
}

/// Per-source motion state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub drift_angle: f32,
    /// Radians per 60 Hz frame.
    pub drift_speed: f32,
    /// Angle around the listener, updated each physics step.
    pub orbital_angle: f32,
    /// Multiplier on the configured orbital radius.
    pub orbital_radius: f32,
    /// Multiplier on the configured orbital speed.
    pub orbital_speed: f32,
    /// `1.0` or `-1.0`.
    pub orbital_direction: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            drift_angle: 0.0,
            drift_speed: 0.0,
            orbital_angle: 0.0,
            orbital_radius: 1.0,
            orbital_speed: 1.0,
            orbital_direction: 1.0,
        }
    }
}

/// Physical body of a source: everything the simulator reads and writes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Canvas pixels.
    pub position: Vec2,
    /// Drift anchor, canvas pixels.
    pub base_position: Vec2,
    /// Position in content space; survives canvas resizes.
    pub content_relative: Vec2,
    /// Pixels per 60 Hz frame.
    pub velocity: Vec2,
    pub motion: Motion,
    pub is_dragged: bool,
}

impl Body {
    pub fn at(position: Vec2, content_relative: Vec2) -> Self {
        Self {
            position,
            base_position: position,
            content_relative,
            velocity: Vec2::ZERO,
            motion: Motion::default(),
            is_dragged: false,
        }
    }
}

pub struct Source<M> {
    pub id: SourceId,
    pub label: String,
    pub media: M,
    pub nodes: SourceNodes,
    pub body: Body,
    /// User level, 0..1.
    pub volume: f32,
    /// Stereo fallback only.
    pub pan: f32,
    pub muted: bool,
    pub solo: bool,
    /// Post-falloff volume before staging.
    pub falloff_volume: f32,
    pub target_gain: f32,
    pub current_gain: f32,
    pub reverb_level: f32,
    pub is_active: bool,
}

impl<M> Source<M> {
    /// Muted sources are silent; when anything is soloed only soloed
    /// sources are heard.
    #[inline]
    pub fn is_audible(&self, any_solo: bool) -> bool {
        !self.muted && (!any_solo || self.solo)
    }

    pub fn view(&self) -> SourceView {
        SourceView {
            id: self.id,
            label: self.label.clone(),
            position: self.body.position,
            current_gain: self.current_gain,
            is_active: self.is_active,
            is_dragged: self.body.is_dragged,
        }
    }
}

/// Read-only snapshot for renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceView {
    pub id: SourceId,
    pub label: String,
    pub position: Vec2,
    pub current_gain: f32,
    pub is_active: bool,
    pub is_dragged: bool,
}
