//! Offline audio graph host.
//!
//! Keeps a WebAudio-style automation timeline per node and a manually
//! advanced clock. Nothing is rendered; the timeline can be evaluated at any
//! time, which is what the native front-end and the tests need.

use crate::host::{AudioGraphHost, HostError, MediaError, MediaHandle, NodeId};
use crate::loader::MediaLoader;
use crate::source::SourceSpec;
use async_trait::async_trait;
use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec3;
use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamEvent {
    SetValue { value: f32, time: f64 },
    LinearRamp { value: f32, time: f64 },
}

impl ParamEvent {
    #[inline]
    pub fn time(&self) -> f64 {
        match *self {
            Self::SetValue { time, .. } | Self::LinearRamp { time, .. } => time,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        match *self {
            Self::SetValue { value, .. } | Self::LinearRamp { value, .. } => value,
        }
    }
}

/// Automation for one parameter. Events are kept sorted by time; a ramp
/// starts from the event before it.
#[derive(Clone, Debug, Default)]
pub struct ParamTimeline {
    base: f32,
    base_time: f64,
    events: SmallVec<[ParamEvent; 4]>,
}

impl ParamTimeline {
    fn new(value: f32) -> Self {
        Self {
            base: value,
            ..Default::default()
        }
    }

    fn insert(&mut self, ev: ParamEvent) {
        let at = self
            .events
            .iter()
            .position(|e| e.time() > ev.time())
            .unwrap_or(self.events.len());
        self.events.insert(at, ev);
    }

    fn cancel(&mut self, time: f64) {
        self.events.retain(|e| e.time() < time);
    }

    /// Folds events that are entirely in the past into the base value.
    fn compact(&mut self, now: f64) {
        let past = self.events.iter().take_while(|e| e.time() <= now).count();
        if past > 1 {
            let keep_from = past - 1;
            let folded = self.events[keep_from - 1];
            self.base = folded.value();
            self.base_time = folded.time();
            self.events.drain(..keep_from);
        }
    }

    pub fn value_at(&self, time: f64) -> f32 {
        let mut value = self.base;
        let mut prev_time = self.base_time;
        for ev in &self.events {
            match *ev {
                ParamEvent::SetValue { value: v, time: t } => {
                    if t > time {
                        break;
                    }
                    value = v;
                    prev_time = t;
                }
                ParamEvent::LinearRamp { value: v, time: t } => {
                    if t <= time {
                        value = v;
                        prev_time = t;
                        continue;
                    }
                    let span = t - prev_time;
                    if span > 0.0 {
                        let frac = ((time - prev_time) / span).clamp(0.0, 1.0) as f32;
                        value += (v - value) * frac;
                    }
                    break;
                }
            }
        }
        value
    }

    pub fn events(&self) -> &[ParamEvent] {
        &self.events
    }

    /// Ramps that have not finished at `now`.
    pub fn pending_ramps(&self, now: f64) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ParamEvent::LinearRamp { time, .. } if *time > now))
            .count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Destination,
    Gain,
    Hrtf,
    StereoPanner,
    Reverb,
    MediaInput,
}

#[derive(Clone, Debug)]
pub struct OfflineNode {
    pub kind: NodeKind,
    pub param: ParamTimeline,
    pub position: Vec3,
    pub outputs: SmallVec<[NodeId; 2]>,
}

/// Shared, manually advanced audio clock.
pub type Clock = Rc<Cell<f64>>;

pub struct OfflineHost {
    clock: Clock,
    nodes: FnvHashMap<NodeId, OfflineNode>,
    next_id: u32,
    destination: NodeId,
    hrtf_supported: bool,
    available: bool,
    broken: FnvHashSet<NodeId>,
}

impl Default for OfflineHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OfflineHost {
    pub fn new() -> Self {
        let destination = NodeId(0);
        let mut nodes = FnvHashMap::default();
        nodes.insert(
            destination,
            OfflineNode {
                kind: NodeKind::Destination,
                param: ParamTimeline::new(1.0),
                position: Vec3::ZERO,
                outputs: SmallVec::new(),
            },
        );
        Self {
            clock: Rc::new(Cell::new(0.0)),
            nodes,
            next_id: 1,
            destination,
            hrtf_supported: true,
            available: true,
            broken: FnvHashSet::default(),
        }
    }

    /// Host without an HRTF panner, forcing the stereo fallback.
    pub fn without_hrtf() -> Self {
        Self {
            hrtf_supported: false,
            ..Self::new()
        }
    }

    /// Host that refuses to build any node, like a browser without WebAudio.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock.clone()
    }

    pub fn advance(&mut self, seconds: f64) {
        self.clock.set(self.clock.get() + seconds.max(0.0));
    }

    pub fn node(&self, id: NodeId) -> Option<&OfflineNode> {
        self.nodes.get(&id)
    }

    /// Primary parameter value of `id` at `time`.
    pub fn value_at(&self, id: NodeId, time: f64) -> Option<f32> {
        self.nodes.get(&id).map(|n| n.param.value_at(time))
    }

    pub fn timeline(&self, id: NodeId) -> Option<&ParamTimeline> {
        self.nodes.get(&id).map(|n| &n.param)
    }

    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes
            .get(&from)
            .is_some_and(|n| n.outputs.contains(&to))
    }

    /// Makes every later call on `id` fail as if the node were torn down.
    pub fn break_node(&mut self, id: NodeId) {
        self.broken.insert(id);
    }

    fn add(&mut self, kind: NodeKind, initial: f32) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            OfflineNode {
                kind,
                param: ParamTimeline::new(initial),
                position: Vec3::ZERO,
                outputs: SmallVec::new(),
            },
        );
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut OfflineNode, HostError> {
        if self.broken.contains(&id) {
            return Err(HostError::Disconnected(id));
        }
        self.nodes.get_mut(&id).ok_or(HostError::UnknownNode(id))
    }
}

impl AudioGraphHost for OfflineHost {
    type Media = OfflineMedia;

    fn current_time(&self) -> f64 {
        self.clock.get()
    }

    fn destination(&self) -> NodeId {
        self.destination
    }

    fn create_gain(&mut self, initial: f32) -> Result<NodeId, HostError> {
        if !self.available {
            return Err(HostError::Unavailable);
        }
        Ok(self.add(NodeKind::Gain, initial))
    }

    fn create_spatializer(&mut self) -> Result<Option<NodeId>, HostError> {
        Ok(self
            .hrtf_supported
            .then(|| self.add(NodeKind::Hrtf, 0.0)))
    }

    fn create_stereo_panner(&mut self) -> Result<NodeId, HostError> {
        Ok(self.add(NodeKind::StereoPanner, 0.0))
    }

    fn create_reverb(&mut self, seconds: f32, _decay_seconds: f32) -> Result<NodeId, HostError> {
        if seconds.is_nan() || seconds <= 0.0 {
            return Err(HostError::NodeCreation("reverb".into()));
        }
        Ok(self.add(NodeKind::Reverb, 1.0))
    }

    fn create_media_input(&mut self, _media: &OfflineMedia) -> Result<NodeId, HostError> {
        Ok(self.add(NodeKind::MediaInput, 1.0))
    }

    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), HostError> {
        if !self.nodes.contains_key(&to) {
            return Err(HostError::UnknownNode(to));
        }
        let node = self.node_mut(from)?;
        if !node.outputs.contains(&to) {
            node.outputs.push(to);
        }
        Ok(())
    }

    fn disconnect(&mut self, node: NodeId) -> Result<(), HostError> {
        self.node_mut(node)?.outputs.clear();
        Ok(())
    }

    fn set_value_at_time(&mut self, node: NodeId, value: f32, time: f64) -> Result<(), HostError> {
        let now = self.clock.get();
        let param = &mut self.node_mut(node)?.param;
        param.insert(ParamEvent::SetValue { value, time });
        param.compact(now);
        Ok(())
    }

    fn linear_ramp_to_value_at_time(
        &mut self,
        node: NodeId,
        value: f32,
        time: f64,
    ) -> Result<(), HostError> {
        self.node_mut(node)?
            .param
            .insert(ParamEvent::LinearRamp { value, time });
        Ok(())
    }

    fn cancel_scheduled_values(&mut self, node: NodeId, time: f64) -> Result<(), HostError> {
        self.node_mut(node)?.param.cancel(time);
        Ok(())
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) -> Result<(), HostError> {
        self.node_mut(node)?.position = position;
        Ok(())
    }
}

/// Media handle whose playback position follows the host clock.
pub struct OfflineMedia {
    clock: Clock,
    duration: f64,
    /// Playback speed relative to the clock; not 1.0 to simulate a drifting
    /// element.
    pub rate: f64,
    offset: f64,
    started_at: Option<f64>,
    /// Error returned by the next `play` call, then cleared.
    pub fail_next_play: Option<MediaError>,
}

impl OfflineMedia {
    pub fn new(clock: Clock, duration: f64) -> Self {
        Self {
            clock,
            duration,
            rate: 1.0,
            offset: 0.0,
            started_at: None,
            fail_next_play: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn position(&self) -> f64 {
        let raw = match self.started_at {
            Some(start) => self.offset + (self.clock.get() - start) * self.rate,
            None => self.offset,
        };
        if self.duration > 0.0 {
            raw % self.duration
        } else {
            raw
        }
    }
}

impl MediaHandle for OfflineMedia {
    fn play(&mut self) -> Result<(), MediaError> {
        if let Some(err) = self.fail_next_play.take() {
            return Err(err);
        }
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.get());
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.offset = self.position();
        self.started_at = None;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<(), MediaError> {
        self.offset = seconds.max(0.0);
        if self.started_at.is_some() {
            self.started_at = Some(self.clock.get());
        }
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.position()
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Loader producing [`OfflineMedia`] on a shared clock.
pub struct OfflineLoader {
    clock: Clock,
    default_duration: f64,
    durations: FnvHashMap<String, f64>,
    missing: FnvHashSet<String>,
}

impl OfflineLoader {
    pub fn new(clock: Clock, default_duration: f64) -> Self {
        Self {
            clock,
            default_duration,
            durations: FnvHashMap::default(),
            missing: FnvHashSet::default(),
        }
    }

    pub fn with_duration(mut self, url: impl Into<String>, seconds: f64) -> Self {
        self.durations.insert(url.into(), seconds);
        self
    }

    /// Makes `url` fail at the open stage.
    pub fn with_missing(mut self, url: impl Into<String>) -> Self {
        self.missing.insert(url.into());
        self
    }
}

#[async_trait(?Send)]
impl MediaLoader for OfflineLoader {
    type Media = OfflineMedia;

    async fn open(&self, spec: &SourceSpec) -> anyhow::Result<OfflineMedia> {
        if self.missing.contains(&spec.url) {
            anyhow::bail!("no such media: {}", spec.url);
        }
        let duration = self
            .durations
            .get(&spec.url)
            .copied()
            .unwrap_or(self.default_duration);
        Ok(OfflineMedia::new(self.clock.clone(), duration))
    }

    async fn wait_ready(&self, media: &mut OfflineMedia) -> anyhow::Result<()> {
        if !media.duration.is_finite() || media.duration < 0.0 {
            anyhow::bail!("undecodable media (duration {})", media.duration);
        }
        Ok(())
    }
}
