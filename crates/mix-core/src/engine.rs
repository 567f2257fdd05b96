//! The mix engine context.
//!
//! Owns every source, the transport fade, the listener and the display
//! geometry. The caller owns the engine and passes the audio graph host into
//! each call; nothing here is global.
//!
//! Per tick: physics moves free sources, falloff turns listener distance into
//! a volume, staging bounds the sum, the fade state decides how gains may be
//! written, then spatializer and reverb sends follow the new positions.

use crate::config::{OptionValue, Options};
use crate::constants::{
    ACTIVE_GAIN_THRESHOLD, DRIFT_SPEED_MAX, DRIFT_SPEED_MIN, DRIFT_TOLERANCE_SECS, DRY_LEVEL,
    GAIN_EPSILON, MASTER_BUS_LEVEL, ORBIT_JITTER, SOURCE_HIT_RADIUS,
};
use crate::error::{MixError, Result};
use crate::fade::{FadePhase, FadeState, GainWrite};
use crate::falloff::{compute_volume, scaled_fade_radius};
use crate::geometry::ContentDisplayArea;
use crate::host::{AudioGraphHost, HostError, MediaError, MediaHandle, NodeId};
use crate::listener::Listener;
use crate::loader::{LoadError, LoadStage, LoadedMedia};
use crate::physics;
use crate::reverb::{self, ReverbBus};
use crate::scheduler::ScheduledParam;
use crate::smoothing::{smooth_toward, smoothing_rate};
use crate::source::{Body, Motion, Source, SourceId, SourceNodes, SourceSpec, SourceView};
use crate::spatial::{map_to_spatial_coordinates, stereo_pan, Spatializer};
use crate::staging;
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    /// Fading out; media pauses when the fade completes.
    Pausing,
    /// Fading out; media stops and rewinds when the fade completes.
    Stopping,
    Paused,
}

/// Pointer input in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),
    Left,
    DragStart(Vec2),
    DragMove(Vec2),
    DragEnd,
}

fn log_skip(label: &str, what: &str, err: &HostError) {
    log::warn!("[mix] {}: {} skipped: {}", label, what, err);
}

fn start_media<M: MediaHandle>(media: &mut M, label: &str) {
    match media.play() {
        Ok(()) => {}
        Err(MediaError::Interrupted) => log::debug!("[transport] {}: play interrupted", label),
        Err(e) => log::warn!("[transport] {}: play failed: {}", label, e),
    }
}

fn halt_media<M: MediaHandle>(media: &mut M, label: &str, rewind: bool) {
    let result = if rewind { media.stop() } else { media.pause() };
    match result {
        Ok(()) => {}
        Err(MediaError::Interrupted) => log::debug!("[transport] {}: halt interrupted", label),
        Err(e) => log::warn!("[transport] {}: halt failed: {}", label, e),
    }
}

pub struct MixEngine<H: AudioGraphHost> {
    options: Options,
    sources: Vec<Source<H::Media>>,
    next_id: u32,
    master: NodeId,
    reverb: ReverbBus,
    fade: FadeState,
    transport: TransportState,
    listener: Listener,
    area: ContentDisplayArea,
    rng: StdRng,
}

impl<H: AudioGraphHost> MixEngine<H> {
    /// Builds the master and reverb buses. A host that cannot create them is
    /// reported here, once; playback cannot start without an engine.
    pub fn new(host: &mut H, options: Options, seed: u64) -> Result<Self> {
        let master = host.create_gain(MASTER_BUS_LEVEL).inspect_err(|e| {
            log::error!("[engine] audio graph host unavailable: {}", e);
        })?;
        let destination = host.destination();
        host.connect(master, destination)?;
        let reverb = ReverbBus::build(host, master)?;
        log::info!("[engine] ready (seed {})", seed);
        Ok(Self {
            options,
            sources: Vec::new(),
            next_id: 0,
            master,
            reverb,
            fade: FadeState::default(),
            transport: TransportState::Stopped,
            listener: Listener::default(),
            area: ContentDisplayArea::default(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    // ---------------- Accessors ----------------

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn area(&self) -> &ContentDisplayArea {
        &self.area
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn fade(&self) -> &FadeState {
        &self.fade
    }

    pub fn master(&self) -> NodeId {
        self.master
    }

    pub fn reverb_bus(&self) -> &ReverbBus {
        &self.reverb
    }

    pub fn sources(&self) -> &[Source<H::Media>] {
        &self.sources
    }

    pub fn source(&self, id: SourceId) -> Option<&Source<H::Media>> {
        self.sources.iter().find(|s| s.id == id)
    }

    fn source_mut(&mut self, id: SourceId) -> Result<&mut Source<H::Media>> {
        self.sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(MixError::UnknownSource(id))
    }

    /// Snapshot for renderers.
    pub fn views(&self) -> Vec<SourceView> {
        self.sources.iter().map(Source::view).collect()
    }

    pub fn effective_listener(&self) -> Vec2 {
        self.listener.effective_position(&self.area)
    }

    pub fn fade_radius(&self) -> f32 {
        scaled_fade_radius(self.options.mix.fade_radius, self.area.width)
    }

    // ---------------- Sources ----------------

    /// Wires a loaded track into the graph:
    /// `media -> gain -> spatializer -> dry -> master` and
    /// `gain -> reverb send -> reverb bus`.
    pub fn add_source(
        &mut self,
        host: &mut H,
        spec: &SourceSpec,
        loaded: LoadedMedia<H::Media>,
    ) -> Result<SourceId> {
        let connect_err = |e: HostError| MixError::from(LoadError::new(LoadStage::Connect, spec, e));

        let input = host.create_media_input(&loaded.media).map_err(connect_err)?;
        let gain = host.create_gain(0.0).map_err(connect_err)?;
        let spatializer = Spatializer::create(host).map_err(connect_err)?;
        let dry = host.create_gain(DRY_LEVEL).map_err(connect_err)?;
        let send = host.create_gain(0.0).map_err(connect_err)?;
        for (from, to) in [
            (input, gain),
            (gain, spatializer.node()),
            (spatializer.node(), dry),
            (dry, self.master),
            (gain, send),
            (send, self.reverb.input),
        ] {
            host.connect(from, to).map_err(connect_err)?;
        }

        let rel = spec.position.clamp(Vec2::ZERO, Vec2::ONE);
        let mut body = Body::at(self.area.content_relative_to_screen(rel), rel);
        body.motion = Motion {
            drift_angle: self.rng.gen_range(0.0..std::f32::consts::TAU),
            drift_speed: self.rng.gen_range(DRIFT_SPEED_MIN..DRIFT_SPEED_MAX),
            orbital_angle: 0.0,
            orbital_radius: 1.0 + self.rng.gen_range(-ORBIT_JITTER..ORBIT_JITTER),
            orbital_speed: 1.0 + self.rng.gen_range(-ORBIT_JITTER..ORBIT_JITTER),
            orbital_direction: if self.rng.gen::<bool>() { 1.0 } else { -1.0 },
        };

        let id = SourceId(self.next_id);
        self.next_id += 1;
        let mut source = Source {
            id,
            label: spec.label.clone(),
            media: loaded.media,
            nodes: SourceNodes {
                input,
                gain: ScheduledParam::new(gain, 0.0),
                spatializer,
                dry,
                reverb_send: ScheduledParam::new(send, 0.0),
            },
            body,
            volume: spec.volume.clamp(0.0, 1.0),
            pan: spec.pan.clamp(-1.0, 1.0),
            muted: spec.muted,
            solo: spec.solo,
            falloff_volume: 0.0,
            target_gain: 0.0,
            current_gain: 0.0,
            reverb_level: 0.0,
            is_active: false,
        };
        if self.transport == TransportState::Playing {
            start_media(&mut source.media, &source.label);
        }
        log::info!(
            "[engine] source {} `{}` at ({:.2},{:.2}) {:?}",
            id.0,
            source.label,
            rel.x,
            rel.y,
            spatializer
        );
        self.sources.push(source);
        Ok(id)
    }

    /// Detaches and drops a source. Teardown failures are logged only.
    pub fn remove_source(&mut self, host: &mut H, id: SourceId) -> Result<()> {
        let index = self
            .sources
            .iter()
            .position(|s| s.id == id)
            .ok_or(MixError::UnknownSource(id))?;
        let mut source = self.sources.remove(index);
        halt_media(&mut source.media, &source.label, false);
        let nodes = &source.nodes;
        for node in [
            nodes.input,
            nodes.gain.node(),
            nodes.spatializer.node(),
            nodes.dry,
            nodes.reverb_send.node(),
        ] {
            if let Err(e) = host.disconnect(node) {
                log_skip(&source.label, "disconnect", &e);
            }
        }
        Ok(())
    }

    pub fn set_volume(&mut self, id: SourceId, volume: f32) -> Result<()> {
        self.source_mut(id)?.volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn set_pan(&mut self, id: SourceId, pan: f32) -> Result<()> {
        self.source_mut(id)?.pan = pan.clamp(-1.0, 1.0);
        Ok(())
    }

    pub fn set_muted(&mut self, id: SourceId, muted: bool) -> Result<()> {
        self.source_mut(id)?.muted = muted;
        Ok(())
    }

    pub fn set_solo(&mut self, id: SourceId, solo: bool) -> Result<()> {
        self.source_mut(id)?.solo = solo;
        Ok(())
    }

    pub fn toggle_solo(&mut self, id: SourceId) -> Result<bool> {
        let source = self.source_mut(id)?;
        source.solo = !source.solo;
        Ok(source.solo)
    }

    pub fn set_option(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        self.options.set(name, value)?;
        Ok(())
    }

    // ---------------- Geometry and input ----------------

    /// Recomputes the display area and re-resolves every source from its
    /// content-relative position, so resizing never moves a source relative
    /// to the content.
    pub fn set_content_geometry(&mut self, canvas: Vec2, content: Vec2) {
        let old = self.area;
        self.area = ContentDisplayArea::fit(canvas, content);
        for s in &mut self.sources {
            let anchor = old.screen_to_content_relative(s.body.base_position);
            s.body.base_position = self.area.content_relative_to_screen(anchor);
            s.body.position = self.area.content_relative_to_screen(s.body.content_relative);
        }
        log::debug!(
            "[engine] display area {:.0}x{:.0} at ({:.0},{:.0})",
            self.area.width,
            self.area.height,
            self.area.x,
            self.area.y
        );
    }

    /// Places the listener at a content-relative point (animated or GPS
    /// drivers).
    pub fn set_listener_relative(&mut self, rel: Vec2) {
        self.listener.pointer = Some(self.area.content_relative_to_screen(rel));
    }

    pub fn dragged(&self) -> Option<SourceId> {
        self.sources.iter().find(|s| s.body.is_dragged).map(|s| s.id)
    }

    /// Nearest source within the pick radius of `p`.
    pub fn hit_test(&self, p: Vec2) -> Option<SourceId> {
        self.sources
            .iter()
            .map(|s| (s.id, s.body.position.distance(p)))
            .filter(|(_, d)| *d <= SOURCE_HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Applies pointer input. Returns the source grabbed or released by a
    /// drag event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<SourceId> {
        match event {
            PointerEvent::Moved(p) => {
                self.listener.pointer = Some(p);
                None
            }
            PointerEvent::Left => {
                self.listener.pointer = None;
                None
            }
            PointerEvent::DragStart(p) => {
                self.listener.pointer = Some(p);
                let id = self.hit_test(p)?;
                let source = self.sources.iter_mut().find(|s| s.id == id)?;
                source.body.is_dragged = true;
                source.body.velocity = Vec2::ZERO;
                log::info!("[pointer] begin drag on source {}", id.0);
                Some(id)
            }
            PointerEvent::DragMove(p) => {
                self.listener.pointer = Some(p);
                let area = self.area;
                let source = self.sources.iter_mut().find(|s| s.body.is_dragged)?;
                let clamped = area.clamp(p);
                source.body.position = clamped;
                source.body.content_relative = area.screen_to_content_relative(clamped);
                source.body.velocity = Vec2::ZERO;
                Some(source.id)
            }
            PointerEvent::DragEnd => {
                let source = self.sources.iter_mut().find(|s| s.body.is_dragged)?;
                source.body.is_dragged = false;
                source.body.base_position = source.body.position;
                log::info!("[pointer] drop source {}", source.id.0);
                Some(source.id)
            }
        }
    }

    // ---------------- Transport ----------------

    /// Fades every audible source in from silence and starts media. A no-op
    /// while already playing; a pending pause or stop is replaced.
    pub fn play(&mut self, host: &mut H) {
        if self.transport == TransportState::Playing {
            log::debug!("[transport] play ignored, already playing");
            return;
        }
        let now = host.current_time();
        let duration = self.options.mix.fade_duration.max(0.0) as f64;
        self.transport = TransportState::Playing;
        self.update_targets();
        let any_solo = self.any_solo();
        for s in &mut self.sources {
            let result = if s.is_audible(any_solo) {
                s.nodes
                    .gain
                    .schedule_ramp(host, 0.0, s.target_gain, now, now + duration)
            } else {
                s.nodes.gain.write(host, 0.0, now)
            };
            if let Err(e) = result {
                log_skip(&s.label, "fade-in", &e);
            }
            s.current_gain = 0.0;
            start_media(&mut s.media, &s.label);
        }
        self.fade.fade_in(now, duration);
        log::info!("[transport] play (fade {:.2}s)", duration);
    }

    pub fn pause(&mut self, host: &mut H) {
        self.fade_out(host, TransportState::Pausing);
    }

    pub fn stop(&mut self, host: &mut H) {
        self.fade_out(host, TransportState::Stopping);
    }

    fn fade_out(&mut self, host: &mut H, next: TransportState) {
        match (self.transport, next) {
            (TransportState::Stopped, _) | (TransportState::Paused, TransportState::Pausing) => {
                return;
            }
            (TransportState::Paused, TransportState::Stopping) => {
                for s in &mut self.sources {
                    halt_media(&mut s.media, &s.label, true);
                }
                self.transport = TransportState::Stopped;
                return;
            }
            _ => {}
        }
        let now = host.current_time();
        let duration = self.options.mix.fade_duration.max(0.0) as f64;
        for s in &mut self.sources {
            let from = s.nodes.gain.value_at(now);
            if let Err(e) = s.nodes.gain.schedule_ramp(host, from, 0.0, now, now + duration) {
                log_skip(&s.label, "fade-out", &e);
            }
        }
        self.fade.fade_out(now, duration);
        self.transport = next;
        log::info!("[transport] {:?} (fade {:.2}s)", next, duration);
        if let Some(done) = self.fade.settle(now) {
            self.finish_fade(done, now);
        }
    }

    fn finish_fade(&mut self, done: FadePhase, now: f64) {
        if done == FadePhase::FadingIn {
            // smoothing continues from where the ramp landed
            for s in &mut self.sources {
                s.current_gain = s.nodes.gain.value_at(now);
            }
            return;
        }
        let (rewind, settled) = match self.transport {
            TransportState::Pausing => (false, TransportState::Paused),
            TransportState::Stopping => (true, TransportState::Stopped),
            _ => return,
        };
        for s in &mut self.sources {
            halt_media(&mut s.media, &s.label, rewind);
            s.current_gain = 0.0;
            s.is_active = false;
        }
        self.transport = settled;
        log::info!("[transport] {:?}", settled);
    }

    /// Re-seeks media whose clock wandered from the first ready track.
    /// Meant for a ~20 Hz timer; returns how many handles were corrected.
    pub fn resync(&mut self) -> usize {
        if self.transport != TransportState::Playing {
            return 0;
        }
        let Some(reference) = self
            .sources
            .iter()
            .find(|s| s.media.is_ready())
            .map(|s| s.media.current_time())
        else {
            return 0;
        };
        let mut corrected = 0;
        for s in &mut self.sources {
            if !s.media.is_ready() {
                continue;
            }
            let duration = s.media.duration();
            let want = if duration > 0.0 {
                reference % duration
            } else {
                reference
            };
            let mut diff = (s.media.current_time() - want).abs();
            if duration > 0.0 {
                diff = diff.min(duration - diff);
            }
            if diff > DRIFT_TOLERANCE_SECS {
                match s.media.seek(want) {
                    Ok(()) => {
                        corrected += 1;
                        log::debug!("[transport] {}: resync by {:.3}s", s.label, diff);
                    }
                    Err(e) => log::warn!("[transport] {}: resync failed: {}", s.label, e),
                }
            }
        }
        corrected
    }

    // ---------------- Tick ----------------

    /// One frame. `elapsed_secs` is wall time since the previous tick.
    pub fn tick(&mut self, host: &mut H, elapsed_secs: f32) {
        let now = host.current_time();
        if let Some(done) = self.fade.settle(now) {
            self.finish_fade(done, now);
        }

        match physics::normalize_dt(elapsed_secs) {
            Some(dt) => {
                let listener = self.listener.valid_position(&self.area);
                let mut bodies: SmallVec<[&mut Body; 16]> =
                    self.sources.iter_mut().map(|s| &mut s.body).collect();
                physics::step(&mut bodies, listener, &self.area, &self.options.physics, dt);
            }
            None => log::debug!("[physics] skipped tick with dt {}", elapsed_secs),
        }

        self.update_targets();
        self.write_gains(host, now);
        self.update_spatial(host, now);
    }

    fn any_solo(&self) -> bool {
        self.sources.iter().any(|s| s.solo)
    }

    /// Falloff, activity and staged target gain for every source.
    fn update_targets(&mut self) {
        let listener = self.effective_listener();
        let radius = self.fade_radius();
        let mix = &self.options.mix;
        let any_solo = self.any_solo();
        let playing = self.transport == TransportState::Playing;

        for s in &mut self.sources {
            s.falloff_volume = if s.is_audible(any_solo) {
                compute_volume(s.volume, s.body.position, listener, radius, mix.center_boost)
            } else {
                0.0
            };
            s.is_active = playing && s.falloff_volume > ACTIVE_GAIN_THRESHOLD;
        }

        let active = if playing {
            staging::count_active(
                self.sources.iter().map(|s| s.falloff_volume),
                ACTIVE_GAIN_THRESHOLD,
            )
        } else {
            0
        };
        let reduction = staging::reduction_factor(active);
        for s in &mut self.sources {
            let staged = staging::stage_gain(s.falloff_volume, mix.max_source_gain, reduction);
            s.target_gain = (staged * mix.master_volume).clamp(0.0, 1.0);
        }
    }

    fn write_gains(&mut self, host: &mut H, now: f64) {
        if self.transport != TransportState::Playing {
            return;
        }
        match self.fade.gain_write(now) {
            GainWrite::Skip => {}
            GainWrite::RampUntil(deadline) => {
                for s in &mut self.sources {
                    let from = s.nodes.gain.value_at(now);
                    s.current_gain = from;
                    if let Err(e) = s
                        .nodes
                        .gain
                        .schedule_ramp(host, from, s.target_gain, now, deadline)
                    {
                        log_skip(&s.label, "gain ramp", &e);
                    }
                }
            }
            GainWrite::Direct => {
                let rate = smoothing_rate(self.options.mix.fade_speed);
                for s in &mut self.sources {
                    let next = smooth_toward(s.current_gain, s.target_gain, rate).clamp(0.0, 1.0);
                    s.current_gain = next;
                    if (next - s.nodes.gain.value_at(now)).abs() <= GAIN_EPSILON {
                        continue;
                    }
                    if let Err(e) = s.nodes.gain.write(host, next, now) {
                        log_skip(&s.label, "gain", &e);
                    }
                }
            }
        }
    }

    fn update_spatial(&mut self, host: &mut H, now: f64) {
        let listener = self.effective_listener();
        let radius = self.fade_radius();
        let mix = &self.options.mix;
        let strength = if mix.spatial_audio_enabled {
            mix.spatial_audio_strength
        } else {
            0.0
        };

        for s in &mut self.sources {
            let pos = s.body.position;
            let placed = match s.nodes.spatializer {
                Spatializer::Hrtf(node) => {
                    host.set_position(node, map_to_spatial_coordinates(pos, listener, strength))
                }
                Spatializer::StereoPan(node) => {
                    let pan = stereo_pan(s.pan, pos, listener, radius, strength);
                    host.cancel_scheduled_values(node, now)
                        .and_then(|()| host.set_value_at_time(node, pan, now))
                }
            };
            if let Err(e) = placed {
                log_skip(&s.label, "spatial position", &e);
            }

            let level = if mix.reverb_enabled {
                let normalized = if radius > 0.0 {
                    pos.distance(listener) / radius
                } else {
                    1.0
                };
                reverb::send_level(mix.reverb_amount, normalized, mix.reverb_distance_scaling)
            } else {
                0.0
            };
            if (level - s.reverb_level).abs() > GAIN_EPSILON
                || (level - s.nodes.reverb_send.value_at(now)).abs() > GAIN_EPSILON
            {
                match s.nodes.reverb_send.write(host, level, now) {
                    Ok(()) => s.reverb_level = level,
                    Err(e) => log_skip(&s.label, "reverb send", &e),
                }
            }
        }
    }
}
