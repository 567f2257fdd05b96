use crate::media::HtmlAudioMedia;
use mix_core::{AudioGraphHost, HostError, NodeId};
use wasm_bindgen::JsValue;
use web_sys as web;

enum WebNode {
    Destination(web::AudioDestinationNode),
    Gain(web::GainNode),
    Hrtf(web::PannerNode),
    Stereo(web::StereoPannerNode),
    Convolver(web::ConvolverNode),
    Media(web::MediaElementAudioSourceNode),
}

impl WebNode {
    fn audio_node(&self) -> &web::AudioNode {
        match self {
            Self::Destination(n) => n.as_ref(),
            Self::Gain(n) => n.as_ref(),
            Self::Hrtf(n) => n.as_ref(),
            Self::Stereo(n) => n.as_ref(),
            Self::Convolver(n) => n.as_ref(),
            Self::Media(n) => n.as_ref(),
        }
    }

    /// Parameter addressed by the scheduling calls.
    fn primary_param(&self) -> Option<web::AudioParam> {
        match self {
            Self::Gain(n) => Some(n.gain()),
            Self::Stereo(n) => Some(n.pan()),
            _ => None,
        }
    }
}

fn js_err(e: JsValue) -> String {
    format!("{:?}", e)
}

/// WebAudio implementation of the engine's graph host. Node handles live in
/// a slot table indexed by [`NodeId`].
pub struct WebAudioHost {
    ctx: web::AudioContext,
    nodes: Vec<Option<WebNode>>,
}

impl WebAudioHost {
    pub fn new() -> Result<Self, HostError> {
        let ctx = web::AudioContext::new().map_err(|e| {
            log::error!("AudioContext error: {:?}", e);
            HostError::Unavailable
        })?;
        let destination = ctx.destination();
        Ok(Self {
            ctx,
            nodes: vec![Some(WebNode::Destination(destination))],
        })
    }

    pub fn context(&self) -> &web::AudioContext {
        &self.ctx
    }

    /// Browsers start contexts suspended until a user gesture.
    pub fn resume(&self) {
        if let Err(e) = self.ctx.resume() {
            log::warn!("[audio] resume failed: {:?}", e);
        }
    }

    fn insert(&mut self, node: WebNode) -> NodeId {
        self.nodes.push(Some(node));
        NodeId(self.nodes.len() as u32 - 1)
    }

    fn get(&self, id: NodeId) -> Result<&WebNode, HostError> {
        self.nodes
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(HostError::UnknownNode(id))
    }

    fn param(&self, id: NodeId) -> Result<web::AudioParam, HostError> {
        self.get(id)?
            .primary_param()
            .ok_or_else(|| HostError::Schedule(format!("node {:?} has no schedulable param", id)))
    }

    fn gain_node(&self, value: f32) -> Result<web::GainNode, HostError> {
        let g = web::GainNode::new(&self.ctx).map_err(|e| {
            log::error!("GainNode error: {:?}", e);
            HostError::NodeCreation("gain".into())
        })?;
        g.gain().set_value(value);
        Ok(g)
    }

    /// Long, dark stereo impulse response from deterministic noise.
    fn impulse_response(&self, seconds: f32, decay_seconds: f32) -> Option<web::AudioBuffer> {
        let sr = self.ctx.sample_rate();
        let len = (sr * seconds) as u32;
        let ir = self.ctx.create_buffer(2, len.max(1), sr).ok()?;
        let mut seeds: [u32; 2] = [0x1234ABCD, 0x7890FEDC];
        let dt = 1.0 / sr;
        for (ch, seed) in seeds.iter_mut().enumerate() {
            let mut buf = vec![0.0_f32; len as usize];
            let mut t = 0.0_f32;
            for v in buf.iter_mut() {
                // xorshift32
                let mut x = *seed;
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                *seed = x;
                let n = (x as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let decay = (-t / decay_seconds.max(1e-3)).exp();
                let dark = (1.0 - t / seconds).max(0.0);
                *v = n * decay * (0.6 + 0.4 * dark);
                t += dt;
            }
            if let Err(e) = ir.copy_to_channel(&mut buf, ch as i32) {
                log::warn!("[audio] impulse channel {} failed: {:?}", ch, e);
            }
        }
        Some(ir)
    }
}

impl AudioGraphHost for WebAudioHost {
    type Media = HtmlAudioMedia;

    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn destination(&self) -> NodeId {
        NodeId(0)
    }

    fn create_gain(&mut self, initial: f32) -> Result<NodeId, HostError> {
        let g = self.gain_node(initial)?;
        Ok(self.insert(WebNode::Gain(g)))
    }

    fn create_spatializer(&mut self) -> Result<Option<NodeId>, HostError> {
        let panner = match web::PannerNode::new(&self.ctx) {
            Ok(p) => p,
            Err(e) => {
                log::info!("[audio] PannerNode unavailable: {:?}", e);
                return Ok(None);
            }
        };
        panner.set_panning_model(web::PanningModelType::Hrtf);
        panner.set_distance_model(web::DistanceModelType::Inverse);
        panner.set_ref_distance(1.0);
        // distance attenuation is done by the engine's falloff
        panner.set_rolloff_factor(0.0);
        Ok(Some(self.insert(WebNode::Hrtf(panner))))
    }

    fn create_stereo_panner(&mut self) -> Result<NodeId, HostError> {
        let p = web::StereoPannerNode::new(&self.ctx).map_err(|e| {
            log::error!("StereoPannerNode error: {:?}", e);
            HostError::NodeCreation("stereo panner".into())
        })?;
        Ok(self.insert(WebNode::Stereo(p)))
    }

    fn create_reverb(&mut self, seconds: f32, decay_seconds: f32) -> Result<NodeId, HostError> {
        let reverb = web::ConvolverNode::new(&self.ctx).map_err(|e| {
            log::error!("ConvolverNode error: {:?}", e);
            HostError::NodeCreation("convolver".into())
        })?;
        reverb.set_normalize(true);
        match self.impulse_response(seconds, decay_seconds) {
            Some(ir) => reverb.set_buffer(Some(&ir)),
            None => log::warn!("[audio] impulse response unavailable, reverb is silent"),
        }
        Ok(self.insert(WebNode::Convolver(reverb)))
    }

    fn create_media_input(&mut self, media: &HtmlAudioMedia) -> Result<NodeId, HostError> {
        let src = self
            .ctx
            .create_media_element_source(media.element())
            .map_err(|e| HostError::NodeCreation(format!("media source: {}", js_err(e))))?;
        Ok(self.insert(WebNode::Media(src)))
    }

    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), HostError> {
        let dst = self.get(to)?.audio_node();
        self.get(from)?
            .audio_node()
            .connect_with_audio_node(dst)
            .map(|_| ())
            .map_err(|_| HostError::Disconnected(from))
    }

    fn disconnect(&mut self, node: NodeId) -> Result<(), HostError> {
        let n = self
            .nodes
            .get_mut(node.0 as usize)
            .and_then(Option::take)
            .ok_or(HostError::UnknownNode(node))?;
        n.audio_node()
            .disconnect()
            .map_err(|_| HostError::Disconnected(node))
    }

    fn set_value_at_time(&mut self, node: NodeId, value: f32, time: f64) -> Result<(), HostError> {
        self.param(node)?
            .set_value_at_time(value, time)
            .map(|_| ())
            .map_err(|e| HostError::Schedule(js_err(e)))
    }

    fn linear_ramp_to_value_at_time(
        &mut self,
        node: NodeId,
        value: f32,
        time: f64,
    ) -> Result<(), HostError> {
        self.param(node)?
            .linear_ramp_to_value_at_time(value, time)
            .map(|_| ())
            .map_err(|e| HostError::Schedule(js_err(e)))
    }

    fn cancel_scheduled_values(&mut self, node: NodeId, time: f64) -> Result<(), HostError> {
        self.param(node)?
            .cancel_scheduled_values(time)
            .map(|_| ())
            .map_err(|e| HostError::Schedule(js_err(e)))
    }

    fn set_position(&mut self, node: NodeId, position: glam::Vec3) -> Result<(), HostError> {
        match self.get(node)? {
            WebNode::Hrtf(p) => {
                p.position_x().set_value(position.x);
                p.position_y().set_value(position.y);
                p.position_z().set_value(position.z);
                Ok(())
            }
            _ => Err(HostError::Schedule(format!("node {:?} is not a panner", node))),
        }
    }
}
