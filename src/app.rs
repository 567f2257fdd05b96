use crate::host::WebAudioHost;
use crate::input::PointerState;
use glam::Vec2;
use mix_core::{MixEngine, PointerEvent, TransportState};
use std::cell::RefCell;
use std::rc::Rc;

pub struct App {
    pub host: WebAudioHost,
    pub engine: MixEngine<WebAudioHost>,
    pub pointer: PointerState,
}

pub type SharedApp = Rc<RefCell<App>>;

/// Runs `f` unless another callback currently holds the app; the event is
/// dropped in that case.
pub fn with_app<R>(app: &SharedApp, f: impl FnOnce(&mut App) -> R) -> Option<R> {
    match app.try_borrow_mut() {
        Ok(mut a) => Some(f(&mut a)),
        Err(_) => {
            log::debug!("[app] busy, event dropped");
            None
        }
    }
}

impl App {
    pub fn play(&mut self) {
        self.host.resume();
        self.engine.play(&mut self.host);
    }

    pub fn pause(&mut self) {
        self.engine.pause(&mut self.host);
    }

    pub fn stop(&mut self) {
        self.engine.stop(&mut self.host);
    }

    pub fn toggle(&mut self) {
        match self.engine.transport() {
            TransportState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    pub fn pointer(&mut self, ev: PointerEvent) {
        if let Some(id) = self.engine.handle_pointer(ev) {
            log::debug!("[pointer] {:?} -> source {}", ev, id.0);
        }
    }

    pub fn resize(&mut self, canvas: Vec2, content: Vec2) {
        self.engine.set_content_geometry(canvas, content);
    }
}
