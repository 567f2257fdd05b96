use crate::app::{with_app, SharedApp};
use crate::constants::MAX_FRAME_SECS;
use instant::Instant;
use mix_core::constants::RESYNC_TICK_HZ;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub app: SharedApp,
    pub last_instant: Instant,
    pub resync_acc: f32,
}

impl FrameContext {
    pub fn new(app: SharedApp) -> Self {
        Self {
            app,
            last_instant: Instant::now(),
            resync_acc: 0.0,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_SECS);
        self.last_instant = now;

        self.resync_acc += dt_sec;
        let resync = self.resync_acc >= 1.0 / RESYNC_TICK_HZ;
        if resync {
            self.resync_acc = 0.0;
        }

        with_app(&self.app, |a| {
            a.engine.tick(&mut a.host, dt_sec);
            if resync {
                let n = a.engine.resync();
                if n > 0 {
                    log::debug!("[frame] resynced {} track(s)", n);
                }
            }
        });
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(tick: &Tick) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Tick = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
