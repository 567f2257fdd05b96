#![cfg(target_arch = "wasm32")]
use crate::app::{with_app, App, SharedApp};
use crate::constants::{CANVAS_ID, DEFAULT_SOURCES};
use crate::host::WebAudioHost;
use crate::media::WebMediaLoader;
use glam::Vec2;
use mix_core::{load_media, MixEngine, Options, SourceSpec};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod constants;
mod dom;
mod events;
mod frame;
mod host;
mod input;
mod media;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("mix-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn build_app(canvas: &web::HtmlCanvasElement) -> anyhow::Result<SharedApp> {
    let mut host = WebAudioHost::new()?;
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let mut engine = MixEngine::new(&mut host, Options::default(), seed)?;
    let size = dom::sync_canvas_backing_size(canvas);
    engine.set_content_geometry(size, dom::content_size(canvas));
    log::info!(
        "[audio] context at {:.0} Hz, canvas {:.0}x{:.0}",
        host.context().sample_rate(),
        size.x,
        size.y
    );
    Ok(Rc::new(RefCell::new(App {
        host,
        engine,
        pointer: Default::default(),
    })))
}

/// Loads every track in turn; a failed track is logged and skipped.
async fn load_sources(app: SharedApp) {
    let loader = WebMediaLoader;
    for &(label, url, x, y) in DEFAULT_SOURCES {
        let spec = SourceSpec::new(label, url, Vec2::new(x, y));
        let loaded = match load_media(&loader, &spec).await {
            Ok(l) => l,
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };
        let added = with_app(&app, |a| a.engine.add_source(&mut a.host, &spec, loaded));
        match added {
            Some(Ok(id)) => log::info!("[load] {} placed as source {}", label, id.0),
            Some(Err(e)) => log::warn!("[load] {}: {}", label, e),
            None => log::warn!("[load] {}: engine busy, track dropped", label),
        }
    }
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let app = build_app(&canvas)?;

    events::wire_canvas_resize(&canvas, &app);
    events::wire_input_handlers(&canvas, &app);
    events::wire_transport_buttons(&document, &app);
    events::wire_global_keydown(&app);

    frame::start_loop(Rc::new(RefCell::new(frame::FrameContext::new(app.clone()))));
    load_sources(app).await;
    Ok(())
}
