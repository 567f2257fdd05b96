use crate::constants::{CONTENT_HEIGHT_ATTR, CONTENT_WIDTH_ATTR};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

/// The page document, `None` outside a browser window.
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::debug!("[dom] no #{} to wire", element_id);
    }
}

/// Matches the canvas backing store to its CSS size and returns it.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> Vec2 {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
    Vec2::new(canvas.width() as f32, canvas.height() as f32)
}

/// Intrinsic content size from the canvas data attributes, zero when unset.
pub fn content_size(canvas: &web::HtmlCanvasElement) -> Vec2 {
    let read = |name: &str| {
        canvas
            .get_attribute(name)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .unwrap_or(0.0)
    };
    Vec2::new(read(CONTENT_WIDTH_ATTR), read(CONTENT_HEIGHT_ATTR))
}
