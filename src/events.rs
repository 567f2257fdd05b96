use crate::app::{with_app, SharedApp};
use crate::constants::{PAUSE_BUTTON_ID, PLAY_BUTTON_ID, STOP_BUTTON_ID};
use crate::{dom, input};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_input_handlers(canvas: &web::HtmlCanvasElement, app: &SharedApp) {
    wire_pointermove(canvas, app);
    wire_pointerdown(canvas, app);
    wire_pointerup(app);
    wire_pointerleave(canvas, app);
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, app: &SharedApp) {
    let canvas_px = canvas.clone();
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &canvas_px);
        with_app(&app, |a| {
            let e = a.pointer.on_move(pos);
            a.pointer(e);
        });
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerdown(canvas: &web::HtmlCanvasElement, app: &SharedApp) {
    let canvas_px = canvas.clone();
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &canvas_px);
        with_app(&app, |a| {
            let e = a.pointer.on_down(pos);
            a.pointer(e);
        });
        _ = canvas_px.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(app: &SharedApp) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        with_app(&app, |a| {
            if let Some(e) = a.pointer.on_up() {
                a.pointer(e);
            }
        });
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerleave(canvas: &web::HtmlCanvasElement, app: &SharedApp) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        with_app(&app, |a| {
            if let Some(e) = a.pointer.on_leave() {
                a.pointer(e);
            }
        });
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn wire_transport_buttons(document: &web::Document, app: &SharedApp) {
    let play = app.clone();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || {
        with_app(&play, |a| a.play());
    });
    let pause = app.clone();
    dom::add_click_listener(document, PAUSE_BUTTON_ID, move || {
        with_app(&pause, |a| a.pause());
    });
    let stop = app.clone();
    dom::add_click_listener(document, STOP_BUTTON_ID, move || {
        with_app(&stop, |a| a.stop());
    });
}

/// Space toggles play/pause, Escape stops.
pub fn wire_global_keydown(app: &SharedApp) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        match ev.key().as_str() {
            " " => {
                with_app(&app, |a| a.toggle());
                ev.prevent_default();
            }
            "Escape" => {
                with_app(&app, |a| a.stop());
            }
            _ => {}
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Keeps the backing store and the engine's display area in step with the
/// canvas CSS size.
pub fn wire_canvas_resize(canvas: &web::HtmlCanvasElement, app: &SharedApp) {
    let canvas_resize = canvas.clone();
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move || {
        let size = dom::sync_canvas_backing_size(&canvas_resize);
        let content = dom::content_size(&canvas_resize);
        with_app(&app, |a| a.resize(size, content));
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
