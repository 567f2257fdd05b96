use async_trait::async_trait;
use mix_core::{MediaError, MediaHandle, MediaLoader, SourceSpec};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

// HTMLMediaElement.readyState
const HAVE_ENOUGH_DATA: u16 = 4;

fn error_name(e: &JsValue) -> Option<String> {
    js_sys::Reflect::get(e, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string())
}

/// Looping `<audio>` element fed into the graph through a media source node.
pub struct HtmlAudioMedia {
    element: web::HtmlAudioElement,
    label: String,
}

impl HtmlAudioMedia {
    pub fn element(&self) -> &web::HtmlMediaElement {
        &self.element
    }
}

impl MediaHandle for HtmlAudioMedia {
    fn play(&mut self) -> Result<(), MediaError> {
        let promise = self
            .element
            .play()
            .map_err(|e| MediaError::Failed(format!("{:?}", e)))?;
        // The promise settles later; a pause that lands first rejects it with
        // AbortError, which is routine when transport is toggled quickly.
        let label = self.label.clone();
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                match error_name(&e).as_deref() {
                    Some("AbortError") => log::debug!("[media] {}: play interrupted", label),
                    _ => log::warn!("[media] {}: play rejected: {:?}", label, e),
                }
            }
        });
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.element
            .pause()
            .map_err(|e| MediaError::Failed(format!("{:?}", e)))
    }

    fn seek(&mut self, seconds: f64) -> Result<(), MediaError> {
        if self.element.ready_state() == 0 {
            return Err(MediaError::NotReady);
        }
        self.element.set_current_time(seconds.max(0.0));
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> f64 {
        let d = self.element.duration();
        if d.is_finite() {
            d
        } else {
            0.0
        }
    }

    fn is_ready(&self) -> bool {
        self.element.ready_state() >= HAVE_ENOUGH_DATA
    }
}

/// Creates `<audio>` elements and waits for `canplaythrough`.
pub struct WebMediaLoader;

#[async_trait(?Send)]
impl MediaLoader for WebMediaLoader {
    type Media = HtmlAudioMedia;

    async fn open(&self, spec: &SourceSpec) -> anyhow::Result<HtmlAudioMedia> {
        let element = web::HtmlAudioElement::new_with_src(&spec.url)
            .map_err(|e| anyhow::anyhow!("audio element: {:?}", e))?;
        element.set_cross_origin(Some("anonymous"));
        element.set_loop(true);
        element.set_preload("auto");
        Ok(HtmlAudioMedia {
            element,
            label: spec.label.clone(),
        })
    }

    async fn wait_ready(&self, media: &mut HtmlAudioMedia) -> anyhow::Result<()> {
        if media.is_ready() {
            return Ok(());
        }
        let element = media.element.clone();
        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            let on_ready = Closure::once_into_js(move || {
                _ = resolve.call0(&JsValue::NULL);
            });
            let on_error = Closure::once_into_js(move || {
                _ = reject.call1(&JsValue::NULL, &JsValue::from_str("media error"));
            });
            element.set_oncanplaythrough(Some(on_ready.unchecked_ref()));
            element.set_onerror(Some(on_error.unchecked_ref()));
        });
        let result = JsFuture::from(promise).await;
        media.element.set_oncanplaythrough(None);
        media.element.set_onerror(None);
        result.map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(())
    }
}
