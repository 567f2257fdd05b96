use glam::Vec2;
use mix_core::PointerEvent;
use web_sys as web;

/// Pointer button state between DOM events.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub pos: Option<Vec2>,
    pub down: bool,
}

impl PointerState {
    pub fn on_move(&mut self, p: Vec2) -> PointerEvent {
        self.pos = Some(p);
        if self.down {
            PointerEvent::DragMove(p)
        } else {
            PointerEvent::Moved(p)
        }
    }

    pub fn on_down(&mut self, p: Vec2) -> PointerEvent {
        self.pos = Some(p);
        self.down = true;
        PointerEvent::DragStart(p)
    }

    /// `None` when no press was in progress.
    pub fn on_up(&mut self) -> Option<PointerEvent> {
        if !self.down {
            return None;
        }
        self.down = false;
        Some(PointerEvent::DragEnd)
    }

    /// Leaving the canvas mid-drag keeps the drag alive; the listener only
    /// falls back to the sweet spot when no button is held.
    pub fn on_leave(&mut self) -> Option<PointerEvent> {
        if self.down {
            return None;
        }
        self.pos = None;
        Some(PointerEvent::Left)
    }
}

/// CSS client coordinates to canvas backing-store pixels.
#[inline]
pub fn css_to_canvas_px(client: Vec2, rect_min: Vec2, rect_size: Vec2, backing: Vec2) -> Vec2 {
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    (client - rect_min) / rect_size * backing
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    css_to_canvas_px(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
        Vec2::new(rect.width() as f32, rect.height() as f32),
        Vec2::new(canvas.width() as f32, canvas.height() as f32),
    )
}
