//! Mapping between canvas pixels and the normalized content space.

use glam::Vec2;

/// Centered, aspect-correct rectangle of the primary content inside the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentDisplayArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Content pixels to canvas pixels.
    pub scale: f32,
}

impl Default for ContentDisplayArea {
    fn default() -> Self {
        Self::fit(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0))
    }
}

impl ContentDisplayArea {
    /// Fits `content` into `canvas` preserving aspect ratio. Content without
    /// intrinsic size (audio-only scenes) fills the whole canvas.
    pub fn fit(canvas: Vec2, content: Vec2) -> Self {
        let canvas = canvas.max(Vec2::ONE);
        if content.x <= 0.0 || content.y <= 0.0 || !content.is_finite() {
            return Self {
                x: 0.0,
                y: 0.0,
                width: canvas.x,
                height: canvas.y,
                scale: 1.0,
            };
        }
        let scale = (canvas.x / content.x).min(canvas.y / content.y);
        let width = content.x * scale;
        let height = content.y * scale;
        Self {
            x: (canvas.x - width) * 0.5,
            y: (canvas.y - height) * 0.5,
            width,
            height,
            scale,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// The sweet spot.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin() + self.size() * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.x + self.width && p.y <= self.y + self.height
    }

    /// Canvas pixels to content-relative coordinates (0..1 inside the area).
    #[inline]
    pub fn screen_to_content_relative(&self, p: Vec2) -> Vec2 {
        (p - self.origin()) / self.size().max(Vec2::splat(f32::EPSILON))
    }

    /// Content-relative coordinates to canvas pixels.
    #[inline]
    pub fn content_relative_to_screen(&self, rel: Vec2) -> Vec2 {
        self.origin() + rel * self.size()
    }

    /// Clamps a canvas point into the area.
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.origin(), self.origin() + self.size())
    }
}
