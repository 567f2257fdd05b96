//! Listener position and the non-pointer drivers that can move it.

use crate::geometry::ContentDisplayArea;
use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Listener {
    /// Last pointer position in canvas pixels; may lie outside the content.
    pub pointer: Option<Vec2>,
}

impl Listener {
    /// Pointer position when it lies inside the content area.
    #[inline]
    pub fn valid_position(&self, area: &ContentDisplayArea) -> Option<Vec2> {
        self.pointer.filter(|p| p.is_finite() && area.contains(*p))
    }

    /// Pointer inside the content, otherwise the sweet spot.
    #[inline]
    pub fn effective_position(&self, area: &ContentDisplayArea) -> Vec2 {
        self.valid_position(area).unwrap_or_else(|| area.center())
    }
}

/// Animated listener walking a polyline of content-relative waypoints at
/// constant speed, looping back to the first point.
#[derive(Clone, Debug)]
pub struct WaypointPath {
    points: Vec<Vec2>,
    /// Content-relative units per second.
    speed: f32,
    segment: usize,
    along: f32,
}

impl WaypointPath {
    pub fn new(points: Vec<Vec2>, speed: f32) -> Self {
        Self {
            points,
            speed: speed.max(0.0),
            segment: 0,
            along: 0.0,
        }
    }

    /// A closed circle of `n` points around `center`.
    pub fn circle(center: Vec2, radius: f32, n: usize, speed: f32) -> Self {
        let n = n.max(3);
        let points = (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                center + Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        Self::new(points, speed)
    }

    pub fn position(&self) -> Option<Vec2> {
        match self.points.len() {
            0 => None,
            1 => Some(self.points[0]),
            n => {
                let a = self.points[self.segment % n];
                let b = self.points[(self.segment + 1) % n];
                let len = a.distance(b);
                let t = if len > 0.0 { self.along / len } else { 0.0 };
                Some(a.lerp(b, t.clamp(0.0, 1.0)))
            }
        }
    }

    /// Moves along the path by `elapsed_secs` and returns the new point.
    pub fn advance(&mut self, elapsed_secs: f32) -> Option<Vec2> {
        let n = self.points.len();
        if n < 2 || !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return self.position();
        }
        let mut remaining = self.speed * elapsed_secs;
        // every segment is visited at most once per call plus one wrap
        for _ in 0..=n {
            let a = self.points[self.segment % n];
            let b = self.points[(self.segment + 1) % n];
            let left = a.distance(b) - self.along;
            if remaining < left {
                self.along += remaining;
                break;
            }
            remaining -= left.max(0.0);
            self.segment = (self.segment + 1) % n;
            self.along = 0.0;
        }
        self.position()
    }
}

/// Geographic bounding box mapped onto the content area, for GPS-driven
/// listeners. North is up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Content-relative point for a fix, `None` outside the box.
    pub fn to_content_relative(&self, latitude: f64, longitude: f64) -> Option<Vec2> {
        let width = self.east - self.west;
        let height = self.north - self.south;
        if width <= 0.0 || height <= 0.0 || !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        let x = (longitude - self.west) / width;
        let y = (self.north - latitude) / height;
        ((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y))
            .then(|| Vec2::new(x as f32, y as f32))
    }
}
