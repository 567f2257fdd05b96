//! Autonomous source motion.
//!
//! Units are canvas pixels and 60 Hz frames: velocities are px/frame and a
//! `dt` of 1.0 is one nominal frame. All forces are scaled by
//! `physics_strength`.

use crate::config::PhysicsConfig;
use crate::constants::{
    BASELINE_TICK_HZ, BOUNCE_RESTITUTION, CLOSE_REPULSION_GAIN, CLOSE_REPULSION_RADIUS,
    DRIFT_BASE_RADIUS, DRIFT_SPRING, MAX_DT_FRAMES, MIN_SEPARATION, ORBIT_INFLUENCE,
    ORBIT_RADIAL_GAIN, ORBIT_TANGENTIAL_GAIN,
};
use crate::geometry::ContentDisplayArea;
use crate::source::Body;
use glam::Vec2;
use smallvec::SmallVec;
use std::borrow::{Borrow, BorrowMut};

/// Converts elapsed seconds into 60 Hz frames, clamped to absorb hitches.
/// Non-finite or negative input yields `None`; that tick skips physics.
#[inline]
pub fn normalize_dt(elapsed_secs: f32) -> Option<f32> {
    if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
        return None;
    }
    Some((elapsed_secs * BASELINE_TICK_HZ).min(MAX_DT_FRAMES))
}

/// Frame-rate independent exponential decay.
#[inline]
pub fn apply_damping(velocity: Vec2, damping: f32, dt: f32) -> Vec2 {
    velocity * damping.clamp(0.0, 1.0).powf(dt)
}

/// Drift target on the circle around the anchor.
#[inline]
pub fn drift_target(body: &Body, cfg: &PhysicsConfig) -> Vec2 {
    let radius = DRIFT_BASE_RADIUS * cfg.drift_strength * cfg.physics_strength;
    let (s, c) = body.motion.drift_angle.sin_cos();
    body.base_position + Vec2::new(c, s) * radius
}

/// Attraction toward the orbital radius plus a tangential push around the
/// listener.
fn orbital_force(body: &mut Body, listener: Vec2, cfg: &PhysicsConfig) -> Vec2 {
    let to_listener = listener - body.position;
    let distance = to_listener.length();
    if distance < MIN_SEPARATION {
        return Vec2::ZERO;
    }
    let dir = to_listener / distance;
    body.motion.orbital_angle = (-to_listener.y).atan2(-to_listener.x);

    let radius = (cfg.orbital_radius * body.motion.orbital_radius).max(1.0);
    let deviation = ((distance - radius) / radius).clamp(-1.0, 1.0);
    let radial = dir * deviation * ORBIT_RADIAL_GAIN;

    let ratio = (1.0 - distance / (radius * ORBIT_INFLUENCE)).clamp(0.0, 1.0);
    let tangent = dir.perp();
    let speed = cfg.orbital_speed * body.motion.orbital_speed * body.motion.orbital_direction;
    let tangential = tangent * speed * ORBIT_TANGENTIAL_GAIN * ratio;

    (radial + tangential) * cfg.orbital_strength
}

/// Outward push when the listener sits right on top of a source.
fn close_repulsion(body: &Body, listener: Vec2, cfg: &PhysicsConfig) -> Vec2 {
    let away = body.position - listener;
    let distance = away.length();
    if distance >= CLOSE_REPULSION_RADIUS {
        return Vec2::ZERO;
    }
    let dir = if distance < MIN_SEPARATION {
        Vec2::new(body.motion.drift_angle.cos(), body.motion.drift_angle.sin())
    } else {
        away / distance
    };
    dir * (1.0 - distance / CLOSE_REPULSION_RADIUS) * cfg.mouse_repulsion * CLOSE_REPULSION_GAIN
}

/// Pairwise push between free sources. Positions are a snapshot from the
/// start of the step so the result does not depend on iteration order.
fn source_repulsion(index: usize, positions: &[(Vec2, bool)], cfg: &PhysicsConfig) -> Vec2 {
    let radius = cfg.source_repulsion_radius;
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let (here, _) = positions[index];
    let mut force = Vec2::ZERO;
    for (j, &(other, dragged)) in positions.iter().enumerate() {
        if j == index || dragged {
            continue;
        }
        let away = here - other;
        let distance = away.length();
        if distance >= radius {
            continue;
        }
        let dir = if distance < MIN_SEPARATION {
            // coincident: split along a direction derived from the pair order
            let angle = (index as f32 - j as f32) * 2.399_963;
            Vec2::new(angle.cos(), angle.sin())
        } else {
            away / distance
        };
        force += dir * (1.0 - distance / radius) * cfg.source_repulsion;
    }
    force
}

/// Keeps the body inside the content area, bouncing inelastically off edges.
pub fn contain(body: &mut Body, area: &ContentDisplayArea) {
    let rel = area.screen_to_content_relative(body.position);
    let clamped = rel.clamp(Vec2::ZERO, Vec2::ONE);
    if clamped.x != rel.x {
        body.velocity.x = -body.velocity.x * BOUNCE_RESTITUTION;
    }
    if clamped.y != rel.y {
        body.velocity.y = -body.velocity.y * BOUNCE_RESTITUTION;
    }
    body.content_relative = clamped;
    if clamped != rel {
        body.position = area.content_relative_to_screen(clamped);
    }
}

/// Advances every free body by `dt` frames. `listener` is `None` when the
/// listener is outside the content area; orbit and close-range repulsion are
/// then skipped.
pub fn step<B: BorrowMut<Body>>(
    bodies: &mut [B],
    listener: Option<Vec2>,
    area: &ContentDisplayArea,
    cfg: &PhysicsConfig,
    dt: f32,
) {
    if !cfg.physics_enabled || !dt.is_finite() || dt <= 0.0 {
        return;
    }
    let snapshot: SmallVec<[(Vec2, bool); 16]> = bodies
        .iter()
        .map(|b| {
            let b = <B as Borrow<Body>>::borrow(b);
            (b.position, b.is_dragged)
        })
        .collect();

    for (i, body) in bodies.iter_mut().enumerate() {
        let body = <B as BorrowMut<Body>>::borrow_mut(body);
        if body.is_dragged {
            body.velocity = Vec2::ZERO;
            continue;
        }

        body.motion.drift_angle += body.motion.drift_speed * dt;
        let target = drift_target(body, cfg);

        let mut accel = Vec2::ZERO;
        if let Some(listener) = listener {
            accel += orbital_force(body, listener, cfg);
            accel += close_repulsion(body, listener, cfg);
        }
        accel += source_repulsion(i, &snapshot, cfg);
        accel += (target - body.position) * DRIFT_SPRING;

        body.velocity += accel * cfg.physics_strength * dt;
        body.velocity = apply_damping(body.velocity, cfg.damping, dt);
        body.position += body.velocity * dt;

        contain(body, area);
    }
}
