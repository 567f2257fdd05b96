// Source motion: timestep handling, forces, dragging and containment.

use glam::Vec2;
use mix_core::physics::{apply_damping, contain, drift_target, normalize_dt, step};
use mix_core::{Body, ContentDisplayArea, PhysicsConfig};

fn area() -> ContentDisplayArea {
    ContentDisplayArea::fit(Vec2::splat(1000.0), Vec2::ZERO)
}

/// Only the force under test is switched on.
fn quiet() -> PhysicsConfig {
    PhysicsConfig {
        drift_strength: 0.0,
        mouse_repulsion: 0.0,
        source_repulsion: 0.0,
        orbital_strength: 0.0,
        damping: 1.0,
        ..PhysicsConfig::default()
    }
}

fn body(x: f32, y: f32) -> Body {
    let area = area();
    let p = Vec2::new(x, y);
    Body::at(p, area.screen_to_content_relative(p))
}

#[test]
fn dt_is_normalized_to_frames_and_clamped() {
    assert!((normalize_dt(1.0 / 60.0).unwrap() - 1.0).abs() < 1e-5);
    assert_eq!(normalize_dt(1.0), Some(2.0));
    assert_eq!(normalize_dt(0.0), Some(0.0));
    assert_eq!(normalize_dt(f32::NAN), None);
    assert_eq!(normalize_dt(f32::INFINITY), None);
    assert_eq!(normalize_dt(-0.1), None);
}

#[test]
fn damping_is_frame_rate_independent() {
    let v = Vec2::new(10.0, 0.0);
    let two_small = apply_damping(apply_damping(v, 0.92, 1.0), 0.92, 1.0);
    let one_big = apply_damping(v, 0.92, 2.0);
    assert!(two_small.abs_diff_eq(one_big, 1e-4));
}

#[test]
fn drift_target_orbits_the_anchor() {
    let mut b = body(500.0, 500.0);
    b.motion.drift_angle = 0.0;
    let cfg = PhysicsConfig::default();
    assert!(drift_target(&b, &cfg).abs_diff_eq(Vec2::new(530.0, 500.0), 1e-4));
    let still = PhysicsConfig {
        drift_strength: 0.0,
        ..cfg
    };
    assert_eq!(drift_target(&b, &still), b.base_position);
}

#[test]
fn disabled_physics_leaves_bodies_alone() {
    let cfg = PhysicsConfig {
        physics_enabled: false,
        ..PhysicsConfig::default()
    };
    let mut bodies = vec![body(500.0, 500.0), body(505.0, 500.0)];
    let before = bodies.clone();
    step(&mut bodies, Some(Vec2::new(510.0, 500.0)), &area(), &cfg, 1.0);
    assert_eq!(bodies, before);
}

#[test]
fn nearby_sources_push_apart() {
    let cfg = PhysicsConfig {
        source_repulsion: 1.0,
        ..quiet()
    };
    let mut bodies = vec![body(500.0, 500.0), body(510.0, 500.0)];
    step(&mut bodies, None, &area(), &cfg, 1.0);
    assert!(bodies[0].velocity.x < 0.0);
    assert!(bodies[1].velocity.x > 0.0);
    assert!(bodies[1].position.x - bodies[0].position.x > 10.0);
}

#[test]
fn coincident_sources_still_separate() {
    let cfg = PhysicsConfig {
        source_repulsion: 1.0,
        ..quiet()
    };
    let mut bodies = vec![body(500.0, 500.0), body(500.0, 500.0)];
    step(&mut bodies, None, &area(), &cfg, 1.0);
    assert!(bodies[0].position.distance(bodies[1].position) > 0.0);
    assert!(bodies.iter().all(|b| b.position.is_finite()));
}

#[test]
fn listener_on_top_of_source_pushes_it_away() {
    let cfg = PhysicsConfig {
        mouse_repulsion: 1.0,
        ..quiet()
    };
    let mut bodies = [body(500.0, 500.0)];
    step(&mut bodies, Some(Vec2::new(510.0, 500.0)), &area(), &cfg, 1.0);
    assert!(bodies[0].velocity.x < 0.0);
}

#[test]
fn orbit_adds_tangential_motion_near_listener() {
    let cfg = PhysicsConfig {
        orbital_strength: 1.0,
        ..quiet()
    };
    let mut bodies = [body(440.0, 500.0)];
    step(&mut bodies, Some(Vec2::new(500.0, 500.0)), &area(), &cfg, 1.0);
    let v = bodies[0].velocity;
    // inside the orbital radius: pushed outward and around
    assert!(v.x < 0.0, "{v:?}");
    assert!(v.y.abs() > 0.0, "{v:?}");
}

#[test]
fn orbit_is_ignored_without_listener() {
    let cfg = PhysicsConfig {
        orbital_strength: 1.0,
        ..quiet()
    };
    let mut bodies = [body(440.0, 500.0)];
    step(&mut bodies, None, &area(), &cfg, 1.0);
    assert_eq!(bodies[0].velocity, Vec2::ZERO);
}

#[test]
fn dragged_body_is_held_still() {
    let cfg = PhysicsConfig {
        source_repulsion: 1.0,
        ..quiet()
    };
    let mut bodies = vec![body(500.0, 500.0), body(505.0, 500.0)];
    bodies[0].is_dragged = true;
    bodies[0].velocity = Vec2::new(3.0, 3.0);
    step(&mut bodies, None, &area(), &cfg, 1.0);
    assert_eq!(bodies[0].position, Vec2::new(500.0, 500.0));
    assert_eq!(bodies[0].velocity, Vec2::ZERO);
    // a dragged body does not repel others
    assert_eq!(bodies[1].velocity, Vec2::ZERO);
}

#[test]
fn edges_bounce_with_restitution() {
    let area = area();
    let mut b = body(990.0, 500.0);
    b.position = Vec2::new(1010.0, 500.0);
    b.velocity = Vec2::new(8.0, 1.0);
    contain(&mut b, &area);
    assert_eq!(b.position, Vec2::new(1000.0, 500.0));
    assert_eq!(b.velocity, Vec2::new(-4.0, 1.0));
    assert_eq!(b.content_relative, Vec2::new(1.0, 0.5));
}

#[test]
fn bodies_stay_inside_under_strong_forces() {
    let cfg = PhysicsConfig {
        physics_strength: 10.0,
        mouse_repulsion: 10.0,
        source_repulsion: 10.0,
        ..PhysicsConfig::default()
    };
    let area = area();
    let mut bodies: Vec<Body> = (0..8).map(|i| body(5.0 + i as f32, 995.0)).collect();
    for _ in 0..300 {
        step(&mut bodies, Some(Vec2::new(8.0, 990.0)), &area, &cfg, 2.0);
    }
    for b in &bodies {
        assert!(area.contains(b.position), "{:?} escaped", b.position);
        let rel = b.content_relative;
        assert!((0.0..=1.0).contains(&rel.x) && (0.0..=1.0).contains(&rel.y));
    }
}

#[test]
fn free_velocity_decays_under_damping() {
    // no forces at all, only damping
    let cfg = PhysicsConfig {
        physics_strength: 0.0,
        damping: 0.92,
        ..quiet()
    };
    let mut bodies = [body(500.0, 500.0)];
    bodies[0].velocity = Vec2::new(4.0, -3.0);
    let mut last = bodies[0].velocity.length();
    for _ in 0..60 {
        step(&mut bodies, None, &area(), &cfg, 1.0);
        let speed = bodies[0].velocity.length();
        assert!(speed < last);
        last = speed;
    }
    assert!(last < 0.05, "speed {last}");
    assert!(bodies[0].position.is_finite());
}
