// Named option updates and their validation.

use mix_core::config::ConfigError;
use mix_core::constants::*;
use mix_core::{OptionValue, Options};

#[test]
fn defaults_match_documented_values() {
    let o = Options::default();
    assert_eq!(o.mix.fade_radius, 0.35);
    assert_eq!(o.mix.center_boost, 1.5);
    assert_eq!(o.mix.master_volume, 0.8);
    assert!(o.mix.spatial_audio_enabled);
    assert!(o.physics.physics_enabled);
    assert_eq!(o.physics.damping, 0.92);
}

#[test]
fn numbers_and_flags_are_set_by_name() {
    let mut o = Options::default();
    o.set("fadeRadius", 0.5f32).unwrap();
    o.set("reverbDistanceScaling", false).unwrap();
    o.set("orbitalSpeed", -0.05f32).unwrap();
    o.set("physicsStrength", OptionValue::Number(2.0)).unwrap();
    assert_eq!(o.mix.fade_radius, 0.5);
    assert!(!o.mix.reverb_distance_scaling);
    assert_eq!(o.physics.orbital_speed, -0.05);
    assert_eq!(o.physics.physics_strength, 2.0);
}

#[test]
fn unknown_names_are_rejected() {
    let mut o = Options::default();
    assert_eq!(
        o.set("fade_radius", 0.5f32),
        Err(ConfigError::UnknownOption("fade_radius".into()))
    );
}

#[test]
fn wrong_kind_is_rejected() {
    let mut o = Options::default();
    assert!(matches!(
        o.set("masterVolume", true),
        Err(ConfigError::TypeMismatch { expected: "number", .. })
    ));
    assert!(matches!(
        o.set("reverbEnabled", 1.0f32),
        Err(ConfigError::TypeMismatch { expected: "flag", .. })
    ));
}

#[test]
fn out_of_range_values_leave_options_untouched() {
    let mut o = Options::default();
    let before = o.clone();
    assert!(matches!(
        o.set("masterVolume", 1.5f32),
        Err(ConfigError::OutOfRange { .. })
    ));
    assert!(o.set("damping", f32::NAN).is_err());
    assert!(o.set("fadeDuration", -1.0f32).is_err());
    assert_eq!(o, before);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(BASELINE_TICK_HZ > 0.0);
    assert!(MAX_DT_FRAMES >= 1.0);
    assert!(RESYNC_TICK_HZ > 0.0 && RESYNC_TICK_HZ < BASELINE_TICK_HZ);
    assert!(ACTIVE_GAIN_THRESHOLD > GAIN_EPSILON);
    assert!(BOUNCE_RESTITUTION > 0.0 && BOUNCE_RESTITUTION < 1.0);
    assert!(DRIFT_SPEED_MIN < DRIFT_SPEED_MAX);
    assert!(ORBIT_JITTER < 1.0);
    assert!(REVERB_IR_DECAY_SECONDS < REVERB_IR_SECONDS);
    assert!(DRIFT_TOLERANCE_SECS > 0.0);
}
