//! Runtime options, passed in as a flat set of named numbers and flags.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OptionValue {
    Number(f32),
    Flag(bool),
}

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("option `{name}` expects a {expected}")]
    TypeMismatch { name: String, expected: &'static str },
    #[error("option `{name}` = {value} is outside {min}..={max}")]
    OutOfRange {
        name: String,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Mixing options.
#[derive(Clone, Debug, PartialEq)]
pub struct MixConfig {
    /// Fade radius as a fraction of the displayed content width.
    pub fade_radius: f32,
    /// Per-tick smoothing is `fade_speed * 0.1`.
    pub fade_speed: f32,
    pub center_boost: f32,
    /// Transport fade length in seconds.
    pub fade_duration: f32,
    pub master_volume: f32,
    pub max_source_gain: f32,
    pub spatial_audio_enabled: bool,
    pub spatial_audio_strength: f32,
    pub reverb_enabled: bool,
    pub reverb_amount: f32,
    pub reverb_distance_scaling: bool,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            fade_radius: 0.35,
            fade_speed: 0.5,
            center_boost: 1.5,
            fade_duration: 0.5,
            master_volume: 0.8,
            max_source_gain: 1.0,
            spatial_audio_enabled: true,
            spatial_audio_strength: 1.0,
            reverb_enabled: true,
            reverb_amount: 0.3,
            reverb_distance_scaling: true,
        }
    }
}

/// Autonomous motion tunables. Read-only during a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub physics_enabled: bool,
    /// Global multiplier on every force.
    pub physics_strength: f32,
    pub drift_strength: f32,
    pub mouse_repulsion: f32,
    pub source_repulsion: f32,
    /// Pixels.
    pub source_repulsion_radius: f32,
    pub orbital_strength: f32,
    /// Pixels.
    pub orbital_radius: f32,
    pub orbital_speed: f32,
    /// Velocity kept per 60 Hz frame.
    pub damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            physics_enabled: true,
            physics_strength: 1.0,
            drift_strength: 1.0,
            mouse_repulsion: 0.5,
            source_repulsion: 0.3,
            source_repulsion_radius: 80.0,
            orbital_strength: 0.1,
            orbital_radius: 120.0,
            orbital_speed: 0.02,
            damping: 0.92,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    pub mix: MixConfig,
    pub physics: PhysicsConfig,
}

fn number(name: &str, value: OptionValue, min: f32, max: f32) -> Result<f32, ConfigError> {
    let OptionValue::Number(v) = value else {
        return Err(ConfigError::TypeMismatch {
            name: name.to_string(),
            expected: "number",
        });
    };
    if !v.is_finite() || v < min || v > max {
        return Err(ConfigError::OutOfRange {
            name: name.to_string(),
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

fn flag(name: &str, value: OptionValue) -> Result<bool, ConfigError> {
    match value {
        OptionValue::Flag(b) => Ok(b),
        OptionValue::Number(_) => Err(ConfigError::TypeMismatch {
            name: name.to_string(),
            expected: "flag",
        }),
    }
}

impl Options {
    /// Sets one option by its camelCase name. On error nothing changes.
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<(), ConfigError> {
        let value = value.into();
        let mix = &mut self.mix;
        let phys = &mut self.physics;
        match name {
            "fadeRadius" => mix.fade_radius = number(name, value, 0.0, 4.0)?,
            "fadeSpeed" => mix.fade_speed = number(name, value, 0.0, 10.0)?,
            "centerBoost" => mix.center_boost = number(name, value, 0.0, 8.0)?,
            "fadeDuration" => mix.fade_duration = number(name, value, 0.0, 30.0)?,
            "masterVolume" => mix.master_volume = number(name, value, 0.0, 1.0)?,
            "maxSourceGain" => mix.max_source_gain = number(name, value, 0.0, 1.0)?,
            "spatialAudioEnabled" => mix.spatial_audio_enabled = flag(name, value)?,
            "spatialAudioStrength" => mix.spatial_audio_strength = number(name, value, 0.0, 4.0)?,
            "reverbEnabled" => mix.reverb_enabled = flag(name, value)?,
            "reverbAmount" => mix.reverb_amount = number(name, value, 0.0, 1.0)?,
            "reverbDistanceScaling" => mix.reverb_distance_scaling = flag(name, value)?,
            "physicsEnabled" => phys.physics_enabled = flag(name, value)?,
            "physicsStrength" => phys.physics_strength = number(name, value, 0.0, 10.0)?,
            "driftStrength" => phys.drift_strength = number(name, value, 0.0, 10.0)?,
            "mouseRepulsion" => phys.mouse_repulsion = number(name, value, 0.0, 10.0)?,
            "sourceRepulsion" => phys.source_repulsion = number(name, value, 0.0, 10.0)?,
            "sourceRepulsionRadius" => {
                phys.source_repulsion_radius = number(name, value, 0.0, 10_000.0)?
            }
            "orbitalStrength" => phys.orbital_strength = number(name, value, 0.0, 10.0)?,
            "orbitalRadius" => phys.orbital_radius = number(name, value, 1.0, 10_000.0)?,
            "orbitalSpeed" => phys.orbital_speed = number(name, value, -1.0, 1.0)?,
            "damping" => phys.damping = number(name, value, 0.0, 1.0)?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        log::debug!("[config] {} = {:?}", name, value);
        Ok(())
    }
}
