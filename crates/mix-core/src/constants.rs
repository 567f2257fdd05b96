// Shared mixing/motion tuning constants used by both web and native frontends.

// Frame timing
pub const BASELINE_TICK_HZ: f32 = 60.0; // physics dt is expressed in 60 Hz frames
pub const MAX_DT_FRAMES: f32 = 2.0; // clamp for delayed/irregular frames
pub const RESYNC_TICK_HZ: f32 = 20.0; // drift-correction cadence

// Gain smoothing
pub const SMOOTHING_PER_FADE_SPEED: f32 = 0.1; // smoothingRate = fadeSpeed * this
pub const GAIN_EPSILON: f32 = 1e-4; // skip automation writes smaller than this

// Anti-clip staging
pub const ACTIVE_GAIN_THRESHOLD: f32 = 0.01; // post-falloff volume counted as "active"

// Physics
pub const DRIFT_BASE_RADIUS: f32 = 30.0; // px, scaled by driftStrength * physicsStrength
pub const DRIFT_SPRING: f32 = 0.02; // pull toward the drift target per frame
pub const DRIFT_SPEED_MIN: f32 = 0.003; // rad per frame
pub const DRIFT_SPEED_MAX: f32 = 0.008;
pub const CLOSE_REPULSION_RADIUS: f32 = 40.0; // px around the listener
pub const CLOSE_REPULSION_GAIN: f32 = 2.0;
pub const ORBIT_RADIAL_GAIN: f32 = 0.5; // radial spring toward the orbital radius
pub const ORBIT_TANGENTIAL_GAIN: f32 = 10.0; // converts orbitalSpeed into a tangential push
pub const ORBIT_INFLUENCE: f32 = 2.0; // tangential push fades out at this multiple of the radius
pub const ORBIT_JITTER: f32 = 0.2; // per-source +/- spread of orbital radius and speed
pub const BOUNCE_RESTITUTION: f32 = 0.5; // velocity kept (and inverted) at a content edge
pub const MIN_SEPARATION: f32 = 1e-3; // px; below this two points count as coincident

// Interaction
pub const SOURCE_HIT_RADIUS: f32 = 24.0; // px, drag pick radius

// Spatial audio
pub const PIXELS_PER_UNIT: f32 = 100.0; // canvas px per spatializer unit
pub const DRY_LEVEL: f32 = 1.0; // constant direct path
pub const REVERB_BASE_SEND: f32 = 0.6; // send at reverbAmount = 1, distance 0
pub const REVERB_DISTANCE_SCALE: f32 = 1.0; // extra send at the fade radius edge
pub const REVERB_WET_LEVEL: f32 = 0.8;
pub const REVERB_IR_SECONDS: f32 = 3.0;
pub const REVERB_IR_DECAY_SECONDS: f32 = 1.2;
pub const MASTER_BUS_LEVEL: f32 = 1.0;

// Transport
pub const DRIFT_TOLERANCE_SECS: f64 = 0.12; // media clocks further apart than this get re-seeked
