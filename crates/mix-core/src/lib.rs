pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod fade;
pub mod falloff;
pub mod geometry;
pub mod host;
pub mod listener;
pub mod loader;
pub mod offline;
pub mod physics;
pub mod reverb;
pub mod scheduler;
pub mod smoothing;
pub mod source;
pub mod spatial;
pub mod staging;

pub use config::{ConfigError, MixConfig, OptionValue, Options, PhysicsConfig};
pub use engine::{MixEngine, PointerEvent, TransportState};
pub use error::{MixError, Result};
pub use fade::{FadePhase, FadeState, GainWrite};
pub use geometry::ContentDisplayArea;
pub use host::{AudioGraphHost, HostError, MediaError, MediaHandle, NodeId};
pub use listener::{GeoBounds, Listener, WaypointPath};
pub use loader::{load_media, LoadError, LoadStage, LoadedMedia, MediaLoader};
pub use source::{Body, Motion, Source, SourceId, SourceSpec, SourceView};
pub use spatial::Spatializer;
