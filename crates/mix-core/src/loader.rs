//! Load pipeline for source media: open, then wait until playable.
//!
//! Each stage reports failure with the stage attached, so callers can log a
//! broken track and carry on with the rest of the scene.

use crate::host::MediaHandle;
use crate::source::SourceSpec;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStage {
    Open,
    Ready,
    Connect,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Ready => "ready",
            Self::Connect => "connect",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("loading `{source_label}` failed at {stage}: {reason}")]
pub struct LoadError {
    pub stage: LoadStage,
    pub source_label: String,
    pub reason: String,
}

impl LoadError {
    pub fn new(stage: LoadStage, spec: &SourceSpec, reason: impl fmt::Display) -> Self {
        Self {
            stage,
            source_label: spec.label.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Environment-specific media acquisition. Single-threaded, so futures need
/// not be `Send`.
#[async_trait(?Send)]
pub trait MediaLoader {
    type Media: MediaHandle;

    /// Creates a handle for the track and starts fetching it.
    async fn open(&self, spec: &SourceSpec) -> anyhow::Result<Self::Media>;

    /// Resolves once the handle can play through, or fails on a media error.
    async fn wait_ready(&self, media: &mut Self::Media) -> anyhow::Result<()>;
}

/// A playable handle plus its length.
pub struct LoadedMedia<M> {
    pub media: M,
    pub duration: f64,
}

pub async fn load_media<L: MediaLoader>(
    loader: &L,
    spec: &SourceSpec,
) -> Result<LoadedMedia<L::Media>, LoadError> {
    let mut media = loader
        .open(spec)
        .await
        .map_err(|e| LoadError::new(LoadStage::Open, spec, format!("{e:#}")))?;
    loader
        .wait_ready(&mut media)
        .await
        .map_err(|e| LoadError::new(LoadStage::Ready, spec, format!("{e:#}")))?;
    let duration = media.duration();
    log::info!("[load] {} ready ({:.1}s)", spec.label, duration);
    Ok(LoadedMedia { media, duration })
}
