use crate::config::ConfigError;
use crate::host::HostError;
use crate::loader::LoadError;
use crate::source::SourceId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MixError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("unknown source {0:?}")]
    UnknownSource(SourceId),
}

pub type Result<T, E = MixError> = std::result::Result<T, E>;
