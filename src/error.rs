use thiserror::Error;

use crate::config::ConfigError;
use crate::data::DataError;

#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RoadmapError>;
