use std::io;
use thiserror::Error;

/// Custom error type for resalertd
#[derive(Error, Debug)]
pub enum AlerterError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Metric read failed: {0}")]
    MetricRead(String),

    #[error("Broadcast failed: {0}")]
    Broadcast(String),
}

/// Result type alias for resalertd
pub type Result<T> = std::result::Result<T, AlerterError>;

impl AlerterError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AlerterError::Config(msg.into())
    }

    /// Create a metric read error
    pub fn metric_read<S: Into<String>>(msg: S) -> Self {
        AlerterError::MetricRead(msg.into())
    }

    /// Create a broadcast error
    pub fn broadcast<S: Into<String>>(msg: S) -> Self {
        AlerterError::Broadcast(msg.into())
    }
}
