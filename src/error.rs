// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the sentinel library.

use std::fmt;

/// Result type alias for sentinel operations.
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Main error type for the sentinel library.
#[derive(Debug)]
pub enum SentinelError {
    /// Frame batch has mismatched parallel sequences or a wrong keypoint count.
    InvalidBatchShape(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// GPIO pin setup or write failed.
    GpioError(String),
    /// Pose source could not be read or decoded.
    SourceError(String),
    /// Error processing images.
    ImageError(String),
    /// Visualizer error.
    VisualizerError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
}

impl fmt::Display for SentinelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBatchShape(msg) => write!(f, "Invalid batch shape: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::GpioError(msg) => write!(f, "GPIO error: {msg}"),
            Self::SourceError(msg) => write!(f, "Source error: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::VisualizerError(msg) => write!(f, "Visualizer error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for SentinelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SentinelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SentinelError {
    fn from(err: serde_json::Error) -> Self {
        Self::SourceError(err.to_string())
    }
}

impl From<image::ImageError> for SentinelError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}
