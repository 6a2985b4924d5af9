//! Error types for glide

use std::io;
use thiserror::Error;

/// Errors surfaced to callers of the motion API
///
/// Only configuration mistakes are errors. Non-animatable values and
/// unknown easing names have defined fallbacks and never produce one.
#[derive(Error, Debug)]
pub enum MotionError {
    /// A named variant was requested that the variants table doesn't define
    #[error("Unknown variant: {0}")]
    UnknownVariant(String),

    /// A transform string couldn't be parsed
    #[error("Invalid transform `{value}`: {reason}")]
    InvalidTransform { value: String, reason: String },

    /// TOML configuration failed to parse
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// JSON configuration failed to parse
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error when reading configuration
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for glide operations
pub type Result<T> = std::result::Result<T, MotionError>;
