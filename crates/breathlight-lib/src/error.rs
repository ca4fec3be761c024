//! Unified error type for the breathlight-lib crate.
//!
//! [`BreathlightError`] wraps the sink error and domain-specific kinds.
//! `From` impls allow `?` to propagate across module boundaries seamlessly.

use std::fmt;

use crate::sink::SinkError;

/// Unified error type for breathlight-lib operations.
#[derive(Debug)]
pub enum BreathlightError {
    /// `open` was called with an unrecognized light name.
    UnknownLight(String),
    /// Hardware control-point I/O error (open or short write).
    Sink(SinkError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Color parsing error.
    Color(String),
    /// Configuration validation error.
    Config(String),
}

impl fmt::Display for BreathlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreathlightError::UnknownLight(name) => write!(f, "Unknown light device: {name}"),
            BreathlightError::Sink(e) => write!(f, "{e}"),
            BreathlightError::Io(e) => write!(f, "I/O error: {e}"),
            BreathlightError::Color(e) => write!(f, "Color error: {e}"),
            BreathlightError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for BreathlightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BreathlightError::Sink(e) => Some(e),
            BreathlightError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SinkError> for BreathlightError {
    fn from(e: SinkError) -> Self {
        BreathlightError::Sink(e)
    }
}

impl From<std::io::Error> for BreathlightError {
    fn from(e: std::io::Error) -> Self {
        BreathlightError::Io(e)
    }
}

/// Crate-level Result alias using [`BreathlightError`].
pub type Result<T> = std::result::Result<T, BreathlightError>;
