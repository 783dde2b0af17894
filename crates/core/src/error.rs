//! Error types for the waveflow core.
//!
//! Missing or undefined field data is never an error — it is encoded as a
//! `None` sample or the zero velocity vector and absorbed by the respawn
//! logic. Errors here are reserved for construction-time misuse: degenerate
//! configuration, impossible dimensions, unparseable colors.

use thiserror::Error;

/// Errors produced by engine construction and snapshot operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Width or height was zero when creating a grid or frame buffer.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A configuration value was degenerate (zero density, zero max age, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A color scale could not be constructed from the given stops.
    #[error("invalid color scale: {0}")]
    InvalidScale(String),

    /// An I/O failure while writing a snapshot.
    #[error("io error: {0}")]
    Io(String),
}
