//! Error types for lacuna-vis.

use thiserror::Error;

/// Result type for lacuna-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the shell.
#[derive(Debug, Error)]
pub enum Error {
    /// The seed sequence cannot produce a timeline.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Speeds must be finite and strictly positive.
    #[error("Invalid speed: {0} (must be > 0)")]
    InvalidSpeed(f64),

    /// Scene graph rejected an operation.
    #[error("Scene error: {0}")]
    Scene(#[from] lacuna_scene::Error),

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// The session actor has shut down.
    #[error("session closed")]
    SessionClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
