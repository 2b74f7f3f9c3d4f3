use thiserror::Error;

/// Errors raised by the draw controller and the input state machine.
///
/// These are sequencing bugs in the caller rather than recoverable
/// conditions; empty stacks and eraser misses are plain no-ops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    /// A path was created before any pen attributes were configured
    #[error("Pen attributes have not been configured; call set_pen_attributes or select_tool first")]
    PenNotConfigured,
}

/// Errors that can occur while writing settings to a key/value store
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to serialize setting '{key}': {source}")]
    Serialization {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for draw operations
pub type DrawResult<T> = Result<T, DrawError>;
