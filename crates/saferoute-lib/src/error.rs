use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the SafeRoute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// An unreachable destination is not an error: routing entry points report it
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a node identifier is not present in the graph.
    #[error("unknown node: {id}{}", format_suggestions(.suggestions))]
    UnknownNode {
        id: String,
        suggestions: Vec<String>,
    },

    /// Raised when two nodes share the same identifier.
    #[error("duplicate node identifier: {id}")]
    DuplicateNode { id: String },

    /// Raised when a danger zone polygon cannot be used for classification.
    #[error("malformed danger zone {id}: {reason}")]
    MalformedZone { id: String, reason: String },

    /// Raised when a coordinate is NaN, infinite, or outside the valid range.
    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Raised when a street connection cannot be turned into edges.
    #[error("invalid connection {from} -> {to}: {reason}")]
    InvalidConnection {
        from: String,
        to: String,
        reason: String,
    },

    /// Raised when a weight policy contains unusable weights.
    #[error("invalid weight policy: {message}")]
    InvalidPolicy { message: String },

    /// Dataset could not be located at the resolved path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No dataset path was given and no platform data directory exists.
    #[error("failed to resolve project directories for the default dataset")]
    ProjectDirsUnavailable,

    /// Raised when a route summary is requested for an empty path.
    #[error("route path was empty")]
    EmptyRoute,

    /// Raised when the advice service answered without usable content.
    #[error("advice service returned no usable content: {message}")]
    AdviceUnavailable { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
