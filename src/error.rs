//! Error types for Facepulse
//!
//! The analysis core itself is total over its input domain: insufficient or
//! degenerate landmarks degrade to neutral defaults, never to an error.
//! Errors exist only at the JSON boundary of the pipeline.

use thiserror::Error;

/// Errors that can occur while parsing or encoding capture payloads
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Capture carries neither landmarks nor blend-shape coefficients")]
    EmptyCapture,

    #[error("Invalid capture dimensions: {0}")]
    InvalidDimensions(String),
}
