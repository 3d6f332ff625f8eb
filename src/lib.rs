//! Facepulse - On-device analysis engine for facial health indicator signals
//!
//! Facepulse transforms facial landmark coordinates and blend-shape
//! coefficients into normalized facial-action features and interpretive
//! health indicator scores through a deterministic pipeline: landmark
//! extraction / blend-shape adaptation → indicator scoring → capture-quality
//! estimation → report encoding.
//!
//! The pipeline is pure computation: identical inputs produce identical
//! outputs, no state survives a capture, and degenerate inputs degrade to
//! documented neutral defaults instead of failing.

pub mod blendshape;
pub mod calibration;
pub mod error;
pub mod extractor;
pub mod geometry;
pub mod indicators;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod types;

pub use blendshape::{BlendShapeAdapter, CANONICAL_BLEND_SHAPES};
pub use error::AnalysisError;
pub use extractor::FeatureExtractor;
pub use indicators::HealthIndicatorCalculator;
pub use pipeline::{analyze, capture_to_report_json, AnalysisOutcome, CaptureRequest};
pub use quality::CaptureQualityEstimator;
pub use report::{AnalysisReport, ReportEncoder, FHI_VERSION};
pub use types::{
    AnalysisMode, CaptureContext, CaptureMetadata, FaceLandmarks, FeatureSet, FeatureVector,
    HeadPose, HealthIndicators, Point, Size,
};

/// Facepulse version embedded in all report payloads
pub const FACEPULSE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "facepulse";
