//! Report encoding
//!
//! Wraps one capture's analysis outcome in a versioned payload with producer
//! metadata and provenance, serialized as JSON. The payload's field names
//! and numeric ranges are the crate's wire contract; downstream consumers
//! read them as flat key/value pairs.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::pipeline::{AnalysisOutcome, CaptureRequest};
use crate::types::{AnalysisMode, CaptureMetadata, FeatureVector, HealthIndicators};
use crate::{FACEPULSE_VERSION, PRODUCER_NAME};

/// Current report schema version
pub const FHI_VERSION: &str = "1.0.0";

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Report provenance information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProvenance {
    pub source_device_id: String,
    pub captured_at_utc: Option<String>,
    pub computed_at_utc: String,
}

/// Complete facial health indicator payload for one capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub fhi_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub mode: AnalysisMode,
    /// The reported feature vector; None when no source produced features.
    pub features: Option<FeatureVector>,
    pub indicators: HealthIndicators,
    /// Derived from the indicators at encoding time, never stored upstream.
    pub overall_score: f64,
    pub capture: CaptureMetadata,
    pub capture_quality: Option<f64>,
}

/// Encoder producing versioned report payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode an analysis outcome into a report payload
    pub fn encode(&self, outcome: &AnalysisOutcome, request: &CaptureRequest) -> AnalysisReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: FACEPULSE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = ReportProvenance {
            source_device_id: request
                .device_id
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            captured_at_utc: request.captured_at.map(|at| at.to_rfc3339()),
            computed_at_utc: Utc::now().to_rfc3339(),
        };

        AnalysisReport {
            fhi_version: FHI_VERSION.to_string(),
            producer,
            provenance,
            mode: outcome.feature_set.mode(),
            features: outcome.feature_set.vector().copied(),
            indicators: outcome.indicators,
            overall_score: outcome.indicators.overall_score(),
            capture: outcome.metadata,
            capture_quality: outcome.capture_quality,
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        outcome: &AnalysisOutcome,
        request: &CaptureRequest,
    ) -> Result<String, AnalysisError> {
        let report = self.encode(outcome, request);
        serde_json::to_string_pretty(&report).map_err(AnalysisError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeatureSet, FeatureVector};

    fn make_test_outcome() -> AnalysisOutcome {
        AnalysisOutcome {
            feature_set: FeatureSet::GeometryOnly {
                features: FeatureVector {
                    smile_left: 0.4,
                    smile_right: 0.4,
                    ..Default::default()
                },
            },
            indicators: HealthIndicators {
                alertness: 72.0,
                tension: 18.0,
                mood: 68.0,
                symmetry: 96.0,
                reliability: 81.0,
            },
            metadata: CaptureMetadata {
                image_width: 1080.0,
                image_height: 1920.0,
                face_width: 480.0,
                face_height: 620.0,
                landmark_count: 68,
            },
            capture_quality: Some(0.92),
        }
    }

    fn make_test_request() -> CaptureRequest {
        CaptureRequest {
            device_id: Some("front-camera".to_string()),
            image_width: 1080.0,
            image_height: 1920.0,
            face_width: 480.0,
            face_height: 620.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_encode_report() {
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(&make_test_outcome(), &make_test_request());

        assert_eq!(report.fhi_version, FHI_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.version, FACEPULSE_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.provenance.source_device_id, "front-camera");
        assert_eq!(report.mode, AnalysisMode::GeometryOnly);
        assert_eq!(report.features.unwrap().smile_left, 0.4);
        assert_eq!(report.capture.landmark_count, 68);
        assert_eq!(report.capture_quality, Some(0.92));

        // Overall is derived at encoding time from the indicator weights
        let expected = 0.30 * 72.0 + 0.20 * (100.0 - 18.0) + 0.20 * 68.0 + 0.15 * 96.0
            + 0.15 * 81.0;
        assert!((report.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_device_id_defaults_to_unknown() {
        let encoder = ReportEncoder::new();
        let request = CaptureRequest {
            device_id: None,
            ..make_test_request()
        };
        let report = encoder.encode(&make_test_outcome(), &request);
        assert_eq!(report.provenance.source_device_id, "unknown");
        assert!(report.provenance.captured_at_utc.is_none());
    }

    #[test]
    fn test_encode_to_json() {
        let encoder = ReportEncoder::new();
        let json = encoder
            .encode_to_json(&make_test_outcome(), &make_test_request())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("fhi_version").is_some());
        assert!(parsed.get("producer").is_some());
        assert!(parsed.get("provenance").is_some());
        assert!(parsed.get("indicators").is_some());
        assert!(parsed.get("overall_score").is_some());
        assert_eq!(parsed["indicators"]["alertness"], 72.0);
    }
}
