//! Pipeline orchestration
//!
//! The public API of Facepulse. Orchestrates the stages for one capture:
//! landmark extraction and/or blend-shape adaptation → indicator scoring →
//! capture-quality estimation, plus a raw-JSON entry point that parses a
//! capture request and returns an encoded report.
//!
//! Each capture's computation is fully independent: no state is held across
//! invocations, so callers may run captures concurrently with no
//! coordination.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blendshape::BlendShapeAdapter;
use crate::error::AnalysisError;
use crate::extractor::FeatureExtractor;
use crate::indicators::HealthIndicatorCalculator;
use crate::quality::CaptureQualityEstimator;
use crate::report::ReportEncoder;
use crate::types::{
    CaptureContext, CaptureMetadata, FaceLandmarks, FeatureSet, HeadPose, HealthIndicators, Point,
    Size,
};

/// One capture's worth of detector output, as delivered over the JSON
/// boundary. Landmarks and blend shapes are each optional, but at least one
/// must be populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Source device identifier for provenance.
    #[serde(default)]
    pub device_id: Option<String>,
    /// When the frame was captured, if the detector reports it.
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
    pub image_width: f64,
    pub image_height: f64,
    pub face_width: f64,
    pub face_height: f64,
    /// Raw detector confidence in [0, 1].
    #[serde(default)]
    pub detector_confidence: Option<f64>,
    /// Face-center offset from the image center, normalized to the image
    /// half-extents ((0, 0) = centered, ±1 = frame edge).
    #[serde(default)]
    pub face_center_offset: Option<Point>,
    #[serde(default)]
    pub head_pose: Option<HeadPose>,
    #[serde(default)]
    pub landmarks: Option<FaceLandmarks>,
    #[serde(default)]
    pub blend_shapes: Option<HashMap<String, f64>>,
}

/// Everything the pipeline computed for one capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// The scored feature source, tagged by mode.
    pub feature_set: FeatureSet,
    /// The five indicator scores.
    pub indicators: HealthIndicators,
    /// Capture provenance (dimensions, landmark count).
    pub metadata: CaptureMetadata,
    /// Framing quality in [0, 1]; None when the detector reported no
    /// confidence.
    pub capture_quality: Option<f64>,
}

/// Build the tagged feature set from whichever sources the capture carries.
pub fn build_feature_set(
    landmarks: Option<&FaceLandmarks>,
    blend_shapes: Option<&HashMap<String, f64>>,
    face_size: Size,
    pose: Option<HeadPose>,
) -> FeatureSet {
    let geometry = landmarks
        .filter(|regions| !regions.is_empty())
        .map(|regions| FeatureExtractor::extract(regions, face_size, pose));

    match blend_shapes.filter(|map| !map.is_empty()) {
        Some(map) => {
            let mut activation = BlendShapeAdapter::adapt(map);
            // Blend shapes carry no orientation; merge the detector pose so
            // reliability scoring sees it even without geometry
            if let Some(pose) = pose {
                activation.vector.head_pitch = pose.pitch;
                activation.vector.head_yaw = pose.yaw;
                activation.vector.head_roll = pose.roll;
            }
            FeatureSet::BlendShape {
                geometry,
                activation,
            }
        }
        None => match geometry {
            Some(features) => FeatureSet::GeometryOnly { features },
            None => FeatureSet::Unavailable,
        },
    }
}

/// Run the full pipeline for one capture.
///
/// Returns [`AnalysisError::InvalidDimensions`] for negative or non-finite
/// capture dimensions and [`AnalysisError::EmptyCapture`] when the request
/// carries neither landmarks nor coefficients; past those boundary checks the
/// computation is total and deterministic. Zero dimensions are accepted: the
/// extractor degrades the affected features to their neutral defaults.
pub fn analyze(request: &CaptureRequest) -> Result<AnalysisOutcome, AnalysisError> {
    let dimensions = [
        request.image_width,
        request.image_height,
        request.face_width,
        request.face_height,
    ];
    if dimensions.iter().any(|d| !d.is_finite() || *d < 0.0) {
        return Err(AnalysisError::InvalidDimensions(format!(
            "image {}x{}, face {}x{}",
            request.image_width, request.image_height, request.face_width, request.face_height
        )));
    }

    let has_landmarks = request
        .landmarks
        .as_ref()
        .map(|regions| !regions.is_empty())
        .unwrap_or(false);
    let has_shapes = request
        .blend_shapes
        .as_ref()
        .map(|map| !map.is_empty())
        .unwrap_or(false);
    if !has_landmarks && !has_shapes {
        return Err(AnalysisError::EmptyCapture);
    }

    let face_size = Size::new(request.face_width, request.face_height);
    let image_size = Size::new(request.image_width, request.image_height);

    let feature_set = build_feature_set(
        request.landmarks.as_ref(),
        request.blend_shapes.as_ref(),
        face_size,
        request.head_pose,
    );

    let metadata = CaptureMetadata {
        image_width: image_size.width,
        image_height: image_size.height,
        face_width: face_size.width,
        face_height: face_size.height,
        landmark_count: request
            .landmarks
            .as_ref()
            .map(|regions| regions.point_count())
            .unwrap_or(0),
    };

    let context = CaptureContext {
        metadata: Some(metadata),
        detector_confidence: request.detector_confidence,
    };
    let indicators = HealthIndicatorCalculator::score(&feature_set, &context);

    let capture_quality = request.detector_confidence.map(|confidence| {
        CaptureQualityEstimator::quality(
            face_size,
            image_size,
            confidence,
            request.face_center_offset.unwrap_or(Point::new(0.0, 0.0)),
        )
    });

    Ok(AnalysisOutcome {
        feature_set,
        indicators,
        metadata,
        capture_quality,
    })
}

/// Parse a capture-request JSON, run the pipeline, and return the encoded
/// report JSON. Mirrors the typed [`analyze`] for callers living on the
/// other side of a serialization boundary.
pub fn capture_to_report_json(raw_json: &str) -> Result<String, AnalysisError> {
    let request: CaptureRequest = serde_json::from_str(raw_json)?;
    let outcome = analyze(&request)?;
    let encoder = ReportEncoder::new();
    encoder.encode_to_json(&outcome, &request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisMode;

    fn sample_request_json() -> &'static str {
        r#"{
            "device_id": "capture-rig-7",
            "captured_at": "2024-03-02T09:15:00Z",
            "image_width": 1080.0,
            "image_height": 1920.0,
            "face_width": 540.0,
            "face_height": 720.0,
            "detector_confidence": 0.95,
            "head_pose": {"pitch": 2.0, "yaw": -3.0, "roll": 0.5},
            "blend_shapes": {
                "eyeBlinkLeft": 0.05,
                "eyeBlinkRight": 0.06,
                "mouthSmileLeft": 0.4,
                "mouthSmileRight": 0.38,
                "jawOpen": 0.1
            }
        }"#
    }

    #[test]
    fn test_analyze_blend_shape_capture() {
        let request: CaptureRequest = serde_json::from_str(sample_request_json()).unwrap();
        let outcome = analyze(&request).unwrap();
        assert_eq!(outcome.feature_set.mode(), AnalysisMode::BlendShape);
        assert!(outcome.indicators.mood > 50.0);
        assert!(outcome.capture_quality.is_some());
        assert_eq!(outcome.metadata.landmark_count, 0);
        // Detector pose is merged into the reported vector
        assert_eq!(outcome.feature_set.vector().unwrap().head_yaw, -3.0);
    }

    #[test]
    fn test_analyze_landmark_capture() {
        let landmarks = FaceLandmarks {
            nose: vec![Point::new(50.0, 45.0)],
            face_contour: vec![
                Point::new(10.0, 30.0),
                Point::new(50.0, 95.0),
                Point::new(90.0, 30.0),
            ],
            ..Default::default()
        };
        let request = CaptureRequest {
            image_width: 200.0,
            image_height: 200.0,
            face_width: 100.0,
            face_height: 100.0,
            landmarks: Some(landmarks),
            ..Default::default()
        };
        let outcome = analyze(&request).unwrap();
        assert_eq!(outcome.feature_set.mode(), AnalysisMode::GeometryOnly);
        assert_eq!(outcome.metadata.landmark_count, 4);
        // No confidence reported: no quality estimate
        assert!(outcome.capture_quality.is_none());
    }

    #[test]
    fn test_empty_capture_is_rejected() {
        let request = CaptureRequest {
            image_width: 100.0,
            image_height: 100.0,
            face_width: 50.0,
            face_height: 50.0,
            ..Default::default()
        };
        assert!(matches!(
            analyze(&request),
            Err(AnalysisError::EmptyCapture)
        ));

        // Present but empty containers count as absent
        let request = CaptureRequest {
            image_width: 100.0,
            image_height: 100.0,
            face_width: 50.0,
            face_height: 50.0,
            landmarks: Some(FaceLandmarks::default()),
            blend_shapes: Some(HashMap::new()),
            ..Default::default()
        };
        assert!(matches!(
            analyze(&request),
            Err(AnalysisError::EmptyCapture)
        ));
    }

    #[test]
    fn test_invalid_dimensions_are_rejected() {
        let mut request: CaptureRequest = serde_json::from_str(sample_request_json()).unwrap();
        request.face_width = -540.0;
        assert!(matches!(
            analyze(&request),
            Err(AnalysisError::InvalidDimensions(_))
        ));

        let mut request: CaptureRequest = serde_json::from_str(sample_request_json()).unwrap();
        request.image_height = f64::NAN;
        assert!(matches!(
            analyze(&request),
            Err(AnalysisError::InvalidDimensions(_))
        ));

        // Zero dimensions degrade features instead of erroring
        let mut request: CaptureRequest = serde_json::from_str(sample_request_json()).unwrap();
        request.face_width = 0.0;
        request.face_height = 0.0;
        assert!(analyze(&request).is_ok());
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let request: CaptureRequest = serde_json::from_str(sample_request_json()).unwrap();
        let a = analyze(&request).unwrap();
        let b = analyze(&request).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_combined_sources_prefer_geometry_vector() {
        let landmarks = FaceLandmarks {
            nose: vec![Point::new(50.0, 45.0)],
            face_contour: vec![
                Point::new(10.0, 30.0),
                Point::new(52.5, 95.0),
                Point::new(90.0, 30.0),
            ],
            ..Default::default()
        };
        let mut blend_shapes = HashMap::new();
        blend_shapes.insert("mouthSmileLeft".to_string(), 0.5);

        let set = build_feature_set(
            Some(&landmarks),
            Some(&blend_shapes),
            Size::new(100.0, 100.0),
            None,
        );
        assert_eq!(set.mode(), AnalysisMode::BlendShape);
        // Geometry vector reported: jaw shift from landmarks, not coefficients
        assert!(set.vector().unwrap().jaw_shift > 0.0);
    }

    #[test]
    fn test_capture_to_report_json() {
        let report = capture_to_report_json(sample_request_json()).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(payload["fhi_version"], "1.0.0");
        assert_eq!(payload["producer"]["name"], "facepulse");
        assert_eq!(payload["provenance"]["source_device_id"], "capture-rig-7");
        assert_eq!(payload["mode"], "blend_shape");
        assert!(payload["indicators"]["mood"].as_f64().unwrap() > 50.0);
        assert!(payload["overall_score"].as_f64().unwrap() <= 100.0);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(capture_to_report_json("not valid json").is_err());
    }
}
