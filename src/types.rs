//! Core types for the Facepulse pipeline
//!
//! This module defines the data that flows through each stage: landmark
//! regions, the normalized 22-feature vector, the tagged feature set handed
//! to the scorer, health indicator scores, and capture provenance.

use serde::{Deserialize, Serialize};

use crate::calibration;

/// An immutable 2D coordinate. Image convention: y grows downward, so the
/// "lowest" point of a region is the one with the maximum y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair for an image or a face bounding box (same length unit
/// as the landmark coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Head orientation in degrees, passed through from the upstream detector
/// without transformation. Zero on every axis means facing the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadPose {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Point-index layout for each landmark region.
///
/// The ordering of points within a region is a contract with the upstream
/// landmark source; these named indices replace bare positional indexing so
/// a detector swap that reorders points fails loudly in one place.
pub mod layout {
    /// Eye regions (6 points): corner, two top, corner, two bottom.
    pub const EYE_OUTER_CORNER: usize = 0;
    pub const EYE_TOP_A: usize = 1;
    pub const EYE_TOP_B: usize = 2;
    pub const EYE_INNER_CORNER: usize = 3;
    pub const EYE_BOTTOM_B: usize = 4;
    pub const EYE_BOTTOM_A: usize = 5;

    /// Outer lips (12 points): corners at 0 and 6, centers at 3 and 9.
    pub const OUTER_LIP_LEFT_CORNER: usize = 0;
    pub const OUTER_LIP_TOP_CENTER: usize = 3;
    pub const OUTER_LIP_RIGHT_CORNER: usize = 6;
    pub const OUTER_LIP_BOTTOM_CENTER: usize = 9;

    /// Inner lips (6 points): corner, two top, corner, two bottom. The top
    /// and bottom centers are the midpoints of the two top/bottom points.
    pub const INNER_LIP_LEFT_CORNER: usize = 0;
    pub const INNER_LIP_TOP_A: usize = 1;
    pub const INNER_LIP_TOP_B: usize = 2;
    pub const INNER_LIP_RIGHT_CORNER: usize = 3;
    pub const INNER_LIP_BOTTOM_B: usize = 4;
    pub const INNER_LIP_BOTTOM_A: usize = 5;
}

/// Named landmark regions for one face, as delivered by the upstream
/// detector. Regions may be partially populated; each feature falls back to
/// its neutral default when its region is below the minimum point count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceLandmarks {
    #[serde(default)]
    pub eye_left: Vec<Point>,
    #[serde(default)]
    pub eye_right: Vec<Point>,
    #[serde(default)]
    pub brow_left: Vec<Point>,
    #[serde(default)]
    pub brow_right: Vec<Point>,
    #[serde(default)]
    pub outer_lips: Vec<Point>,
    #[serde(default)]
    pub inner_lips: Vec<Point>,
    #[serde(default)]
    pub nose: Vec<Point>,
    #[serde(default)]
    pub face_contour: Vec<Point>,
}

impl FaceLandmarks {
    /// Total number of points across all regions.
    pub fn point_count(&self) -> usize {
        self.eye_left.len()
            + self.eye_right.len()
            + self.brow_left.len()
            + self.brow_right.len()
            + self.outer_lips.len()
            + self.inner_lips.len()
            + self.nose.len()
            + self.face_contour.len()
    }

    /// True when no region carries any points.
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}

/// The fixed 22-feature vocabulary shared by the landmark extractor and the
/// blend-shape adapter.
///
/// Every non-pose feature is clamped to [0, 1], with two exceptions:
/// `jaw_shift` spans [-1, 1] (negative = shifted left, positive = right) and
/// the three head pose angles are raw degrees. Neutral defaults are 0.5 for
/// the two openness features and 0 for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub eye_openness_left: f64,
    pub eye_openness_right: f64,
    pub blink_left: f64,
    pub blink_right: f64,
    pub squint_left: f64,
    pub squint_right: f64,
    pub brow_raise_left: f64,
    pub brow_raise_right: f64,
    pub brow_furrow: f64,
    pub smile_left: f64,
    pub smile_right: f64,
    pub frown_left: f64,
    pub frown_right: f64,
    pub mouth_open: f64,
    pub mouth_pucker: f64,
    pub lip_press: f64,
    pub jaw_shift: f64,
    pub cheek_squint_left: f64,
    pub cheek_squint_right: f64,
    pub head_pitch: f64,
    pub head_yaw: f64,
    pub head_roll: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            eye_openness_left: calibration::NEUTRAL_OPENNESS,
            eye_openness_right: calibration::NEUTRAL_OPENNESS,
            blink_left: calibration::NEUTRAL_ACTIVATION,
            blink_right: calibration::NEUTRAL_ACTIVATION,
            squint_left: calibration::NEUTRAL_ACTIVATION,
            squint_right: calibration::NEUTRAL_ACTIVATION,
            brow_raise_left: calibration::NEUTRAL_ACTIVATION,
            brow_raise_right: calibration::NEUTRAL_ACTIVATION,
            brow_furrow: calibration::NEUTRAL_ACTIVATION,
            smile_left: calibration::NEUTRAL_ACTIVATION,
            smile_right: calibration::NEUTRAL_ACTIVATION,
            frown_left: calibration::NEUTRAL_ACTIVATION,
            frown_right: calibration::NEUTRAL_ACTIVATION,
            mouth_open: calibration::NEUTRAL_ACTIVATION,
            mouth_pucker: calibration::NEUTRAL_ACTIVATION,
            lip_press: calibration::NEUTRAL_ACTIVATION,
            jaw_shift: calibration::NEUTRAL_ACTIVATION,
            cheek_squint_left: calibration::NEUTRAL_ACTIVATION,
            cheek_squint_right: calibration::NEUTRAL_ACTIVATION,
            head_pitch: 0.0,
            head_yaw: 0.0,
            head_roll: 0.0,
        }
    }
}

impl FeatureVector {
    pub fn eye_openness_average(&self) -> f64 {
        (self.eye_openness_left + self.eye_openness_right) / 2.0
    }

    pub fn blink_average(&self) -> f64 {
        (self.blink_left + self.blink_right) / 2.0
    }

    pub fn squint_average(&self) -> f64 {
        (self.squint_left + self.squint_right) / 2.0
    }

    pub fn brow_raise_average(&self) -> f64 {
        (self.brow_raise_left + self.brow_raise_right) / 2.0
    }

    pub fn smile_average(&self) -> f64 {
        (self.smile_left + self.smile_right) / 2.0
    }

    pub fn frown_average(&self) -> f64 {
        (self.frown_left + self.frown_right) / 2.0
    }

    pub fn cheek_squint_average(&self) -> f64 {
        (self.cheek_squint_left + self.cheek_squint_right) / 2.0
    }

    pub fn head_pose(&self) -> HeadPose {
        HeadPose {
            pitch: self.head_pitch,
            yaw: self.head_yaw,
            roll: self.head_roll,
        }
    }

    /// The bilateral (left, right) feature pairs used for symmetry scoring.
    pub fn bilateral_pairs(&self) -> [(f64, f64); 6] {
        [
            (self.eye_openness_left, self.eye_openness_right),
            (self.squint_left, self.squint_right),
            (self.brow_raise_left, self.brow_raise_right),
            (self.smile_left, self.smile_right),
            (self.frown_left, self.frown_right),
            (self.cheek_squint_left, self.cheek_squint_right),
        ]
    }

    /// Mean of `1 - |left - right|` over the bilateral pairs, in [0, 1].
    pub fn bilateral_symmetry(&self) -> f64 {
        let pairs = self.bilateral_pairs();
        let sum: f64 = pairs.iter().map(|(l, r)| 1.0 - (l - r).abs()).sum();
        (sum / pairs.len() as f64).clamp(0.0, 1.0)
    }
}

/// Which upstream source produced the scored features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    GeometryOnly,
    BlendShape,
    Unavailable,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::GeometryOnly => "geometry_only",
            AnalysisMode::BlendShape => "blend_shape",
            AnalysisMode::Unavailable => "unavailable",
        }
    }
}

/// Feature vector plus the activation-only signals the 22-feature vocabulary
/// does not carry, produced by the blend-shape adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendShapeFeatures {
    /// The shared feature vocabulary, mapped from coefficients.
    pub vector: FeatureVector,
    /// Mean of eyeWideLeft/Right.
    pub eye_wide: f64,
    /// Mean of noseSneerLeft/Right.
    pub nose_sneer: f64,
    /// Mean of mouthPressLeft/Right.
    pub mouth_press: f64,
    /// Mean of mouthDimpleLeft/Right.
    pub dimple: f64,
    /// Mean of mouthSmileLeft/Right.
    pub average_smile: f64,
    /// Mean of eyeBlinkLeft/Right.
    pub average_blink: f64,
    /// Mean of (1 - jawOpen) and jawForward: a closed, forward-pushing jaw
    /// reads as tense.
    pub jaw_tension: f64,
    /// Mean of `1 - |left - right|` over the bilateral coefficient pairs.
    pub overall_symmetry: f64,
}

/// Tagged feature source handed to the indicator calculator. Making the
/// source explicit keeps every scoring formula's branch exhaustive instead
/// of a pile of nested optional checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FeatureSet {
    /// Landmark geometry only.
    GeometryOnly { features: FeatureVector },
    /// Blend-shape coefficients, optionally alongside landmark geometry.
    BlendShape {
        geometry: Option<FeatureVector>,
        activation: BlendShapeFeatures,
    },
    /// Neither source produced features.
    Unavailable,
}

impl FeatureSet {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            FeatureSet::GeometryOnly { .. } => AnalysisMode::GeometryOnly,
            FeatureSet::BlendShape { .. } => AnalysisMode::BlendShape,
            FeatureSet::Unavailable => AnalysisMode::Unavailable,
        }
    }

    /// The feature vector to report, preferring landmark geometry over the
    /// coefficient-mapped vector when both exist.
    pub fn vector(&self) -> Option<&FeatureVector> {
        match self {
            FeatureSet::GeometryOnly { features } => Some(features),
            FeatureSet::BlendShape {
                geometry: Some(features),
                ..
            } => Some(features),
            FeatureSet::BlendShape {
                geometry: None,
                activation,
            } => Some(&activation.vector),
            FeatureSet::Unavailable => None,
        }
    }
}

/// Capture provenance: frame and face dimensions plus how many landmark
/// points the detector delivered. Produced once per capture, read-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub image_width: f64,
    pub image_height: f64,
    pub face_width: f64,
    pub face_height: f64,
    pub landmark_count: usize,
}

impl CaptureMetadata {
    pub fn image_size(&self) -> Size {
        Size::new(self.image_width, self.image_height)
    }

    pub fn face_size(&self) -> Size {
        Size::new(self.face_width, self.face_height)
    }
}

/// Capture-level inputs to reliability scoring that live outside the
/// feature vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureContext {
    /// Frame/face dimensions and landmark count, when known.
    pub metadata: Option<CaptureMetadata>,
    /// Raw detector confidence in [0, 1], when reported.
    pub detector_confidence: Option<f64>,
}

/// The five health indicator scores, each in [0, 100].
///
/// The overall score is derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthIndicators {
    pub alertness: f64,
    pub tension: f64,
    pub mood: f64,
    pub symmetry: f64,
    pub reliability: f64,
}

impl HealthIndicators {
    /// Fixed-weight combination of the five scores; tension is inverted
    /// before weighting.
    pub fn overall_score(&self) -> f64 {
        let weighted = self.alertness * calibration::OVERALL_ALERTNESS_WEIGHT
            + (100.0 - self.tension) * calibration::OVERALL_TENSION_WEIGHT
            + self.mood * calibration::OVERALL_MOOD_WEIGHT
            + self.symmetry * calibration::OVERALL_SYMMETRY_WEIGHT
            + self.reliability * calibration::OVERALL_RELIABILITY_WEIGHT;
        weighted.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vector_is_neutral() {
        let v = FeatureVector::default();
        assert_eq!(v.eye_openness_left, 0.5);
        assert_eq!(v.eye_openness_right, 0.5);
        assert_eq!(v.smile_left, 0.0);
        assert_eq!(v.jaw_shift, 0.0);
        assert_eq!(v.head_yaw, 0.0);
    }

    #[test]
    fn test_default_vector_is_perfectly_symmetric() {
        let v = FeatureVector::default();
        assert_eq!(v.bilateral_symmetry(), 1.0);
    }

    #[test]
    fn test_bilateral_symmetry_drops_with_asymmetry() {
        let v = FeatureVector {
            smile_left: 1.0,
            smile_right: 0.0,
            ..Default::default()
        };
        // one of six pairs fully asymmetric
        assert!((v.bilateral_symmetry() - (5.0 / 6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_overall_score_weighting() {
        let indicators = HealthIndicators {
            alertness: 100.0,
            tension: 0.0,
            mood: 100.0,
            symmetry: 100.0,
            reliability: 100.0,
        };
        assert!((indicators.overall_score() - 100.0).abs() < 1e-12);

        let neutral = HealthIndicators {
            alertness: 50.0,
            tension: 50.0,
            mood: 50.0,
            symmetry: 50.0,
            reliability: 50.0,
        };
        assert!((neutral.overall_score() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_feature_set_vector_prefers_geometry() {
        let geometry = FeatureVector {
            smile_left: 0.7,
            ..Default::default()
        };
        let activation = BlendShapeFeatures {
            vector: FeatureVector::default(),
            eye_wide: 0.0,
            nose_sneer: 0.0,
            mouth_press: 0.0,
            dimple: 0.0,
            average_smile: 0.0,
            average_blink: 0.0,
            jaw_tension: 0.5,
            overall_symmetry: 1.0,
        };
        let set = FeatureSet::BlendShape {
            geometry: Some(geometry),
            activation,
        };
        assert_eq!(set.mode(), AnalysisMode::BlendShape);
        assert_eq!(set.vector().unwrap().smile_left, 0.7);
        assert!(FeatureSet::Unavailable.vector().is_none());
    }

    #[test]
    fn test_mode_as_str() {
        assert_eq!(AnalysisMode::GeometryOnly.as_str(), "geometry_only");
        assert_eq!(AnalysisMode::BlendShape.as_str(), "blend_shape");
        assert_eq!(AnalysisMode::Unavailable.as_str(), "unavailable");
    }
}
