//! Health indicator scoring
//!
//! Maps a tagged feature set to the five 0-100 indicator scores. Every
//! formula branches exhaustively on the feature source, so each mode's
//! behavior is testable in isolation:
//!
//! - **Alertness** — eye openness with a head-pose-deviation penalty in
//!   geometry mode; activation bonuses/penalties in blend-shape mode,
//!   combined additively with the pose-based score when both sources exist.
//! - **Tension** — weighted sum of furrow, squint, and press contributions,
//!   extended with jaw tension and nose sneer when activation data exists,
//!   approximated via eye closure and pose rigidity otherwise. Weights are
//!   normalized over the signals actually available.
//! - **Mood** — baseline 50, shifted by smile/frown intensity; forced back
//!   to exactly 50 when both read as noise.
//! - **Symmetry** — mean bilateral agreement, with a fixed fallback when no
//!   bilateral data exists.
//! - **Reliability** — simple average over however many capture sub-scores
//!   are available; missing signals are excluded, never zero-filled.

use crate::calibration;
use crate::types::{CaptureContext, FeatureSet, FeatureVector, HeadPose, HealthIndicators};

/// Rule-based scorer over the feature vocabulary
pub struct HealthIndicatorCalculator;

impl HealthIndicatorCalculator {
    /// Score a feature set. Pure function: no side effects, no state.
    pub fn score(set: &FeatureSet, context: &CaptureContext) -> HealthIndicators {
        HealthIndicators {
            alertness: score_alertness(set).clamp(0.0, 100.0),
            tension: score_tension(set).clamp(0.0, 100.0),
            mood: score_mood(set).clamp(0.0, 100.0),
            symmetry: score_symmetry(set).clamp(0.0, 100.0),
            reliability: score_reliability(set, context).clamp(0.0, 100.0),
        }
    }
}

/// Mean over the three axes of "closeness to zero": each axis contributes
/// `1 - min(|angle| / limit, 1)`.
fn pose_centering(pose: HeadPose) -> f64 {
    let axis = |angle: f64, limit: f64| 1.0 - (angle.abs() / limit).min(1.0);
    (axis(pose.pitch, calibration::POSE_PITCH_LIMIT_DEG)
        + axis(pose.yaw, calibration::POSE_YAW_LIMIT_DEG)
        + axis(pose.roll, calibration::POSE_ROLL_LIMIT_DEG))
        / 3.0
}

/// Eye openness scaled to 0-100, minus a penalty proportional to how far
/// the head pose deviates from centered.
fn pose_based_alertness(features: &FeatureVector) -> f64 {
    let base = features.eye_openness_average() * 100.0;
    let penalty = (1.0 - pose_centering(features.head_pose())) * calibration::ALERTNESS_POSE_PENALTY;
    base - penalty
}

fn score_alertness(set: &FeatureSet) -> f64 {
    match set {
        FeatureSet::GeometryOnly { features } => pose_based_alertness(features),
        FeatureSet::BlendShape {
            geometry,
            activation,
        } => {
            let delta = activation.eye_wide * calibration::ALERTNESS_EYE_WIDE_BONUS
                - activation.average_blink * calibration::ALERTNESS_BLINK_PENALTY
                - activation.vector.squint_average() * calibration::ALERTNESS_SQUINT_PENALTY
                + activation.vector.brow_raise_average() * calibration::ALERTNESS_BROW_RAISE_BONUS;
            match geometry {
                Some(features) => pose_based_alertness(features) + delta,
                None => calibration::ALERTNESS_ACTIVATION_BASE + delta,
            }
        }
        FeatureSet::Unavailable => calibration::ALERTNESS_FALLBACK,
    }
}

fn score_tension(set: &FeatureSet) -> f64 {
    let contributions: Vec<(f64, f64)> = match set {
        FeatureSet::GeometryOnly { features } => {
            // Closed-beyond-neutral eyes and an off-center pose stand in
            // for the activation-only jaw and sneer signals
            let eye_closure =
                ((calibration::NEUTRAL_OPENNESS - features.eye_openness_average()).max(0.0) * 2.0)
                    .min(1.0);
            let pose_rigidity = 1.0 - pose_centering(features.head_pose());
            vec![
                (features.brow_furrow, calibration::TENSION_FURROW_WEIGHT),
                (features.squint_average(), calibration::TENSION_SQUINT_WEIGHT),
                (features.lip_press, calibration::TENSION_LIP_PRESS_WEIGHT),
                (eye_closure, calibration::TENSION_EYE_CLOSURE_WEIGHT),
                (pose_rigidity, calibration::TENSION_POSE_WEIGHT),
            ]
        }
        FeatureSet::BlendShape { activation, .. } => vec![
            (
                activation.vector.brow_furrow,
                calibration::TENSION_FURROW_WEIGHT,
            ),
            (
                activation.vector.squint_average(),
                calibration::TENSION_SQUINT_WEIGHT,
            ),
            (
                activation.mouth_press,
                calibration::TENSION_LIP_PRESS_WEIGHT,
            ),
            (activation.jaw_tension, calibration::TENSION_JAW_WEIGHT),
            (activation.nose_sneer, calibration::TENSION_SNEER_WEIGHT),
        ],
        FeatureSet::Unavailable => return 0.0,
    };

    let total_weight: f64 = contributions.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = contributions.iter().map(|(v, w)| v * w).sum();
    (weighted / total_weight) * 100.0
}

fn score_mood(set: &FeatureSet) -> f64 {
    match set {
        FeatureSet::GeometryOnly { features } => {
            let smile = features.smile_average();
            let frown = features.frown_average();
            if smile < calibration::MOOD_NEUTRAL_EPSILON
                && frown < calibration::MOOD_NEUTRAL_EPSILON
            {
                // No mouth signal: lean weakly on eye openness
                calibration::MOOD_BASELINE
                    + (features.eye_openness_average() - calibration::NEUTRAL_OPENNESS)
                        * calibration::MOOD_OPENNESS_PROXY_GAIN
            } else {
                calibration::MOOD_BASELINE + smile * calibration::MOOD_SMILE_GAIN
                    - frown * calibration::MOOD_FROWN_GAIN
            }
        }
        FeatureSet::BlendShape { activation, .. } => {
            let smile = activation.average_smile;
            let frown = activation.vector.frown_average();
            if smile < calibration::MOOD_NEUTRAL_EPSILON
                && frown < calibration::MOOD_NEUTRAL_EPSILON
            {
                // Both signals read as noise: hold the exact baseline
                calibration::MOOD_BASELINE
            } else {
                calibration::MOOD_BASELINE + smile * calibration::MOOD_SMILE_GAIN
                    - frown * calibration::MOOD_FROWN_GAIN
                    + activation.vector.cheek_squint_average() * calibration::MOOD_CHEEK_BONUS
                    + activation.dimple * calibration::MOOD_DIMPLE_BONUS
            }
        }
        FeatureSet::Unavailable => calibration::MOOD_BASELINE,
    }
}

fn score_symmetry(set: &FeatureSet) -> f64 {
    match set {
        FeatureSet::GeometryOnly { features } => features.bilateral_symmetry() * 100.0,
        FeatureSet::BlendShape { activation, .. } => activation.overall_symmetry * 100.0,
        FeatureSet::Unavailable => calibration::SYMMETRY_FALLBACK,
    }
}

/// Average of the available capture sub-scores. Each sub-score is already
/// 0-100; signals the capture did not supply are excluded from the
/// denominator rather than counted as zero.
fn score_reliability(set: &FeatureSet, context: &CaptureContext) -> f64 {
    let mut sub_scores: Vec<f64> = Vec::with_capacity(5);

    if let Some(confidence) = context.detector_confidence {
        sub_scores.push(confidence.clamp(0.0, 1.0) * 100.0);
    }

    if let Some(features) = set.vector() {
        sub_scores.push(pose_centering(features.head_pose()) * 100.0);
    }

    if let Some(metadata) = &context.metadata {
        let image_area = metadata.image_size().area();
        if image_area > 0.0 {
            let area_ratio = metadata.face_size().area() / image_area;
            sub_scores
                .push((area_ratio / calibration::RELIABILITY_FULL_AREA_RATIO).min(1.0) * 100.0);
        }
        if metadata.landmark_count > 0 {
            let coverage =
                metadata.landmark_count as f64 / calibration::LANDMARK_REFERENCE_COUNT as f64;
            sub_scores.push(coverage.min(1.0) * 100.0);
        }
    }

    if set.mode() == crate::types::AnalysisMode::BlendShape {
        sub_scores.push(calibration::BLEND_SHAPE_AVAILABILITY_SCORE);
    }

    if sub_scores.is_empty() {
        return 0.0;
    }
    sub_scores.iter().sum::<f64>() / sub_scores.len() as f64
}
