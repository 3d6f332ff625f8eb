//! Calibration constants
//!
//! Every empirical rescale window, threshold, and scoring weight lives here,
//! away from the algorithm shape. Recalibrating against new capture data
//! means editing this table, never the extractor or the scorer.
//!
//! The additive bonus/penalty terms in the indicator section are heuristic
//! calibration values without a measured derivation; tests pin them as fixed
//! behavior so a recalibration shows up as an explicit diff.

/// A linear rescale window `(lower, upper)`.
pub type Window = (f64, f64);

/// `clamp((value - lo) / (hi - lo), 0, 1)` — the one rescale shape used by
/// every normalized feature.
pub fn rescale(value: f64, window: Window) -> f64 {
    let (lo, hi) = window;
    if hi <= lo {
        return 0.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Inverted rescale: smaller raw values map to higher activation.
pub fn rescale_inverted(value: f64, window: Window) -> f64 {
    let (lo, hi) = window;
    if hi <= lo {
        return 0.0;
    }
    ((hi - value) / (hi - lo)).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Landmark feature extraction
// ---------------------------------------------------------------------------

/// Empirical eye-aspect-ratio range: 0.10 reads as closed, 0.40 as wide open.
pub const EAR_WINDOW: Window = (0.10, 0.40);

/// Squint is a triangular function of eye openness: zero at or below this...
pub const SQUINT_ZERO_LOW: f64 = 0.3;
/// ...peaking here (partial, tense closure)...
pub const SQUINT_PEAK: f64 = 0.5;
/// ...and zero again at or above this (relaxed open eye).
pub const SQUINT_ZERO_HIGH: f64 = 0.7;

/// Brow-to-eye vertical gap as a fraction of face height.
pub const BROW_RAISE_WINDOW: Window = (0.02, 0.08);

/// Inner-brow gap as a fraction of face width; inverted (narrow = furrowed).
pub const BROW_FURROW_WINDOW: Window = (0.15, 0.25);

/// Mouth-corner lift above lip center, fraction of face height.
pub const SMILE_WINDOW: Window = (0.0, 0.06);

/// Mouth-corner drop below lip center, fraction of face height.
pub const FROWN_WINDOW: Window = (0.0, 0.05);

/// Inner-lip vertical gap, fraction of face height.
pub const MOUTH_OPEN_WINDOW: Window = (0.01, 0.11);

/// Corner-to-corner mouth width, fraction of face width; inverted
/// (narrow mouth = puckered).
pub const MOUTH_PUCKER_WINDOW: Window = (0.25, 0.45);

/// Inner-lip gaps below this fraction of face height read as pressed lips,
/// distinct from "closed but relaxed".
pub const LIP_PRESS_MAX_GAP: f64 = 0.015;

/// Chin offset from the nose centroid, fraction of face width.
pub const JAW_SHIFT_WINDOW: Window = (0.0, 0.05);

/// Cheek squint is approximated from eye squint when no dedicated cheek
/// signal exists; the factor is a calibration target, not ground truth.
pub const CHEEK_SQUINT_FACTOR: f64 = 0.8;

/// Minimum region sizes. A region below its minimum degrades the dependent
/// features to their neutral defaults instead of failing the extraction.
pub const MIN_EYE_POINTS: usize = 6;
pub const MIN_BROW_POINTS: usize = 3;
pub const MIN_OUTER_LIP_POINTS: usize = 12;
pub const MIN_INNER_LIP_POINTS: usize = 6;
pub const MIN_NOSE_POINTS: usize = 1;
pub const MIN_CONTOUR_POINTS: usize = 3;

/// Neutral defaults: openness-style features sit at the midpoint,
/// activation-style features at zero.
pub const NEUTRAL_OPENNESS: f64 = 0.5;
pub const NEUTRAL_ACTIVATION: f64 = 0.0;

// ---------------------------------------------------------------------------
// Health indicators
// ---------------------------------------------------------------------------

/// Per-axis head pose limits (degrees) beyond which the axis contributes
/// zero to the pose-centering score.
pub const POSE_PITCH_LIMIT_DEG: f64 = 30.0;
pub const POSE_YAW_LIMIT_DEG: f64 = 45.0;
pub const POSE_ROLL_LIMIT_DEG: f64 = 30.0;

/// Maximum alertness points removed for a fully off-center head pose.
pub const ALERTNESS_POSE_PENALTY: f64 = 25.0;

/// Alertness baseline when only activation coefficients are available.
pub const ALERTNESS_ACTIVATION_BASE: f64 = 60.0;
pub const ALERTNESS_EYE_WIDE_BONUS: f64 = 20.0;
pub const ALERTNESS_BLINK_PENALTY: f64 = 30.0;
pub const ALERTNESS_SQUINT_PENALTY: f64 = 10.0;
pub const ALERTNESS_BROW_RAISE_BONUS: f64 = 10.0;

/// Tension contribution weights. Only the weights for signals actually
/// available are summed; the result is normalized by the available weight,
/// never by the full set.
pub const TENSION_FURROW_WEIGHT: f64 = 0.30;
pub const TENSION_SQUINT_WEIGHT: f64 = 0.25;
pub const TENSION_LIP_PRESS_WEIGHT: f64 = 0.20;
pub const TENSION_JAW_WEIGHT: f64 = 0.15;
pub const TENSION_SNEER_WEIGHT: f64 = 0.10;

/// Alertness when no feature source exists at all.
pub const ALERTNESS_FALLBACK: f64 = 50.0;

/// Geometry-mode tension approximations: closed-beyond-neutral eyes and an
/// off-center, rigid head pose stand in for the activation-only signals.
pub const TENSION_EYE_CLOSURE_WEIGHT: f64 = 0.15;
pub const TENSION_POSE_WEIGHT: f64 = 0.10;

pub const MOOD_BASELINE: f64 = 50.0;
pub const MOOD_SMILE_GAIN: f64 = 45.0;
pub const MOOD_FROWN_GAIN: f64 = 35.0;
pub const MOOD_CHEEK_BONUS: f64 = 5.0;
pub const MOOD_DIMPLE_BONUS: f64 = 5.0;

/// Smile and frown both below this threshold force the mood score back to
/// the exact baseline (avoids drift from landmark noise).
pub const MOOD_NEUTRAL_EPSILON: f64 = 0.05;

/// Weak eye-openness mood proxy gain, used only in geometry mode when the
/// mouth reads neutral.
pub const MOOD_OPENNESS_PROXY_GAIN: f64 = 10.0;

/// Symmetry score when no bilateral data exists at all.
pub const SYMMETRY_FALLBACK: f64 = 85.0;

/// Face area gets full reliability credit at or above this share of frame.
pub const RELIABILITY_FULL_AREA_RATIO: f64 = 0.25;

/// Reference dense-landmark count for the landmark-coverage sub-score.
pub const LANDMARK_REFERENCE_COUNT: usize = 68;

/// Fixed sub-score contributed when blend-shape activation data is present.
pub const BLEND_SHAPE_AVAILABILITY_SCORE: f64 = 100.0;

/// Overall score weights. Tension is inverted (100 - tension) before
/// weighting because high tension is undesirable.
pub const OVERALL_ALERTNESS_WEIGHT: f64 = 0.30;
pub const OVERALL_TENSION_WEIGHT: f64 = 0.20;
pub const OVERALL_MOOD_WEIGHT: f64 = 0.20;
pub const OVERALL_SYMMETRY_WEIGHT: f64 = 0.15;
pub const OVERALL_RELIABILITY_WEIGHT: f64 = 0.15;

// ---------------------------------------------------------------------------
// Capture quality
// ---------------------------------------------------------------------------

/// Face-area-to-frame-area gain; a face filling 10% of the frame already
/// earns a full size sub-score.
pub const QUALITY_SIZE_GAIN: f64 = 10.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_clamps_both_ends() {
        assert_eq!(rescale(0.05, EAR_WINDOW), 0.0);
        assert_eq!(rescale(0.55, EAR_WINDOW), 1.0);
        assert!((rescale(0.25, EAR_WINDOW) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rescale_inverted() {
        assert_eq!(rescale_inverted(0.25, BROW_FURROW_WINDOW), 0.0);
        assert_eq!(rescale_inverted(0.15, BROW_FURROW_WINDOW), 1.0);
        assert!((rescale_inverted(0.20, BROW_FURROW_WINDOW) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_window_is_zero() {
        assert_eq!(rescale(0.5, (1.0, 1.0)), 0.0);
        assert_eq!(rescale_inverted(0.5, (1.0, 0.0)), 0.0);
    }

    #[test]
    fn test_overall_weights_sum_to_one() {
        let sum = OVERALL_ALERTNESS_WEIGHT
            + OVERALL_TENSION_WEIGHT
            + OVERALL_MOOD_WEIGHT
            + OVERALL_SYMMETRY_WEIGHT
            + OVERALL_RELIABILITY_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
