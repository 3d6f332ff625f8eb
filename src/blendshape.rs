//! Blend-shape adaptation
//!
//! Normalizes an externally supplied named-coefficient map (the 52 canonical
//! ARKit-style blend shapes) into the same feature vocabulary the landmark
//! extractor produces, plus the activation-only aggregates the indicator
//! calculator consumes: average smile, average blink, jaw tension, and
//! overall bilateral symmetry.
//!
//! Unknown coefficient names are ignored, missing names default to 0, and
//! out-of-range values are clamped to [0, 1].

use std::collections::HashMap;

use crate::types::{BlendShapeFeatures, FeatureVector};

/// The canonical blend-shape vocabulary. Coefficient maps may carry any
/// subset; names outside this list are ignored.
pub const CANONICAL_BLEND_SHAPES: [&str; 52] = [
    "eyeBlinkLeft",
    "eyeLookDownLeft",
    "eyeLookInLeft",
    "eyeLookOutLeft",
    "eyeLookUpLeft",
    "eyeSquintLeft",
    "eyeWideLeft",
    "eyeBlinkRight",
    "eyeLookDownRight",
    "eyeLookInRight",
    "eyeLookOutRight",
    "eyeLookUpRight",
    "eyeSquintRight",
    "eyeWideRight",
    "jawForward",
    "jawLeft",
    "jawRight",
    "jawOpen",
    "mouthClose",
    "mouthFunnel",
    "mouthPucker",
    "mouthLeft",
    "mouthRight",
    "mouthSmileLeft",
    "mouthSmileRight",
    "mouthFrownLeft",
    "mouthFrownRight",
    "mouthDimpleLeft",
    "mouthDimpleRight",
    "mouthStretchLeft",
    "mouthStretchRight",
    "mouthRollLower",
    "mouthRollUpper",
    "mouthShrugLower",
    "mouthShrugUpper",
    "mouthPressLeft",
    "mouthPressRight",
    "mouthLowerDownLeft",
    "mouthLowerDownRight",
    "mouthUpperUpLeft",
    "mouthUpperUpRight",
    "browDownLeft",
    "browDownRight",
    "browInnerUp",
    "browOuterUpLeft",
    "browOuterUpRight",
    "cheekPuff",
    "cheekSquintLeft",
    "cheekSquintRight",
    "noseSneerLeft",
    "noseSneerRight",
    "tongueOut",
];

/// Bilateral coefficient pairs used for the overall-symmetry aggregate.
const BILATERAL_COEFFICIENT_PAIRS: [(&str, &str); 10] = [
    ("eyeBlinkLeft", "eyeBlinkRight"),
    ("eyeSquintLeft", "eyeSquintRight"),
    ("eyeWideLeft", "eyeWideRight"),
    ("browOuterUpLeft", "browOuterUpRight"),
    ("mouthSmileLeft", "mouthSmileRight"),
    ("mouthFrownLeft", "mouthFrownRight"),
    ("mouthDimpleLeft", "mouthDimpleRight"),
    ("mouthPressLeft", "mouthPressRight"),
    ("cheekSquintLeft", "cheekSquintRight"),
    ("noseSneerLeft", "noseSneerRight"),
];

/// True when `name` belongs to the canonical vocabulary.
pub fn is_canonical(name: &str) -> bool {
    CANONICAL_BLEND_SHAPES.contains(&name)
}

/// Adapter from blend-shape coefficient maps to the shared feature
/// vocabulary
pub struct BlendShapeAdapter;

impl BlendShapeAdapter {
    /// Adapt a coefficient map into features and aggregates.
    pub fn adapt(coefficients: &HashMap<String, f64>) -> BlendShapeFeatures {
        let c = |name: &str| coefficient(coefficients, name);

        let blink_left = c("eyeBlinkLeft");
        let blink_right = c("eyeBlinkRight");
        let squint_left = c("eyeSquintLeft");
        let squint_right = c("eyeSquintRight");
        let jaw_open = c("jawOpen");
        let jaw_forward = c("jawForward");

        let vector = FeatureVector {
            eye_openness_left: 1.0 - blink_left,
            eye_openness_right: 1.0 - blink_right,
            blink_left,
            blink_right,
            squint_left,
            squint_right,
            brow_raise_left: mean2(c("browInnerUp"), c("browOuterUpLeft")),
            brow_raise_right: mean2(c("browInnerUp"), c("browOuterUpRight")),
            brow_furrow: mean2(c("browDownLeft"), c("browDownRight")),
            smile_left: c("mouthSmileLeft"),
            smile_right: c("mouthSmileRight"),
            frown_left: c("mouthFrownLeft"),
            frown_right: c("mouthFrownRight"),
            mouth_open: jaw_open,
            mouth_pucker: c("mouthPucker"),
            lip_press: mean2(c("mouthPressLeft"), c("mouthPressRight")),
            jaw_shift: (c("jawRight") - c("jawLeft")).clamp(-1.0, 1.0),
            cheek_squint_left: c("cheekSquintLeft"),
            cheek_squint_right: c("cheekSquintRight"),
            // Blend shapes carry no head orientation; the pipeline merges
            // detector pose in separately.
            head_pitch: 0.0,
            head_yaw: 0.0,
            head_roll: 0.0,
        };

        BlendShapeFeatures {
            vector,
            eye_wide: mean2(c("eyeWideLeft"), c("eyeWideRight")),
            nose_sneer: mean2(c("noseSneerLeft"), c("noseSneerRight")),
            mouth_press: mean2(c("mouthPressLeft"), c("mouthPressRight")),
            dimple: mean2(c("mouthDimpleLeft"), c("mouthDimpleRight")),
            average_smile: mean2(c("mouthSmileLeft"), c("mouthSmileRight")),
            average_blink: mean2(blink_left, blink_right),
            jaw_tension: mean2(1.0 - jaw_open, jaw_forward),
            overall_symmetry: overall_symmetry(coefficients),
        }
    }
}

/// Coefficient lookup: missing names default to 0, values clamp to [0, 1].
fn coefficient(coefficients: &HashMap<String, f64>, name: &str) -> f64 {
    coefficients
        .get(name)
        .copied()
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}

fn mean2(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

/// Mean of `1 - |left - right|` over the fixed bilateral coefficient pairs.
fn overall_symmetry(coefficients: &HashMap<String, f64>) -> f64 {
    let sum: f64 = BILATERAL_COEFFICIENT_PAIRS
        .iter()
        .map(|(left, right)| {
            1.0 - (coefficient(coefficients, left) - coefficient(coefficients, right)).abs()
        })
        .sum();
    (sum / BILATERAL_COEFFICIENT_PAIRS.len() as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn coefficients(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_vocabulary_is_complete() {
        assert_eq!(CANONICAL_BLEND_SHAPES.len(), 52);
        for (left, right) in BILATERAL_COEFFICIENT_PAIRS {
            assert!(is_canonical(left));
            assert!(is_canonical(right));
        }
    }

    #[test]
    fn test_empty_map_defaults_to_zero_coefficients() {
        let features = BlendShapeAdapter::adapt(&HashMap::new());
        // Zero blink means fully open eyes
        assert_eq!(features.vector.eye_openness_left, 1.0);
        assert_eq!(features.vector.blink_left, 0.0);
        assert_eq!(features.vector.smile_left, 0.0);
        assert_eq!(features.average_smile, 0.0);
        // Closed jaw with no forward push: half tension
        assert_eq!(features.jaw_tension, 0.5);
        // All pairs equal (at zero) is perfect symmetry
        assert_eq!(features.overall_symmetry, 1.0);
    }

    #[test]
    fn test_bilateral_mapping() {
        let map = coefficients(&[
            ("eyeBlinkLeft", 0.2),
            ("eyeBlinkRight", 0.6),
            ("mouthSmileLeft", 0.8),
            ("mouthSmileRight", 0.4),
            ("browInnerUp", 0.4),
            ("browOuterUpLeft", 0.2),
        ]);
        let features = BlendShapeAdapter::adapt(&map);
        assert!((features.vector.eye_openness_left - 0.8).abs() < 1e-12);
        assert!((features.vector.eye_openness_right - 0.4).abs() < 1e-12);
        assert!((features.vector.brow_raise_left - 0.3).abs() < 1e-12);
        assert!((features.vector.brow_raise_right - 0.2).abs() < 1e-12);
        assert!((features.average_blink - 0.4).abs() < 1e-12);
        assert!((features.average_smile - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_jaw_tension_reads_closed_forward_jaw() {
        let map = coefficients(&[("jawOpen", 0.0), ("jawForward", 1.0)]);
        let features = BlendShapeAdapter::adapt(&map);
        assert_eq!(features.jaw_tension, 1.0);

        let map = coefficients(&[("jawOpen", 1.0), ("jawForward", 0.0)]);
        let features = BlendShapeAdapter::adapt(&map);
        assert_eq!(features.jaw_tension, 0.0);
    }

    #[test]
    fn test_jaw_shift_direction() {
        let map = coefficients(&[("jawLeft", 0.6)]);
        let features = BlendShapeAdapter::adapt(&map);
        assert!((features.vector.jaw_shift - (-0.6)).abs() < 1e-12);

        let map = coefficients(&[("jawRight", 0.3), ("jawLeft", 0.1)]);
        let features = BlendShapeAdapter::adapt(&map);
        assert!((features.vector.jaw_shift - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_equal_sides_give_exact_symmetry() {
        let map = coefficients(&[
            ("mouthSmileLeft", 0.7),
            ("mouthSmileRight", 0.7),
            ("eyeSquintLeft", 0.3),
            ("eyeSquintRight", 0.3),
        ]);
        let features = BlendShapeAdapter::adapt(&map);
        assert_eq!(features.overall_symmetry, 1.0);
        assert_eq!(features.vector.bilateral_symmetry(), 1.0);
    }

    #[test]
    fn test_asymmetry_lowers_overall_symmetry() {
        let map = coefficients(&[("mouthSmileLeft", 1.0)]);
        let features = BlendShapeAdapter::adapt(&map);
        // One of ten pairs fully asymmetric
        assert!((features.overall_symmetry - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let map = coefficients(&[("definitelyNotACoefficient", 0.9), ("mouthSmileLeft", 0.5)]);
        let features = BlendShapeAdapter::adapt(&map);
        assert_eq!(features.vector.smile_left, 0.5);
        assert_eq!(features.vector.frown_left, 0.0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let map = coefficients(&[("mouthSmileLeft", 3.5), ("mouthFrownLeft", -2.0)]);
        let features = BlendShapeAdapter::adapt(&map);
        assert_eq!(features.vector.smile_left, 1.0);
        assert_eq!(features.vector.frown_left, 0.0);
    }

    #[test]
    fn test_adapt_is_idempotent() {
        let map = coefficients(&[
            ("eyeBlinkLeft", 0.31),
            ("mouthSmileRight", 0.62),
            ("jawForward", 0.18),
        ]);
        let a = BlendShapeAdapter::adapt(&map);
        let b = BlendShapeAdapter::adapt(&map);
        assert_eq!(a, b);
    }
}
