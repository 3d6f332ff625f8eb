//! Landmark feature extraction
//!
//! Converts raw per-region landmark point sets into the normalized
//! 22-feature vector:
//! - Eye openness (EAR), blink, and triangular squint
//! - Brow raise and furrow
//! - Per-side smile and frown, mouth open, pucker, lip press
//! - Jaw shift and the cheek-squint approximation
//! - Head pose passthrough
//!
//! Every sub-computation guards its region's minimum point count and its
//! reference distances first; an unmet guard degrades that single feature to
//! its neutral default instead of failing the extraction. Partial landmark
//! detection still yields a usable result.

use crate::calibration::{self, rescale, rescale_inverted};
use crate::geometry::{centroid, distance, max_along, midpoint, min_along, Axis};
use crate::types::{layout, FaceLandmarks, FeatureVector, HeadPose, Point, Size};

/// Feature extractor for landmark geometry
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Extract the feature vector from named landmark regions.
    ///
    /// `face_size` is the detector's face bounding box; it is the reference
    /// for every height/width-normalized fraction. A non-positive dimension
    /// degrades every feature that needs it to its neutral default.
    pub fn extract(
        landmarks: &FaceLandmarks,
        face_size: Size,
        pose: Option<HeadPose>,
    ) -> FeatureVector {
        let mut features = FeatureVector::default();

        // Eyes: openness, blink, squint per side
        if let Some(openness) = eye_openness(&landmarks.eye_left) {
            features.eye_openness_left = openness;
            features.blink_left = 1.0 - openness;
            features.squint_left = squint_from_openness(openness);
        }
        if let Some(openness) = eye_openness(&landmarks.eye_right) {
            features.eye_openness_right = openness;
            features.blink_right = 1.0 - openness;
            features.squint_right = squint_from_openness(openness);
        }

        // Brows
        if let Some(raise) = brow_raise(&landmarks.brow_left, &landmarks.eye_left, face_size) {
            features.brow_raise_left = raise;
        }
        if let Some(raise) = brow_raise(&landmarks.brow_right, &landmarks.eye_right, face_size) {
            features.brow_raise_right = raise;
        }
        if let Some(furrow) = brow_furrow(&landmarks.brow_left, &landmarks.brow_right, face_size) {
            features.brow_furrow = furrow;
        }

        // Mouth
        if let Some((smile, frown)) = mouth_corner_displacement(
            &landmarks.outer_lips,
            layout::OUTER_LIP_LEFT_CORNER,
            face_size,
        ) {
            features.smile_left = smile;
            features.frown_left = frown;
        }
        if let Some((smile, frown)) = mouth_corner_displacement(
            &landmarks.outer_lips,
            layout::OUTER_LIP_RIGHT_CORNER,
            face_size,
        ) {
            features.smile_right = smile;
            features.frown_right = frown;
        }
        if let Some((open, press)) = inner_lip_gap(&landmarks.inner_lips, face_size) {
            features.mouth_open = open;
            features.lip_press = press;
        }
        if let Some(pucker) = mouth_pucker(&landmarks.outer_lips, face_size) {
            features.mouth_pucker = pucker;
        }

        // Jaw
        if let Some(shift) = jaw_shift(&landmarks.face_contour, &landmarks.nose, face_size) {
            features.jaw_shift = shift;
        }

        // Cheek squint has no dedicated landmark signal; approximate from
        // eye squint (see calibration::CHEEK_SQUINT_FACTOR).
        features.cheek_squint_left = features.squint_left * calibration::CHEEK_SQUINT_FACTOR;
        features.cheek_squint_right = features.squint_right * calibration::CHEEK_SQUINT_FACTOR;

        // Head pose passes through in degrees, untransformed
        if let Some(pose) = pose {
            features.head_pitch = pose.pitch;
            features.head_yaw = pose.yaw;
            features.head_roll = pose.roll;
        }

        features
    }
}

/// Eye-aspect-ratio openness: average of the two vertical point-pair
/// distances over the horizontal corner distance, rescaled from the
/// empirical EAR window. None when the region is short or the horizontal
/// span is zero.
fn eye_openness(eye: &[Point]) -> Option<f64> {
    if eye.len() < calibration::MIN_EYE_POINTS {
        return None;
    }
    let horizontal = distance(eye[layout::EYE_OUTER_CORNER], eye[layout::EYE_INNER_CORNER]);
    if horizontal <= 0.0 {
        return None;
    }
    let vertical_a = distance(eye[layout::EYE_TOP_A], eye[layout::EYE_BOTTOM_A]);
    let vertical_b = distance(eye[layout::EYE_TOP_B], eye[layout::EYE_BOTTOM_B]);
    let ear = (vertical_a + vertical_b) / (2.0 * horizontal);
    Some(rescale(ear, calibration::EAR_WINDOW))
}

/// Triangular squint: zero at or below SQUINT_ZERO_LOW, peaking at
/// SQUINT_PEAK, zero again at or above SQUINT_ZERO_HIGH. Partial tense
/// closure reads differently from a fully open or fully closed eye.
fn squint_from_openness(openness: f64) -> f64 {
    let rising = calibration::SQUINT_PEAK - calibration::SQUINT_ZERO_LOW;
    let falling = calibration::SQUINT_ZERO_HIGH - calibration::SQUINT_PEAK;
    if openness <= calibration::SQUINT_ZERO_LOW || openness >= calibration::SQUINT_ZERO_HIGH {
        0.0
    } else if openness <= calibration::SQUINT_PEAK {
        ((openness - calibration::SQUINT_ZERO_LOW) / rising).clamp(0.0, 1.0)
    } else {
        ((calibration::SQUINT_ZERO_HIGH - openness) / falling).clamp(0.0, 1.0)
    }
}

/// Vertical gap between the brow centroid and the topmost eye point,
/// as a fraction of face height.
fn brow_raise(brow: &[Point], eye: &[Point], face_size: Size) -> Option<f64> {
    if brow.len() < calibration::MIN_BROW_POINTS
        || eye.len() < calibration::MIN_EYE_POINTS
        || face_size.height <= 0.0
    {
        return None;
    }
    let brow_center = centroid(brow);
    let eye_top = min_along(eye, Axis::Y)?;
    let gap = (eye_top.y - brow_center.y) / face_size.height;
    Some(rescale(gap, calibration::BROW_RAISE_WINDOW))
}

/// Horizontal gap between the innermost points of the two brows, as a
/// fraction of face width. Narrower gap means stronger furrow.
fn brow_furrow(brow_left: &[Point], brow_right: &[Point], face_size: Size) -> Option<f64> {
    if brow_left.len() < calibration::MIN_BROW_POINTS
        || brow_right.len() < calibration::MIN_BROW_POINTS
        || face_size.width <= 0.0
    {
        return None;
    }
    // Left brow sits on the image-left side, so its innermost point is the
    // rightmost one, and vice versa.
    let left_inner = max_along(brow_left, Axis::X)?;
    let right_inner = min_along(brow_right, Axis::X)?;
    let gap = (right_inner.x - left_inner.x) / face_size.width;
    Some(rescale_inverted(gap, calibration::BROW_FURROW_WINDOW))
}

/// Per-side smile and frown: vertical displacement of one mouth corner
/// relative to the average of the top/bottom lip centers, as a fraction of
/// face height. Smile and frown are computed independently, not as two ends
/// of one scale.
fn mouth_corner_displacement(
    outer_lips: &[Point],
    corner_index: usize,
    face_size: Size,
) -> Option<(f64, f64)> {
    if outer_lips.len() < calibration::MIN_OUTER_LIP_POINTS || face_size.height <= 0.0 {
        return None;
    }
    let corner = outer_lips[corner_index];
    let top = outer_lips[layout::OUTER_LIP_TOP_CENTER];
    let bottom = outer_lips[layout::OUTER_LIP_BOTTOM_CENTER];
    let center_y = (top.y + bottom.y) / 2.0;

    // y-down: a corner above the lip center has a smaller y
    let lift = (center_y - corner.y) / face_size.height;
    let drop = (corner.y - center_y) / face_size.height;
    let smile = rescale(lift, calibration::SMILE_WINDOW);
    let frown = rescale(drop, calibration::FROWN_WINDOW);
    Some((smile, frown))
}

/// Inner-lip vertical gap drives both mouth-open and lip-press: the same
/// raw fraction rescaled against two very different windows.
fn inner_lip_gap(inner_lips: &[Point], face_size: Size) -> Option<(f64, f64)> {
    if inner_lips.len() < calibration::MIN_INNER_LIP_POINTS || face_size.height <= 0.0 {
        return None;
    }
    let top = midpoint(
        inner_lips[layout::INNER_LIP_TOP_A],
        inner_lips[layout::INNER_LIP_TOP_B],
    );
    let bottom = midpoint(
        inner_lips[layout::INNER_LIP_BOTTOM_A],
        inner_lips[layout::INNER_LIP_BOTTOM_B],
    );
    let gap = ((bottom.y - top.y) / face_size.height).max(0.0);
    let open = rescale(gap, calibration::MOUTH_OPEN_WINDOW);
    let press = rescale_inverted(gap, (0.0, calibration::LIP_PRESS_MAX_GAP));
    Some((open, press))
}

/// Corner-to-corner mouth width as a fraction of face width; a narrower
/// mouth reads as puckered.
fn mouth_pucker(outer_lips: &[Point], face_size: Size) -> Option<f64> {
    if outer_lips.len() < calibration::MIN_OUTER_LIP_POINTS || face_size.width <= 0.0 {
        return None;
    }
    let left = outer_lips[layout::OUTER_LIP_LEFT_CORNER];
    let right = outer_lips[layout::OUTER_LIP_RIGHT_CORNER];
    let width = (right.x - left.x).abs() / face_size.width;
    Some(rescale_inverted(width, calibration::MOUTH_PUCKER_WINDOW))
}

/// Horizontal chin offset from the nose centroid, as a fraction of face
/// width. The chin is the contour point with the maximum downward
/// coordinate. Sign encodes direction: negative = shifted left.
fn jaw_shift(face_contour: &[Point], nose: &[Point], face_size: Size) -> Option<f64> {
    if face_contour.len() < calibration::MIN_CONTOUR_POINTS
        || nose.len() < calibration::MIN_NOSE_POINTS
        || face_size.width <= 0.0
    {
        return None;
    }
    let chin = max_along(face_contour, Axis::Y)?;
    let nose_center = centroid(nose);
    let offset = (chin.x - nose_center.x) / face_size.width;
    let magnitude = rescale(offset.abs(), calibration::JAW_SHIFT_WINDOW);
    Some(if offset < 0.0 { -magnitude } else { magnitude })
}
