//! Capture quality estimation
//!
//! Scores how trustworthy a single capture's framing is, independent of any
//! facial content: face size in frame, centering, and raw detector
//! confidence, equally weighted. Callers multiply the [0, 1] result by 100
//! to fold it into the reliability indicator.

use crate::calibration;
use crate::types::{Point, Size};

/// Framing quality estimator for one capture
pub struct CaptureQualityEstimator;

impl CaptureQualityEstimator {
    /// Estimate capture quality in [0, 1].
    ///
    /// `center_offset` is the face center's offset from the image center,
    /// normalized to the image half-extents on each axis (so (0, 0) is
    /// perfectly centered and ±1 touches the frame edge).
    pub fn quality(
        face_size: Size,
        image_size: Size,
        detector_confidence: f64,
        center_offset: Point,
    ) -> f64 {
        let size = size_score(face_size, image_size);
        let centering = centering_score(center_offset);
        let confidence = detector_confidence.clamp(0.0, 1.0);
        ((size + centering + confidence) / 3.0).clamp(0.0, 1.0)
    }
}

/// Face-to-frame area ratio with a 10x gain, capped at 1.
fn size_score(face_size: Size, image_size: Size) -> f64 {
    let image_area = image_size.area();
    if image_area <= 0.0 {
        return 0.0;
    }
    let ratio = (face_size.area() / image_area).max(0.0);
    (ratio * calibration::QUALITY_SIZE_GAIN).min(1.0)
}

/// One minus the average absolute normalized offset on both axes.
fn centering_score(center_offset: Point) -> f64 {
    let mean_offset = (center_offset.x.abs() + center_offset.y.abs()) / 2.0;
    (1.0 - mean_offset).clamp(0.0, 1.0)
}
