//! Per-tick landmark input supplied by the external landmark provider.
//!
//! The monitor consumes normalized 2D points plus the frame dimensions and
//! never retains a frame beyond one tick. A tick with no detected face is
//! represented by the absence of a frame, not by an error.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single normalized landmark point in [0, 1] image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// One frame worth of facial landmarks plus the frame dimensions in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Normalized landmark points, indexed per the provider's layout
    pub points: Vec<Point>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl LandmarkFrame {
    /// Create a frame, checking the input contract
    pub fn new(points: Vec<Point>, width: u32, height: u32) -> Result<Self> {
        let frame = Self { points, width, height };
        frame.validate()?;
        Ok(frame)
    }

    /// Check the input contract: positive dimensions and at least one point
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Geometry(format!(
                "frame dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.points.is_empty() {
            return Err(Error::InvalidInput("landmark list is empty".to_string()));
        }
        Ok(())
    }

    /// Horizontal nose position in pixels
    pub fn nose_x(&self, nose_index: usize) -> Result<f64> {
        let nose = self.points.get(nose_index).ok_or_else(|| {
            Error::InvalidInput(format!(
                "nose landmark index {} out of range for {} points",
                nose_index,
                self.points.len()
            ))
        })?;
        Ok(f64::from(nose.x) * f64::from(self.width))
    }

    /// Vertical face center in pixels: midpoint of the landmark bounding box
    #[must_use]
    pub fn face_center_y(&self) -> f64 {
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.points {
            let y = f64::from(p.y) * f64::from(self.height);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        (min_y + max_y) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nose_x_in_pixels() {
        let frame = LandmarkFrame::new(vec![Point { x: 0.1, y: 0.1 }, Point { x: 0.5, y: 0.5 }], 640, 480)
            .expect("valid frame");
        let nose_x = frame.nose_x(1).expect("nose index in range");
        assert!((nose_x - 320.0).abs() < 1e-6);
    }

    #[test]
    fn test_face_center_is_bbox_midpoint() {
        let frame = LandmarkFrame::new(
            vec![
                Point { x: 0.5, y: 0.2 },
                Point { x: 0.5, y: 0.6 },
                Point { x: 0.5, y: 0.4 },
            ],
            640,
            480,
        )
        .expect("valid frame");
        // Midpoint of min/max y, not the mean of all points
        assert!((frame.face_center_y() - (0.2 + 0.6) / 2.0 * 480.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let result = LandmarkFrame::new(vec![Point { x: 0.5, y: 0.5 }], 0, 480);
        assert!(matches!(result, Err(Error::Geometry(_))));
    }

    #[test]
    fn test_empty_points_rejected() {
        let result = LandmarkFrame::new(vec![], 640, 480);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_nose_index_out_of_range() {
        let frame = LandmarkFrame::new(vec![Point { x: 0.5, y: 0.5 }], 640, 480).expect("valid frame");
        assert!(frame.nose_x(1).is_err());
    }
}
