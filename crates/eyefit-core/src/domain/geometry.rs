//! Pixel geometry produced by the detection backends.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates.
///
/// Face rectangles are relative to the frame, eye rectangles are relative to
/// the face sub-image they were detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Integer center point, `(x + w / 2, y + h / 2)`.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Intersects the rectangle with an image of the given size.
    ///
    /// Returns `(x, y, width, height)` ready for cropping, or `None` when the
    /// intersection is empty.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(width as i32);
        let y1 = (self.y + self.height).min(height as i32);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// A circle reported by the circle transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center x.
    pub x: f32,
    /// Center y.
    pub y: f32,
    /// Radius.
    pub radius: f32,
}

impl Circle {
    /// Creates a circle.
    #[must_use]
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    /// Center and radius rounded half-to-even to whole pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rounded(&self) -> (i32, i32, i32) {
        (
            self.x.round_ties_even() as i32,
            self.y.round_ties_even() as i32,
            self.radius.round_ties_even() as i32,
        )
    }
}

/// Horizontal iris extent within an eye region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrisBoundary {
    /// Left edge offset from the eye region's left edge.
    pub left: i32,
    /// Right edge offset from the eye region's left edge.
    pub right: i32,
}

/// Pupil center within an eye region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PupilCenter {
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_uses_integer_division() {
        let rect = Rect::new(10, 20, 31, 41);
        assert_eq!(rect.center(), (25, 40));
    }

    #[test]
    fn test_clamp_inside() {
        let rect = Rect::new(10, 10, 30, 20);
        assert_eq!(rect.clamp_to(100, 100), Some((10, 10, 30, 20)));
    }

    #[test]
    fn test_clamp_overhanging_edges() {
        let rect = Rect::new(-5, 90, 30, 30);
        assert_eq!(rect.clamp_to(100, 100), Some((0, 90, 25, 10)));
    }

    #[test]
    fn test_clamp_outside_is_none() {
        let rect = Rect::new(120, 10, 30, 30);
        assert_eq!(rect.clamp_to(100, 100), None);

        let empty = Rect::new(10, 10, 0, 30);
        assert_eq!(empty.clamp_to(100, 100), None);
    }

    #[test]
    fn test_circle_rounding_ties_to_even() {
        let circle = Circle::new(12.5, 13.5, 4.4);
        assert_eq!(circle.rounded(), (12, 14, 4));
    }
}
