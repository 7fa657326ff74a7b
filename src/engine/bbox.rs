use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in image-pixel space (TLBR format).
///
/// Boxes come straight from the detector, so degenerate (zero-area) boxes are
/// tolerated rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left x coordinate
    pub x1: f32,
    /// Top-left y coordinate
    pub y1: f32,
    /// Bottom-right x coordinate
    pub x2: f32,
    /// Bottom-right y coordinate
    pub y2: f32,
}

impl BoundingBox {
    /// Create a box from TLBR coordinates (x1, y1, x2, y2).
    #[inline]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a box from TLWH format (top-left x, top-left y, width, height).
    #[inline]
    pub fn from_tlwh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Create a box from center x, center y, width and height.
    #[inline]
    pub fn from_xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    /// Convert to `[x1, y1, x2, y2]`.
    #[inline]
    pub fn to_xyxy(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.x1 + self.x2) / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        (self.y1 + self.y2) / 2.0
    }

    /// Continuous area, `width * height`.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True when the point lies strictly inside the box. Points on an edge are outside.
    #[inline]
    pub fn contains_point_strict(&self, (x, y): (f32, f32)) -> bool {
        self.x1 < x && x < self.x2 && self.y1 < y && y < self.y2
    }

    /// True when `other`'s center lies strictly inside this box.
    #[inline]
    pub fn contains_center_of(&self, other: &BoundingBox) -> bool {
        self.contains_point_strict(other.center())
    }

    /// Area on the discrete pixel grid, counting both edges (+1 convention).
    #[inline]
    pub fn pixel_area(&self) -> f32 {
        (self.x2 - self.x1 + 1.0) * (self.y2 - self.y1 + 1.0)
    }

    /// Overlap with another box on the discrete pixel grid (+1 convention).
    pub fn overlap_pixel_area(&self, other: &BoundingBox) -> f32 {
        let xa = self.x1.max(other.x1);
        let ya = self.y1.max(other.y1);
        let xb = self.x2.min(other.x2);
        let yb = self.y2.min(other.y2);

        (xb - xa + 1.0).max(0.0) * (yb - ya + 1.0).max(0.0)
    }

    /// Fraction of `other`'s pixel area covered by this box.
    ///
    /// Used with `other` being a thin lane marking, so the ratio answers "how
    /// much of the line does the vehicle cover" rather than a symmetric IoU.
    pub fn intersection_ratio(&self, other: &BoundingBox) -> f32 {
        let inter_area = self.overlap_pixel_area(other);
        if inter_area == 0.0 {
            return 0.0;
        }
        inter_area / other.pixel_area()
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_conversions() {
        let bbox = BoundingBox::from_tlwh(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bbox.to_xyxy(), [10.0, 20.0, 40.0, 60.0]);
        assert_eq!(bbox.width(), 30.0);
        assert_eq!(bbox.height(), 40.0);
        assert_eq!(bbox.center(), (25.0, 40.0));
        assert_eq!(bbox.area(), 1200.0);

        let centered = BoundingBox::from_xywh(25.0, 40.0, 30.0, 40.0);
        assert_eq!(centered, bbox);
    }

    #[test]
    fn test_strict_containment() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        assert!(bbox.contains_point_strict((50.0, 25.0)));

        // Edges and corners are outside
        assert!(!bbox.contains_point_strict((0.0, 25.0)));
        assert!(!bbox.contains_point_strict((100.0, 25.0)));
        assert!(!bbox.contains_point_strict((50.0, 0.0)));
        assert!(!bbox.contains_point_strict((50.0, 50.0)));
        assert!(!bbox.contains_point_strict((0.0, 0.0)));
    }

    #[test]
    fn test_pixel_area_counts_both_edges() {
        let bbox = BoundingBox::new(0.0, 0.0, 9.0, 4.0);
        assert_eq!(bbox.pixel_area(), 50.0);

        // A zero-size box still covers one pixel
        let point = BoundingBox::new(3.0, 3.0, 3.0, 3.0);
        assert_eq!(point.pixel_area(), 1.0);
    }

    #[test]
    fn test_intersection_ratio() {
        let vehicle = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let line = BoundingBox::new(50.0, 0.0, 150.0, 10.0);

        // Overlap 51 x 11, line 101 x 11
        let ratio = vehicle.intersection_ratio(&line);
        assert!((ratio - 51.0 / 101.0).abs() < 1e-6);
    }

    #[test]
    fn test_intersection_ratio_no_overlap() {
        let vehicle = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let line = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(vehicle.intersection_ratio(&line), 0.0);
    }

    #[test]
    fn test_touching_edges_overlap_one_pixel_column() {
        let vehicle = BoundingBox::new(0.0, 0.0, 10.0, 9.0);
        let line = BoundingBox::new(10.0, 0.0, 19.0, 9.0);

        // Shared column x = 10 counts on the pixel grid
        assert_eq!(vehicle.overlap_pixel_area(&line), 10.0);
        assert!((vehicle.intersection_ratio(&line) - 0.1).abs() < 1e-6);
    }
}
