//! Pixel-space geometry for map rendering.

use serde::{Deserialize, Serialize};

/// A pixel position on the rendered map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Column (grows to the east)
    pub x: i32,
    /// Row (grows to the south)
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Axis-aligned rectangle `(x1, y1)`–`(x2, y2)` occupied by a label.
///
/// `x1 <= x2` and `y1 <= y2` hold for every box built through the
/// constructors in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LabelBox {
    /// Left edge
    pub x1: i32,
    /// Top edge
    pub y1: i32,
    /// Right edge
    pub x2: i32,
    /// Bottom edge
    pub y2: i32,
}

impl LabelBox {
    /// Creates a box from its edges, normalizing swapped coordinates.
    #[must_use]
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Creates a box centered on `center` extending `half_w`/`half_h` each way.
    #[must_use]
    pub fn around(center: Point, half_w: i32, half_h: i32) -> Self {
        Self::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        )
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Center point (rounded toward the top-left).
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Corners in the order top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub const fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y1),
            Point::new(self.x1, self.y2),
            Point::new(self.x2, self.y2),
        ]
    }

    /// Returns this box shifted by `(dx, dy)`.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Whether the point lies inside the box (edges included).
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// Whether this box overlaps any box in `others`.
    #[must_use]
    pub fn overlaps_any(&self, others: &[LabelBox]) -> bool {
        others.iter().any(|other| boxes_overlap(self, other))
    }
}

/// Returns true if two boxes share interior area.
///
/// Comparisons are strict, so boxes that only touch along an edge or a corner
/// do not overlap, while identical boxes always do.
#[must_use]
pub const fn boxes_overlap(a: &LabelBox, b: &LabelBox) -> bool {
    a.x1 < b.x2 && a.x2 > b.x1 && a.y1 < b.y2 && a.y2 > b.y1
}

/// Converts world `(x, z)` coordinates to map pixels.
///
/// The world origin sits at `map_center`; world north (+z) is up on the image.
/// Fractional results truncate toward zero.
#[must_use]
pub fn transform_coords(x: f64, z: f64, map_center: i32) -> Point {
    let center = f64::from(map_center);
    Point::new((center + x) as i32, (center - z) as i32)
}
