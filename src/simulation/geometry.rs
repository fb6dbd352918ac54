//! Footprint geometry for collision testing
//!
//! Every physical object in the scene is approximated by an oriented
//! rectangle. The overlap test is a separating-axis test over the edge
//! normals of both rectangles; the distance measure is the Euclidean
//! distance between centers. Both are pure predicates with no failure
//! modes.

/// Oriented rectangular footprint.
///
/// `xdim` is the extent along the heading axis, `ydim` the extent across
/// it. `angle` is in radians, counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub xdim: f64,
    pub ydim: f64,
}

impl Footprint {
    pub fn new(x: f64, y: f64, angle: f64, xdim: f64, ydim: f64) -> Self {
        Self {
            x,
            y,
            angle,
            xdim,
            ydim,
        }
    }

    /// The four corner points, counter-clockwise.
    fn corners(&self) -> [(f64, f64); 4] {
        let (sin, cos) = self.angle.sin_cos();
        let hx = self.xdim / 2.0;
        let hy = self.ydim / 2.0;
        let along = (cos * hx, sin * hx);
        let across = (-sin * hy, cos * hy);
        [
            (self.x + along.0 + across.0, self.y + along.1 + across.1),
            (self.x - along.0 + across.0, self.y - along.1 + across.1),
            (self.x - along.0 - across.0, self.y - along.1 - across.1),
            (self.x + along.0 - across.0, self.y + along.1 - across.1),
        ]
    }

    /// Edge normals (two unique axes per rectangle).
    fn axes(&self) -> [(f64, f64); 2] {
        let (sin, cos) = self.angle.sin_cos();
        [(cos, sin), (-sin, cos)]
    }

    /// Separating-axis overlap test against another oriented rectangle.
    /// Touching edges count as overlapping.
    pub fn collides(&self, other: &Footprint) -> bool {
        let corners_a = self.corners();
        let corners_b = other.corners();

        for axis in self.axes().iter().chain(other.axes().iter()) {
            let (min_a, max_a) = project(&corners_a, *axis);
            let (min_b, max_b) = project(&corners_b, *axis);
            if max_a < min_b || max_b < min_a {
                return false;
            }
        }
        true
    }

    /// Euclidean distance between footprint centers. Always >= 0.
    pub fn dist_to(&self, other: &Footprint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Project a corner set onto an axis, returning the (min, max) interval.
fn project(corners: &[(f64, f64); 4], axis: (f64, f64)) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (cx, cy) in corners {
        let dot = cx * axis.0 + cy * axis.1;
        min = min.min(dot);
        max = max.max(dot);
    }
    (min, max)
}
