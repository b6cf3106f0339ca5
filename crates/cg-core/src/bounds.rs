//! `Bounds` — the rectangle type shared by the quadtree and every placement
//! test.
//!
//! A `Bounds` is an axis-aligned rectangle `{x, y, width, height}` with an
//! optional `rotation` in degrees about its centre.  The quadtree keys on the
//! axis-aligned footprint only; when `rotation != 0` the value doubles as an
//! oriented bounding box (OBB) and precise overlap goes through the
//! separating-axis test in [`Bounds::overlaps`].  Spatial-index insertions
//! must use [`Bounds::index_envelope`] so a rotated OBB's index key remains a
//! correct superset of its footprint.

use crate::geom::Point;

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Min-corner x (before rotation).
    pub x: f64,
    /// Min-corner y (before rotation).
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, counter-clockwise about the centre.
    #[serde(default)]
    pub rotation: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotation: 0.0 }
    }

    pub fn with_rotation(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self { x, y, width, height, rotation }
    }

    /// Build from a centre point, extent, and rotation.
    pub fn from_center(center: Point, width: f64, height: f64, rotation: f64) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
            rotation,
        }
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow all four sides by `buffer`, keeping centre and rotation.
    pub fn inflate(&self, buffer: f64) -> Bounds {
        Bounds {
            x: self.x - buffer,
            y: self.y - buffer,
            width: self.width + 2.0 * buffer,
            height: self.height + 2.0 * buffer,
            rotation: self.rotation,
        }
    }

    /// Axis-aligned envelope that is guaranteed to contain the rectangle at
    /// any rotation: the square circumscribing the rectangle's diagonal
    /// (every rotated corner lies within half a diagonal of the centre).
    /// This is the key shape the quadtree must index rotated OBBs under —
    /// the index stays a correct superset and precise overlap remains the
    /// caller's job.
    pub fn index_envelope(&self) -> Bounds {
        if self.rotation.abs() < f64::EPSILON {
            return Bounds::new(self.x, self.y, self.width, self.height);
        }
        let side = self.width.hypot(self.height);
        let c = self.center();
        Bounds::new(c.x - side / 2.0, c.y - side / 2.0, side, side)
    }

    /// The four corners after rotation about the centre, counter-clockwise
    /// starting at the min corner.
    pub fn corners(&self) -> [Point; 4] {
        let c = self.center();
        let raw = [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ];
        if self.rotation.abs() < f64::EPSILON {
            return raw;
        }
        raw.map(|p| p.rotate_about(c, self.rotation))
    }

    /// Pure axis-aligned overlap on the unrotated footprints.  This is the
    /// quadtree's candidate test; callers needing exactness use
    /// [`Bounds::overlaps`].
    #[inline]
    pub fn intersects_aabb(&self, other: &Bounds) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Precise oriented-rectangle overlap via the separating-axis test.
    /// Touching edges (zero-area contact) do not count as overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let a = self.corners();
        let b = other.corners();

        // Two unique edge normals per rectangle.
        let axes = [
            (a[1] - a[0]).perp().normalize(),
            (a[3] - a[0]).perp().normalize(),
            (b[1] - b[0]).perp().normalize(),
            (b[3] - b[0]).perp().normalize(),
        ];

        for axis in axes {
            if axis.length() < f64::EPSILON {
                continue; // degenerate rectangle edge
            }
            let (min_a, max_a) = project(&a, axis);
            let (min_b, max_b) = project(&b, axis);
            if max_a <= min_b || max_b <= min_a {
                return false; // separating axis found
            }
        }
        true
    }

    /// Whether `point` lies inside the (possibly rotated) rectangle.
    pub fn contains_point(&self, point: Point) -> bool {
        // Undo the rotation and test against the axis-aligned footprint.
        let local = if self.rotation.abs() < f64::EPSILON {
            point
        } else {
            point.rotate_about(self.center(), -self.rotation)
        };
        local.x >= self.x
            && local.x <= self.x + self.width
            && local.y >= self.y
            && local.y <= self.y + self.height
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.rotation.is_finite()
    }
}

fn project(corners: &[Point; 4], axis: Point) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &c in corners {
        let d = c.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}
