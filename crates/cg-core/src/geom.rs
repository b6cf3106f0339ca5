//! 2-D point type and the geometric predicates the generator is built on.
//!
//! Coordinates are `f64` world units.  Equality and hashing go through a
//! quantised key (4 decimal places) so points that differ only by
//! floating-point jitter compare structurally — accepted-segment endpoints
//! merged within tolerance map to the same key.
//!
//! All angle-valued functions work in degrees; orientations are normalised
//! to `[0, 360)`.  Comparisons always use explicit tolerances, never `==` on
//! raw coordinates.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

/// Coordinate quantum for structural equality: 1e-4 world units.
const KEY_QUANTUM: f64 = 1e-4;

// ── Point ─────────────────────────────────────────────────────────────────────

/// A 2-D world-space coordinate (doubles as a 2-D vector).
#[derive(Copy, Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Quantised key used for equality and hashing.
    #[inline]
    pub fn key(self) -> (i64, i64) {
        (
            (self.x / KEY_QUANTUM).round() as i64,
            (self.y / KEY_QUANTUM).round() as i64,
        )
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 2-D cross product (z component of the 3-D cross).
    #[inline]
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction; the zero vector maps to itself.
    #[inline]
    pub fn normalize(self) -> Point {
        let len = self.length();
        if len < f64::EPSILON {
            return Point::ZERO;
        }
        Point::new(self.x / len, self.y / len)
    }

    /// Counter-clockwise perpendicular: `(x, y) → (-y, x)`.
    #[inline]
    pub fn perp(self) -> Point {
        Point::new(-self.y, self.x)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Linear interpolation toward `other`; `t = 0` → `self`, `t = 1` → `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    /// Rotate about `center` by `deg` degrees, counter-clockwise.
    pub fn rotate_about(self, center: Point, deg: f64) -> Point {
        let rad = deg.to_radians();
        let (sin, cos) = rad.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }

    /// Orientation of the vector in degrees, normalised to `[0, 360)`.
    #[inline]
    pub fn angle_deg(self) -> f64 {
        normalize_deg(self.y.atan2(self.x).to_degrees())
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

// ── Angle math ────────────────────────────────────────────────────────────────

/// Normalise an angle in degrees to `[0, 360)`.
#[inline]
pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg % 360.0;
    if d < 0.0 { d + 360.0 } else { d }
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
pub fn angle_between(a: Point, b: Point) -> f64 {
    let lengths = a.length() * b.length();
    if lengths < f64::EPSILON {
        return 0.0;
    }
    let cos = (a.dot(b) / lengths).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Smallest difference between two orientations modulo 180° (parallelism test:
/// a road at 10° and one at 190° are parallel).  Result in `[0, 90]`.
pub fn min_degree_difference(a: f64, b: f64) -> f64 {
    let bottom = (a - b).abs() % 180.0;
    bottom.min((bottom - 180.0).abs())
}

/// Smallest difference between two angles modulo 360°.  Result in `[0, 180]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

// ── Segment predicates ────────────────────────────────────────────────────────

/// Proper intersection of segments `a→b` and `p→q`.
///
/// Returns the intersection point and the parameter `e` along `a→b`
/// (`e = 0` at `a`, `e = 1` at `b`).  `buffer` excludes a margin at both
/// ends of both segments so T-junctions that merely touch at endpoints are
/// not reported as crossings.  Parallel and collinear pairs return `None`.
pub fn segment_intersection(
    a: Point,
    b: Point,
    p: Point,
    q: Point,
    buffer: f64,
) -> Option<(Point, f64)> {
    let b_rel = b - a;
    let q_rel = q - p;

    let k = b_rel.cross(q_rel);
    if k.abs() < f64::EPSILON {
        return None;
    }

    let pa = p - a;
    let f = pa.cross(b_rel) / k; // parameter along p→q
    let e = pa.cross(q_rel) / k; // parameter along a→b

    if e > buffer && e < 1.0 - buffer && f > buffer && f < 1.0 - buffer {
        Some((a + b_rel * e, e))
    } else {
        None
    }
}

/// Minimum distance from `point` to the segment `start→end`.
pub fn point_segment_distance(point: Point, start: Point, end: Point) -> f64 {
    let seg = end - start;
    let seg_len_sq = seg.dot(seg);
    if seg_len_sq < f64::EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(seg) / seg_len_sq).clamp(0.0, 1.0);
    point.distance(start + seg * t)
}

/// Normalised projection parameter of `point` onto the infinite line through
/// `start→end` (unclamped; `< 0` or `> 1` means the foot lies outside the
/// segment).
pub fn projection_parameter(point: Point, start: Point, end: Point) -> f64 {
    let seg = end - start;
    let seg_len_sq = seg.dot(seg);
    if seg_len_sq < f64::EPSILON {
        return 0.0;
    }
    (point - start).dot(seg) / seg_len_sq
}

// ── Eight-wind direction classifier ───────────────────────────────────────────

/// Compass direction of a target point relative to a pivot, in 45° sectors
/// centred on the axes (East = 0°).
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction8 {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction8 {
    const ORDER: [Direction8; 8] = [
        Direction8::East,
        Direction8::NorthEast,
        Direction8::North,
        Direction8::NorthWest,
        Direction8::West,
        Direction8::SouthWest,
        Direction8::South,
        Direction8::SouthEast,
    ];

    /// Direction of `target` as seen from `pivot`.  Coincident points
    /// classify as `East` (angle 0).
    pub fn from_points(pivot: Point, target: Point) -> Direction8 {
        let deg = normalize_deg((target - pivot).angle_deg());
        let sector = (((deg + 22.5) / 45.0).floor() as usize) % 8;
        Self::ORDER[sector]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction8::East => "East",
            Direction8::NorthEast => "NorthEast",
            Direction8::North => "North",
            Direction8::NorthWest => "NorthWest",
            Direction8::West => "West",
            Direction8::SouthWest => "SouthWest",
            Direction8::South => "South",
            Direction8::SouthEast => "SouthEast",
        }
    }
}

impl fmt::Display for Direction8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
