//! Road segments and the intersections collected from them.

use crate::bounds::Bounds;
use crate::error::{CoreError, CoreResult};
use crate::geom::Point;
use crate::ids::SegmentId;

// ── SegmentMeta ───────────────────────────────────────────────────────────────

/// Metadata carried on a road segment.
///
/// `t` is the proposal delay used by the growth queue to order exploration;
/// it has no meaning once the segment is accepted.
#[derive(Copy, Clone, Debug, Default)]
pub struct SegmentMeta {
    pub highway: bool,
    pub t: f64,
}

// ── Segment ───────────────────────────────────────────────────────────────────

/// A straight road segment from `start` to `end`.
///
/// Equality is geometric (endpoint equality through the quantised point key);
/// metadata does not participate.
#[derive(Copy, Clone, Debug)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub meta: SegmentMeta,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end, meta: SegmentMeta::default() }
    }

    pub fn with_meta(start: Point, end: Point, meta: SegmentMeta) -> Self {
        Self { start, end, meta }
    }

    /// Orientation of `end - start` in degrees, in `[0, 360)`.
    #[inline]
    pub fn angle(&self) -> f64 {
        (self.end - self.start).angle_deg()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end.
    #[inline]
    pub fn direction(&self) -> Point {
        (self.end - self.start).normalize()
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        self.start.lerp(self.end, 0.5)
    }

    /// Point at parameter `t` along the segment (`0` = start, `1` = end).
    #[inline]
    pub fn point_at(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }

    /// The road's physical footprint: an OBB centred on the segment with the
    /// given carriageway width.
    pub fn road_rect(&self, road_width: f64) -> Bounds {
        Bounds::from_center(self.midpoint(), self.length(), road_width, self.angle())
    }

    /// Axis-aligned bounding box of the two endpoints, inflated by `buffer`
    /// on all sides.  This is the shape the road manager indexes under.
    pub fn aabb(&self, buffer: f64) -> Bounds {
        let min_x = self.start.x.min(self.end.x) - buffer;
        let min_y = self.start.y.min(self.end.y) - buffer;
        let width = (self.end.x - self.start.x).abs() + 2.0 * buffer;
        let height = (self.end.y - self.start.y).abs() + 2.0 * buffer;
        Bounds::new(min_x, min_y, width, height)
    }

    /// Fail fast on non-finite coordinates or a zero-length span.
    pub fn validate(&self) -> CoreResult<()> {
        for (axis, value) in [
            ("start.x", self.start.x),
            ("start.y", self.start.y),
            ("end.x", self.end.x),
            ("end.y", self.end.y),
        ] {
            if !value.is_finite() {
                return Err(CoreError::NonFinite { axis, value });
            }
        }
        if self.start == self.end {
            return Err(CoreError::ZeroLengthSegment { x: self.start.x, y: self.start.y });
        }
        Ok(())
    }

    /// Whether `point` coincides with either endpoint (quantised equality).
    #[inline]
    pub fn has_endpoint(&self, point: Point) -> bool {
        self.start == point || self.end == point
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Segment {}

// ── Intersection ──────────────────────────────────────────────────────────────

/// A point where two or more accepted segments meet, with its incidence list.
#[derive(Clone, Debug)]
pub struct Intersection {
    pub point: Point,
    /// Ids of every segment with an endpoint at `point`, ascending.
    pub segments: Vec<SegmentId>,
    /// `true` when three or more distinct orientations meet here, or the
    /// point was produced by splitting a crossed segment.
    pub crossing: bool,
}

impl Intersection {
    /// Number of incident segments.
    #[inline]
    pub fn degree(&self) -> usize {
        self.segments.len()
    }
}
