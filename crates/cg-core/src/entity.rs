//! Buildings, street elements, and sampled routes.
//!
//! All three are created during generation and immutable afterwards; managers
//! in `cg-city` own the canonical collections and hand out ids.

use crate::bounds::Bounds;
use crate::geom::Point;
use crate::ids::{BuildingId, ElementId, RouteId, SegmentId};

// ── Buildings ─────────────────────────────────────────────────────────────────

/// A category of building the placement pass can draw from.
///
/// `is_required` categories are biased toward coverage: the picker prefers a
/// required type that has not been placed yet over any optional type.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingType {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub is_required: bool,
}

/// A placed building.
///
/// Invariants: `bounds.rotation == rotation`, `center == bounds.center()`,
/// and the OBB inflated by the configured buffers is disjoint from every
/// other building and every road rectangle.
#[derive(Clone, Debug)]
pub struct Building {
    pub id: BuildingId,
    pub kind: BuildingType,
    pub bounds: Bounds,
    pub rotation: f64,
    pub center: Point,
}

impl Building {
    pub fn new(id: BuildingId, kind: BuildingType, bounds: Bounds) -> Self {
        Self {
            id,
            rotation: bounds.rotation,
            center: bounds.center(),
            kind,
            bounds,
        }
    }
}

// ── Elements ──────────────────────────────────────────────────────────────────

/// A category of small point-item (lamp, sign, bench, tree).
#[derive(Clone, Debug, PartialEq)]
pub struct ElementType {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

/// What an element was placed alongside — carried only for export attribution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementOwner {
    Road(SegmentId),
    Building(BuildingId),
}

/// A placed street element.
#[derive(Clone, Debug)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementType,
    pub bounds: Bounds,
    pub rotation: f64,
    pub center: Point,
    pub owner: ElementOwner,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementType, bounds: Bounds, owner: ElementOwner) -> Self {
        Self {
            id,
            rotation: bounds.rotation,
            center: bounds.center(),
            kind,
            bounds,
            owner,
        }
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

/// A sampled pedestrian route: a short ordered sequence of points with its
/// first and last point remembered for quick lookup.
#[derive(Clone, Debug)]
pub struct Route {
    pub id: RouteId,
    pub points: Vec<Point>,
    pub start: Point,
    pub end: Point,
}

impl Route {
    /// Build from a point sequence.  Callers pass at least one point; an
    /// empty sequence degrades to a route pinned at the origin.
    pub fn new(id: RouteId, points: Vec<Point>) -> Self {
        debug_assert!(!points.is_empty(), "route must have at least one point");
        let start = points.first().copied().unwrap_or(Point::ZERO);
        let end = points.last().copied().unwrap_or(start);
        Self { id, points, start, end }
    }
}
