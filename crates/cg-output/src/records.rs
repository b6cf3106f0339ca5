//! On-disk record shapes.
//!
//! Field declaration order below *is* the key order in the emitted JSON —
//! serde preserves it, and consumers diff these files, so treat any
//! reordering as a format change.

use serde::{Deserialize, Serialize};

use cg_core::{Bounds, Point};

// ── Shared fragments ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRec {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for PointRec {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PointRec> for Point {
    fn from(r: PointRec) -> Self {
        Point::new(r.x, r.y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundsRec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl From<Bounds> for BoundsRec {
    fn from(b: Bounds) -> Self {
        Self { x: b.x, y: b.y, width: b.width, height: b.height, rotation: b.rotation }
    }
}

impl From<BoundsRec> for Bounds {
    fn from(r: BoundsRec) -> Self {
        Bounds::with_rotation(r.x, r.y, r.width, r.height, r.rotation)
    }
}

// ── roads.json ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadRec {
    pub start: PointRec,
    pub end: PointRec,
    pub is_highway: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadsDoc {
    pub roads: Vec<RoadRec>,
}

// ── buildings.json ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingRec {
    pub center: PointRec,
    pub rotation: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub bounds: BoundsRec,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingsDoc {
    pub buildings: Vec<BuildingRec>,
}

// ── elements.json ─────────────────────────────────────────────────────────────

/// Export attribution: what the element was placed alongside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnerRec {
    /// `"road"` or `"building"`.
    pub kind: String,
    pub id: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRec {
    pub center: PointRec,
    pub rotation: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub bounds: BoundsRec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerRec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementsDoc {
    pub elements: Vec<ElementRec>,
}

// ── routes.json ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRec {
    pub start: PointRec,
    pub end: PointRec,
    pub points: Vec<PointRec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutesDoc {
    pub routes: Vec<RouteRec>,
}
