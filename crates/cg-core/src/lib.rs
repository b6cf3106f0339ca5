//! `cg-core` — foundational types for the citygen procedural city generator.
//!
//! This crate is a dependency of every other `cg-*` crate.  It intentionally
//! has no `cg-*` dependencies and minimal external ones (`rand`, `thiserror`,
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `SegmentId`, `BuildingId`, `ElementId`, `RouteId`, `NodeId` |
//! | [`geom`]    | `Point`, segment intersection, angle math, `Direction8`   |
//! | [`bounds`]  | `Bounds` — AABB quadtree key / rotated OBB with SAT tests |
//! | [`segment`] | `Segment`, `SegmentMeta`, `Intersection`                  |
//! | [`entity`]  | `Building(Type)`, `Element(Type)`, `ElementOwner`, `Route` |
//! | [`rng`]     | `GenRng` — the single seeded RNG threaded through a run   |
//! | [`config`]  | `CityConfig` and its nested sections                      |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |

pub mod bounds;
pub mod config;
pub mod entity;
pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod segment;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bounds::Bounds;
pub use config::CityConfig;
pub use entity::{Building, BuildingType, Element, ElementOwner, ElementType, Route};
pub use error::{CoreError, CoreResult};
pub use geom::{Direction8, Point};
pub use ids::{BuildingId, ElementId, NodeId, RouteId, SegmentId};
pub use rng::GenRng;
pub use segment::{Intersection, Segment, SegmentMeta};
