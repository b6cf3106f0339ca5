//! `cg-city` — the procedural city generator proper.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`generator`] | `CityGenerator` — phase driver, accessors, edit API     |
//! | [`growth`]    | `RoadGrowth` — proposal loop, local constraints, goals  |
//! | [`roads`]     | `RoadManager` — accepted-segment arena + spatial index  |
//! | [`buildings`] | `BuildingManager`, `BuildingGenerator`                  |
//! | [`elements`]  | `ElementManager`, `ElementGenerator`                    |
//! | [`routes`]    | `RouteSampler`, neighbourhood summaries                 |
//! | [`error`]     | `CityError`, `CityResult<T>`                            |
//!
//! The typical collaborator flow:
//!
//! ```rust,ignore
//! let mut city = CityGenerator::new(CityConfig::default())?;
//! city.generate()?;
//! let roads = city.roads();
//! let graph = city.graph().expect("complete");
//! ```

pub mod buildings;
pub mod elements;
pub mod error;
pub mod generator;
pub mod growth;
pub mod roads;
pub mod routes;

#[cfg(test)]
mod tests;

pub use buildings::{BuildingGenerator, BuildingManager};
pub use elements::{ElementGenerator, ElementManager};
pub use error::{CityError, CityResult};
pub use generator::CityGenerator;
pub use growth::{RoadGrowth, StepOutcome};
pub use roads::RoadManager;
pub use routes::{point_around_label, AroundLabel, RouteSampler};
