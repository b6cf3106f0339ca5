//! `cg-output` — serialisation of generated city data.
//!
//! Five JSON documents are produced, all UTF-8 with 2-space indentation and
//! struct-declaration key order:
//!
//! | File                | Contents                                         |
//! |---------------------|--------------------------------------------------|
//! | `roads.json`        | Segments with the highway flag                   |
//! | `buildings.json`    | Centre, OBB, rotation, type                      |
//! | `elements.json`     | Centre, OBB, rotation, type, owner attribution   |
//! | `routes.json`       | Ordered route points                             |
//! | `progen_world.json` | Flat engine-node list with stable `GEN_*` ids    |
//!
//! [`CityReader`] loads the first four back into core types,
//! order-preserving, for round-trip verification and external tooling.

pub mod error;
pub mod exporter;
pub mod reader;
pub mod records;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::{OutputError, OutputResult};
pub use exporter::CityExporter;
pub use reader::CityReader;
