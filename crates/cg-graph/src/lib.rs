//! `cg-graph` — the walkable graph derived from accepted road geometry.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`graph`]   | `WalkGraph`, `Node`, `NodeKind`, `Edge`, samplers, BFS    |
//! | [`builder`] | `GraphBuilder` — sidewalk rings, connection, subdivision  |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                            |

pub mod builder;
pub mod error;
pub mod graph;


pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, Node, NodeKind, WalkGraph};
