//! `cg-spatial` — spatial data structures backing every placement decision.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`quadtree`] | `QuadTree<T>` — recursive four-way partition over AABBs  |
//! | [`queue`]    | `ProposalQueue` — stable min-by-`t` road proposal queue  |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                       |

pub mod error;
pub mod quadtree;
pub mod queue;


pub use error::{SpatialError, SpatialResult};
pub use quadtree::QuadTree;
pub use queue::ProposalQueue;
