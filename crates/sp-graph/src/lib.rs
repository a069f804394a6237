//! `sp-graph` — street graph, spatial snapping, and shortest paths.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `StreetGraph` (CSR + R-tree + key map), `StreetGraphBuilder` |
//! | [`router`]  | `PathFinder` trait, `Path`, `DijkstraPathFinder`            |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |
//! | `fx-hash` | Uses `FxHashMap` for the `NodeKey` → `NodeIdx` map.        |

pub mod error;
pub mod network;
pub mod router;

mod heap;


pub use error::{GraphError, GraphResult};
pub use network::{StreetGraph, StreetGraphBuilder};
pub use router::{DijkstraPathFinder, Path, PathFinder, distances_from};
