//! `sp-query` — the boundary the rendering layer calls.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`config`]  | `LoaderConfig` (column names, JSON loading)                |
//! | [`record`]  | `NodeRecord`, `EdgeRecord`                                 |
//! | [`loader`]  | CSV readers, classification join, `load_graph`             |
//! | [`facade`]  | `build_graph`, `query_path`, `PathResult`                  |
//! | [`service`] | `QueryService` (owned graph + injected `PathFinder`)       |
//! |             | picker options, category and edge layers                   |
//! | [`error`]   | `QueryError`, `QueryResult<T>`                             |
//!
//! Construction errors abort the build.  Query-time misses (unknown node,
//! disconnected pair) never surface as errors: they come back as a
//! `PathResult` with `found == false`.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `QueryService::query_batch` runs on Rayon.              |
//! | `fx-hash`  | Forwards to `sp-graph/fx-hash`.                         |

pub mod config;
pub mod error;
pub mod facade;
pub mod loader;
pub mod record;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::LoaderConfig;
pub use error::{QueryError, QueryResult};
pub use facade::{PathMiss, PathResult, build_graph, query_path, query_path_with};
pub use loader::{
    Classification, ClassificationSummary, GraphSources, apply_classification, load_classification_csv,
    load_classification_reader, load_edges_csv, load_edges_reader, load_graph, load_nodes_csv,
    load_nodes_reader,
};
pub use record::{EdgeRecord, NodeRecord};
pub use service::{EdgeSegment, NodeOption, QueryService};
