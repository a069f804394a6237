//! `sp-core` — foundational types for the `street_paths` workspace.
//!
//! This crate is a dependency of every other `sp-*` crate.  It has no `sp-*`
//! dependencies and no required external ones (only optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                          |
//! |----------------|---------------------------------------------------|
//! | [`ids`]        | `NodeIdx`, `EdgeId` (dense), `NodeKey` (external) |
//! | [`geo`]        | `Position`, haversine distance                    |
//! | [`category`]   | `NodeCategory` and label parsing                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod category;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use category::NodeCategory;
pub use geo::Position;
pub use ids::{EdgeId, NodeIdx, NodeKey};
