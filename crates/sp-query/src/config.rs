//! Column-name configuration for the CSV loaders.
//!
//! Source tables disagree on naming: one variant has `node1, node2,
//! distance` edge columns, another `u, v, length`.  Neither is hardcoded;
//! pick a preset or load a `LoaderConfig` from JSON.
//!
//! ```json
//! { "edge_source_column": "u", "edge_target_column": "v", "weight_column": "length" }
//! ```
//!
//! Fields left out of the JSON take their [`Default`] values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{QueryError, QueryResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub node_id_column: String,
    pub x_column: String,
    pub y_column: String,
    /// Optional inline classification column on the node table, also the
    /// label column of a separate classification table.
    pub category_column: String,
    pub edge_source_column: String,
    pub edge_target_column: String,
    pub weight_column: String,
}

impl LoaderConfig {
    /// `node1, node2, distance` edge columns.
    pub fn distance() -> Self {
        Self {
            node_id_column: "node_id".into(),
            x_column: "x".into(),
            y_column: "y".into(),
            category_column: "type".into(),
            edge_source_column: "node1".into(),
            edge_target_column: "node2".into(),
            weight_column: "distance".into(),
        }
    }

    /// `u, v, length` edge columns, as exported from an OSM street network.
    pub fn length() -> Self {
        Self {
            edge_source_column: "u".into(),
            edge_target_column: "v".into(),
            weight_column: "length".into(),
            ..Self::distance()
        }
    }

    pub fn with_weight_column(mut self, name: impl Into<String>) -> Self {
        self.weight_column = name.into();
        self
    }

    pub fn with_edge_columns(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_source_column = source.into();
        self.edge_target_column = target.into();
        self
    }

    pub fn from_json_str(json: &str) -> QueryResult<Self> {
        let cfg: LoaderConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_path(path: &Path) -> QueryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject empty column names and node columns that collide.
    pub fn validate(&self) -> QueryResult<()> {
        let named = [
            ("node_id_column", &self.node_id_column),
            ("x_column", &self.x_column),
            ("y_column", &self.y_column),
            ("category_column", &self.category_column),
            ("edge_source_column", &self.edge_source_column),
            ("edge_target_column", &self.edge_target_column),
            ("weight_column", &self.weight_column),
        ];
        if let Some((field, _)) = named.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(QueryError::Config(format!("{field} must not be empty")));
        }
        if self.edge_source_column == self.edge_target_column {
            return Err(QueryError::Config(format!(
                "edge endpoint columns must differ, both are {:?}",
                self.edge_source_column
            )));
        }
        if self.x_column == self.y_column {
            return Err(QueryError::Config(format!(
                "x and y columns must differ, both are {:?}",
                self.x_column
            )));
        }
        Ok(())
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::distance()
    }
}
