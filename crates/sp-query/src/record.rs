//! Raw input rows, before validation.
//!
//! Every field is optional so that a missing value can be reported as
//! `MalformedInput` by [`crate::build_graph`] rather than failing in the
//! reader.  The CSV loaders produce these; callers with other sources can
//! construct them directly.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node_id: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Classification label (`principal`, `secundario`, …).  `None` → unknown.
    pub category: Option<String>,
}

impl NodeRecord {
    pub fn new(node_id: i64, x: f64, y: f64) -> Self {
        Self { node_id: Some(node_id), x: Some(x), y: Some(y), category: None }
    }

    pub fn with_category(mut self, label: impl Into<String>) -> Self {
        self.category = Some(label.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: Option<i64>,
    pub v: Option<i64>,
    pub weight: Option<f64>,
}

impl EdgeRecord {
    pub fn new(u: i64, v: i64, weight: f64) -> Self {
        Self { u: Some(u), v: Some(v), weight: Some(weight) }
    }
}
