//! `QueryService` — an owned graph plus the engine that answers queries on it.
//!
//! The graph is built once and injected; the service never mutates it.
//! Cloning a service is cheap (the graph sits behind an `Arc`), so each
//! request handler can hold its own copy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sp_core::{NodeCategory, NodeKey, Position};
use sp_graph::{DijkstraPathFinder, PathFinder, StreetGraph};

use crate::facade::{PathMiss, PathResult, query_path_with};

/// One entry of a node picker: id, display label, and category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeOption {
    pub key: NodeKey,
    pub label: String,
    pub category: NodeCategory,
}

/// One street segment of the full-network layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeSegment {
    pub from: NodeKey,
    pub to: NodeKey,
    pub start: Position,
    pub end: Position,
    pub weight: f64,
}

#[derive(Clone)]
pub struct QueryService<F: PathFinder = DijkstraPathFinder> {
    graph: Arc<StreetGraph>,
    finder: F,
}

impl QueryService<DijkstraPathFinder> {
    pub fn new(graph: impl Into<Arc<StreetGraph>>) -> Self {
        Self::with_finder(graph, DijkstraPathFinder)
    }
}

impl<F: PathFinder> QueryService<F> {
    pub fn with_finder(graph: impl Into<Arc<StreetGraph>>, finder: F) -> Self {
        Self { graph: graph.into(), finder }
    }

    pub fn graph(&self) -> &StreetGraph {
        &self.graph
    }

    pub fn query_path(&self, source: NodeKey, target: NodeKey) -> PathResult {
        query_path_with(&self.finder, &self.graph, source, target)
    }

    /// Snap two map positions to their nearest nodes, then route between them.
    pub fn query_between_points(&self, from: Position, to: Position) -> PathResult {
        match (self.graph.snap_to_node(from), self.graph.snap_to_node(to)) {
            (Some(a), Some(b)) => self.query_path(self.graph.key_of(a), self.graph.key_of(b)),
            _ => PathResult::not_found(PathMiss::EmptyGraph),
        }
    }

    /// Run several queries.  With the `parallel` feature they run on Rayon;
    /// results keep the order of `pairs` either way.
    pub fn query_batch(&self, pairs: &[(NodeKey, NodeKey)]) -> Vec<PathResult> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            pairs.par_iter().map(|&(s, t)| self.query_path(s, t)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            pairs.iter().map(|&(s, t)| self.query_path(s, t)).collect()
        }
    }

    /// Every node as a picker option, sorted by key.
    pub fn node_options(&self) -> Vec<NodeOption> {
        let mut options: Vec<NodeOption> = self
            .graph
            .node_key
            .iter()
            .zip(&self.graph.node_category)
            .map(|(&key, &category)| NodeOption { key, label: key.to_string(), category })
            .collect();
        options.sort_unstable_by_key(|o| o.key);
        options
    }

    /// `(key, position)` of every node in `category`, for a per-category
    /// marker layer.
    pub fn category_layer(&self, category: NodeCategory) -> Vec<(NodeKey, Position)> {
        self.graph
            .nodes_in_category(category)
            .map(|n| (self.graph.key_of(n), self.graph.node_pos[n.index()]))
            .collect()
    }

    /// Every street once, as a segment between its endpoints.  Used to draw
    /// the whole network under the path and marker layers.
    pub fn edge_layer(&self) -> Vec<EdgeSegment> {
        let g = &self.graph;
        g.undirected_edges()
            .map(|(u, v, weight)| EdgeSegment {
                from: g.key_of(u),
                to: g.key_of(v),
                start: g.node_pos[u.index()],
                end: g.node_pos[v.index()],
                weight,
            })
            .collect()
    }
}
