//! Graph construction from records and path queries as plain values.
//!
//! [`build_graph`] validates every record before anything is inserted, so a
//! failed build never yields a partial graph.  [`query_path`] turns engine
//! errors into a [`PathResult`] with `found == false`; the caller never has
//! to match on graph-internal error types.

use serde::{Deserialize, Serialize};
use tracing::debug;

use sp_core::{NodeCategory, NodeKey, Position};
use sp_graph::{DijkstraPathFinder, GraphError, PathFinder, StreetGraph, StreetGraphBuilder};

use crate::record::{EdgeRecord, NodeRecord};
use crate::{QueryError, QueryResult};

// ── PathResult ────────────────────────────────────────────────────────────────

/// Why a query produced no path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathMiss {
    UnknownNode { node: NodeKey },
    NoPath,
    EmptyGraph,
}

/// Result of a path query, shaped for a plotting layer: an ordered polyline
/// of node ids and coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub nodes: Vec<NodeKey>,
    pub positions: Vec<Position>,
    pub total_weight: f64,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miss: Option<PathMiss>,
}

impl PathResult {
    pub fn not_found(miss: PathMiss) -> Self {
        Self {
            nodes: Vec::new(),
            positions: Vec::new(),
            total_weight: 0.0,
            found: false,
            miss: Some(miss),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Split coordinates into `(xs, ys)` for a line trace.
    pub fn polyline(&self) -> (Vec<f64>, Vec<f64>) {
        self.positions.iter().map(|p| (p.x, p.y)).unzip()
    }

    /// Great-circle length of the polyline in metres.  Independent of the
    /// edge weights, which may be in any unit.
    pub fn geometric_length_m(&self) -> f64 {
        self.positions
            .windows(2)
            .map(|pair| pair[0].distance_m(pair[1]))
            .sum()
    }

    /// Middle vertex of the polyline, a natural map center for the path.
    pub fn midpoint(&self) -> Option<Position> {
        self.positions.get(self.positions.len() / 2).copied()
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

/// Validate records and build a graph.
///
/// Fails with `MalformedInput` when a node lacks id/x/y (or has a
/// non-finite coordinate) or an edge lacks an endpoint or weight; fails with
/// `Graph(InvalidWeight)` on a negative weight and `Graph(UnknownNode)` when
/// an edge references a node not in `nodes`.  Duplicate node ids overwrite
/// earlier records.
pub fn build_graph(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> QueryResult<StreetGraph> {
    let mut builder = StreetGraphBuilder::with_capacity(nodes.len(), edges.len());

    let checked_nodes = nodes
        .iter()
        .enumerate()
        .map(|(i, r)| check_node(i, r))
        .collect::<QueryResult<Vec<_>>>()?;
    let checked_edges = edges
        .iter()
        .enumerate()
        .map(|(i, r)| check_edge(i, r))
        .collect::<QueryResult<Vec<_>>>()?;

    for (key, pos, category) in checked_nodes {
        builder.add_node(key, pos, category);
    }
    for (u, v, weight) in checked_edges {
        builder.add_edge(u, v, weight)?;
    }
    Ok(builder.build())
}

fn check_node(i: usize, r: &NodeRecord) -> QueryResult<(NodeKey, Position, NodeCategory)> {
    let at = || format!("node record {i}");
    let id = r.node_id.ok_or_else(|| QueryError::malformed(at(), "node_id", "is missing"))?;
    let x = r.x.ok_or_else(|| QueryError::malformed(at(), "x", "is missing"))?;
    let y = r.y.ok_or_else(|| QueryError::malformed(at(), "y", "is missing"))?;
    let pos = Position::new(x, y);
    if !pos.is_finite() {
        return Err(QueryError::malformed(at(), "x/y", format!("must be finite, got {pos}")));
    }
    Ok((NodeKey(id), pos, NodeCategory::from_label(r.category.as_deref())))
}

fn check_edge(i: usize, r: &EdgeRecord) -> QueryResult<(NodeKey, NodeKey, f64)> {
    let at = || format!("edge record {i}");
    let u = r.u.ok_or_else(|| QueryError::malformed(at(), "u", "is missing"))?;
    let v = r.v.ok_or_else(|| QueryError::malformed(at(), "v", "is missing"))?;
    let w = r.weight.ok_or_else(|| QueryError::malformed(at(), "weight", "is missing"))?;
    Ok((NodeKey(u), NodeKey(v), w))
}

// ── Queries ───────────────────────────────────────────────────────────────────

/// Shortest path with the default Dijkstra engine.
pub fn query_path(graph: &StreetGraph, source: NodeKey, target: NodeKey) -> PathResult {
    query_path_with(&DijkstraPathFinder, graph, source, target)
}

/// Shortest path with any [`PathFinder`].
pub fn query_path_with<F: PathFinder + ?Sized>(
    finder: &F,
    graph: &StreetGraph,
    source: NodeKey,
    target: NodeKey,
) -> PathResult {
    match finder.shortest_path(graph, source, target) {
        Ok(path) => {
            debug!(%source, %target, hops = path.edges.len(), weight = path.total_weight, "path found");
            PathResult {
                nodes: path.keys(graph),
                positions: path.positions(graph),
                total_weight: path.total_weight,
                found: true,
                miss: None,
            }
        }
        Err(err) => {
            debug!(%source, %target, error = %err, "no path");
            PathResult::not_found(miss_for(err))
        }
    }
}

fn miss_for(err: GraphError) -> PathMiss {
    match err {
        GraphError::UnknownNode(node) => PathMiss::UnknownNode { node },
        GraphError::NoPath { .. } => PathMiss::NoPath,
        // Only a custom finder can report these at query time.
        GraphError::InvalidIndex(_) | GraphError::InvalidWeight { .. } => PathMiss::NoPath,
    }
}
