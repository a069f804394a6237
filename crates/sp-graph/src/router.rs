//! Shortest-path trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The query layer calls routing through the [`PathFinder`] trait, so an
//! application can swap in A* or contraction hierarchies without touching
//! the façade.  [`DijkstraPathFinder`] is the default.
//!
//! # Scratch space
//!
//! Every call allocates its own distance, predecessor, and heap arrays
//! (O(V) each).  Nothing is cached between calls, so one `&StreetGraph` can
//! serve concurrent queries from several threads.

use sp_core::{EdgeId, NodeIdx, NodeKey, Position};
use tracing::trace;

use crate::heap::IndexedMinHeap;
use crate::network::StreetGraph;
use crate::{GraphError, GraphResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a shortest-path query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Nodes from source to target, both inclusive.
    pub nodes: Vec<NodeIdx>,
    /// Half-edges traversed in order; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Sum of traversed edge weights.
    pub total_weight: f64,
}

impl Path {
    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// External keys of the path nodes, in order.
    pub fn keys(&self, graph: &StreetGraph) -> Vec<NodeKey> {
        self.nodes.iter().map(|&n| graph.key_of(n)).collect()
    }

    /// Coordinates of the path nodes, in order.
    pub fn positions(&self, graph: &StreetGraph) -> Vec<Position> {
        self.nodes.iter().map(|&n| graph.node_pos[n.index()]).collect()
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync`: a single finder is shared by every
/// query against a graph.
pub trait PathFinder: Send + Sync {
    /// Minimum-weight path between two dense indices.
    ///
    /// Fails with [`GraphError::InvalidIndex`] for an index outside the
    /// graph and [`GraphError::NoPath`] for disconnected nodes.
    fn route(&self, graph: &StreetGraph, from: NodeIdx, to: NodeIdx) -> GraphResult<Path>;

    /// Minimum-weight path between two external keys.
    ///
    /// Unknown keys fail with [`GraphError::UnknownNode`] before any search
    /// work is done.
    fn shortest_path(&self, graph: &StreetGraph, source: NodeKey, target: NodeKey) -> GraphResult<Path> {
        let from = graph.require(source)?;
        let to = graph.require(target)?;
        self.route(graph, from, to)
    }
}

// ── DijkstraPathFinder ────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR street graph using `edge_weight` as
/// cost.  Requires non-negative weights, which the builder guarantees.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPathFinder;

impl PathFinder for DijkstraPathFinder {
    fn route(&self, graph: &StreetGraph, from: NodeIdx, to: NodeIdx) -> GraphResult<Path> {
        check_index(graph, from)?;
        check_index(graph, to)?;
        dijkstra(graph, from, to)
    }
}

/// Single-source distances from `from` to every node, indexed by `NodeIdx`.
/// `None` marks an unreachable node; a reachable one whose distance
/// overflows `f64` reports `Some(inf)`.
pub fn distances_from(graph: &StreetGraph, from: NodeIdx) -> GraphResult<Vec<Option<f64>>> {
    check_index(graph, from)?;
    let mut dist: Vec<Option<f64>> = vec![None; graph.node_count()];
    let mut heap = IndexedMinHeap::new(graph.node_count());
    dist[from.index()] = Some(0.0);
    heap.push_or_decrease(from, 0.0);

    while let Some((cost, node)) = heap.pop() {
        for (neighbor, weight) in graph.neighbors_idx(node) {
            let new_cost = cost + weight;
            if improves(dist[neighbor.index()], new_cost) {
                dist[neighbor.index()] = Some(new_cost);
                heap.push_or_decrease(neighbor, new_cost);
            }
        }
    }
    Ok(dist)
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Reachability is tracked apart from the distance value: a sum of large
/// finite weights may overflow to `inf` and must still count as reached.
#[inline]
fn improves(best: Option<f64>, candidate: f64) -> bool {
    best.is_none_or(|b| candidate < b)
}

fn check_index(graph: &StreetGraph, idx: NodeIdx) -> GraphResult<()> {
    if idx.index() < graph.node_count() {
        Ok(())
    } else {
        Err(GraphError::InvalidIndex(idx))
    }
}

fn dijkstra(graph: &StreetGraph, from: NodeIdx, to: NodeIdx) -> GraphResult<Path> {
    if from == to {
        return Ok(Path { nodes: vec![from], edges: vec![], total_weight: 0.0 });
    }

    let n = graph.node_count();
    let mut dist: Vec<Option<f64>> = vec![None; n];
    // prev_edge[v] = half-edge that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut heap = IndexedMinHeap::new(n);

    dist[from.index()] = Some(0.0);
    heap.push_or_decrease(from, 0.0);
    let mut settled = 0usize;

    while let Some((cost, node)) = heap.pop() {
        settled += 1;
        if node == to {
            trace!(settled, "target settled");
            return Ok(reconstruct(graph, &prev_edge, from, to, cost));
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + graph.edge_weight[edge.index()];

            if improves(dist[neighbor.index()], new_cost) {
                dist[neighbor.index()] = Some(new_cost);
                prev_edge[neighbor.index()] = edge;
                heap.push_or_decrease(neighbor, new_cost);
            }
        }
    }

    trace!(settled, "search space exhausted");
    Err(GraphError::NoPath { from: graph.key_of(from), to: graph.key_of(to) })
}

fn reconstruct(
    graph: &StreetGraph,
    prev_edge: &[EdgeId],
    from: NodeIdx,
    to: NodeIdx,
    total_weight: f64,
) -> Path {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));

    Path { nodes, edges, total_weight }
}
