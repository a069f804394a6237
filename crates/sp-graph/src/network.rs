//! Street graph representation and builder.
//!
//! # Data layout
//!
//! Each undirected street segment is stored as two directed half-edges, and
//! half-edges are kept in **Compressed Sparse Row (CSR)** order.  Given a
//! `NodeIdx n`, its incident half-edges occupy:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Neighbor iteration is a contiguous memory scan, which keeps Dijkstra's
//! inner loop cache-friendly.  External identifiers ([`NodeKey`]) are mapped
//! to dense [`NodeIdx`] values once, at the boundary.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps an `(x, y)` position to the nearest node.
//! Used to turn a point picked on the map into a graph node.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::{debug, info};

use sp_core::{EdgeId, NodeCategory, NodeIdx, NodeKey, Position};

use crate::{GraphError, GraphResult};

#[cfg(feature = "fx-hash")]
type KeyMap = rustc_hash::FxHashMap<NodeKey, NodeIdx>;
#[cfg(not(feature = "fx-hash"))]
type KeyMap = std::collections::HashMap<NodeKey, NodeIdx>;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[x, y]` point with the
/// associated `NodeIdx`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    idx: NodeIdx,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in coordinate space.  Good enough to rank
    /// candidates within a single city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── StreetGraph ───────────────────────────────────────────────────────────────

/// Undirected weighted street graph in CSR format, plus the node store
/// (key, position, category) and a spatial index for snapping.
///
/// Read-only once built; share it behind `&` or `Arc` across queries.  Do
/// not construct directly; use [`StreetGraphBuilder`].
pub struct StreetGraph {
    // ── Node store (indexed by NodeIdx) ───────────────────────────────────
    pub node_key: Vec<NodeKey>,
    pub node_pos: Vec<Position>,
    pub node_category: Vec<NodeCategory>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Half-edge data (indexed by EdgeId) ────────────────────────────────
    /// Source node of each half-edge.  Needed to walk predecessor edges back
    /// to the source during path reconstruction.
    pub edge_from: Vec<NodeIdx>,
    pub edge_to: Vec<NodeIdx>,
    /// Segment weight (length/distance).  Always finite and `>= 0`.
    pub edge_weight: Vec<f64>,

    key_index: KeyMap,
    spatial_idx: RTree<NodeEntry>,
}

impl StreetGraph {
    /// Construct a graph with no nodes or edges.
    pub fn empty() -> Self {
        StreetGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_key.len()
    }

    /// Number of undirected edges (each is stored as two half-edges).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len() / 2
    }

    pub fn half_edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_key.is_empty()
    }

    // ── Identifier boundary ───────────────────────────────────────────────

    /// Dense index for `key`, if the node exists.
    #[inline]
    pub fn index_of(&self, key: NodeKey) -> Option<NodeIdx> {
        self.key_index.get(&key).copied()
    }

    /// Like [`index_of`](Self::index_of) but fails with
    /// [`GraphError::UnknownNode`].
    #[inline]
    pub fn require(&self, key: NodeKey) -> GraphResult<NodeIdx> {
        self.index_of(key).ok_or(GraphError::UnknownNode(key))
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.key_index.contains_key(&key)
    }

    /// External key of a node.
    ///
    /// # Panics
    /// Panics if `idx` is not a node of this graph.
    #[inline]
    pub fn key_of(&self, idx: NodeIdx) -> NodeKey {
        self.node_key[idx.index()]
    }

    /// All node keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.node_key.iter().copied()
    }

    // ── Geo-node store ────────────────────────────────────────────────────

    pub fn position(&self, key: NodeKey) -> GraphResult<Position> {
        self.require(key).map(|idx| self.node_pos[idx.index()])
    }

    /// Category of a node; `Unknown` when the node was never classified.
    pub fn category(&self, key: NodeKey) -> GraphResult<NodeCategory> {
        self.require(key).map(|idx| self.node_category[idx.index()])
    }

    /// Nodes carrying `category`, in insertion order.
    pub fn nodes_in_category(&self, category: NodeCategory) -> impl Iterator<Item = NodeIdx> + '_ {
        self.node_category
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == category)
            .map(|(i, _)| NodeIdx(i as u32))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the half-edges leaving `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeIdx) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Number of half-edges leaving `node` (parallel edges counted separately).
    #[inline]
    pub fn degree(&self, node: NodeIdx) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// `(neighbor, weight)` pairs of `node`, index-level.
    #[inline]
    pub fn neighbors_idx(&self, node: NodeIdx) -> impl Iterator<Item = (NodeIdx, f64)> + '_ {
        self.out_edges(node)
            .map(|e| (self.edge_to[e.index()], self.edge_weight[e.index()]))
    }

    /// `(neighbor, weight)` pairs of the node with external key `key`.
    pub fn neighbors(&self, key: NodeKey) -> GraphResult<impl Iterator<Item = (NodeKey, f64)> + '_> {
        let idx = self.require(key)?;
        Ok(self
            .neighbors_idx(idx)
            .map(|(n, w)| (self.node_key[n.index()], w)))
    }

    /// Each undirected edge once, as `(lower index, higher index, weight)`,
    /// in CSR order.  Parallel edges are yielded separately.
    pub fn undirected_edges(&self) -> impl Iterator<Item = (NodeIdx, NodeIdx, f64)> + '_ {
        (0..self.edge_from.len())
            .filter(move |&i| self.edge_from[i] < self.edge_to[i])
            .map(move |i| (self.edge_from[i], self.edge_to[i], self.edge_weight[i]))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`.  `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: Position) -> Option<NodeIdx> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.idx)
    }

    /// Up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Position, k: usize) -> Vec<NodeIdx> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.idx)
            .collect()
    }
}

impl std::fmt::Debug for StreetGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreetGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

// ── StreetGraphBuilder ────────────────────────────────────────────────────────

/// Construct a [`StreetGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes must be added before the edges that reference them.  Adding a node
/// whose key already exists overwrites its position and category
/// (last-write-wins) but keeps its original index.
///
/// # Example
///
/// ```
/// use sp_core::{NodeCategory, NodeKey, Position};
/// use sp_graph::StreetGraphBuilder;
///
/// let mut b = StreetGraphBuilder::new();
/// b.add_node(NodeKey(1), Position::new(-77.03, -12.04), NodeCategory::Principal);
/// b.add_node(NodeKey(2), Position::new(-77.02, -12.05), NodeCategory::Unknown);
/// b.add_edge(NodeKey(1), NodeKey(2), 150.0).unwrap();
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 1);
/// ```
pub struct StreetGraphBuilder {
    keys: Vec<NodeKey>,
    positions: Vec<Position>,
    categories: Vec<NodeCategory>,
    key_index: KeyMap,
    raw_edges: Vec<RawEdge>,
    overwritten: usize,
    self_loops: usize,
}

struct RawEdge {
    from: NodeIdx,
    to: NodeIdx,
    weight: f64,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and undirected edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        let mut key_index = KeyMap::default();
        key_index.reserve(nodes);
        Self {
            keys: Vec::with_capacity(nodes),
            positions: Vec::with_capacity(nodes),
            categories: Vec::with_capacity(nodes),
            key_index,
            raw_edges: Vec::with_capacity(edges * 2),
            overwritten: 0,
            self_loops: 0,
        }
    }

    /// Add (or overwrite) a node and return its dense index.
    pub fn add_node(&mut self, key: NodeKey, pos: Position, category: NodeCategory) -> NodeIdx {
        if let Some(&idx) = self.key_index.get(&key) {
            debug!(%key, "duplicate node key, overwriting earlier entry");
            self.positions[idx.index()] = pos;
            self.categories[idx.index()] = category;
            self.overwritten += 1;
            return idx;
        }
        let idx = NodeIdx(self.keys.len() as u32);
        self.keys.push(key);
        self.positions.push(pos);
        self.categories.push(category);
        self.key_index.insert(key, idx);
        idx
    }

    /// Reclassify a node added earlier.
    pub fn set_category(&mut self, key: NodeKey, category: NodeCategory) -> GraphResult<()> {
        let idx = self.index_of(key)?;
        self.categories[idx.index()] = category;
        Ok(())
    }

    /// Add an undirected edge between two existing nodes.
    ///
    /// Fails with [`GraphError::InvalidWeight`] if `weight` is negative or
    /// not finite, and with [`GraphError::UnknownNode`] if either endpoint
    /// has not been added.  Self-loops are accepted and dropped: they can
    /// never shorten a path.
    pub fn add_edge(&mut self, u: NodeKey, v: NodeKey, weight: f64) -> GraphResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight { u, v, weight });
        }
        let from = self.index_of(u)?;
        let to = self.index_of(v)?;
        if from == to {
            debug!(node = %u, "dropping self-loop");
            self.self_loops += 1;
            return Ok(());
        }
        self.raw_edges.push(RawEdge { from, to, weight });
        self.raw_edges.push(RawEdge { from: to, to: from, weight });
        Ok(())
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.key_index.contains_key(&key)
    }

    /// Position of a node added earlier.
    pub fn position(&self, key: NodeKey) -> GraphResult<Position> {
        self.index_of(key).map(|idx| self.positions[idx.index()])
    }

    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    /// Undirected edges accepted so far (self-loops excluded).
    pub fn edge_count(&self) -> usize {
        self.raw_edges.len() / 2
    }

    fn index_of(&self, key: NodeKey) -> GraphResult<NodeIdx> {
        self.key_index
            .get(&key)
            .copied()
            .ok_or(GraphError::UnknownNode(key))
    }

    /// Consume the builder and produce a [`StreetGraph`].
    ///
    /// Half-edges are stably sorted by source node, so each node's neighbors
    /// keep their insertion order.  Time complexity: O(E log E) for the sort
    /// plus O(N log N) for the R-tree bulk load.
    pub fn build(self) -> StreetGraph {
        let node_count = self.keys.len();
        let half_edges = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from: Vec<NodeIdx> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeIdx> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64> = raw.iter().map(|e| e.weight).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, half_edges);

        // Bulk-load for O(N log N) construction.  Non-finite positions
        // would poison the tree, so they are not indexed.
        let entries: Vec<NodeEntry> = self
            .positions
            .iter()
            .enumerate()
            .filter(|(_, pos)| pos.is_finite())
            .map(|(i, pos)| NodeEntry {
                point: [pos.x, pos.y],
                idx: NodeIdx(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        info!(
            nodes = node_count,
            edges = half_edges / 2,
            overwritten = self.overwritten,
            self_loops = self.self_loops,
            "street graph built"
        );

        StreetGraph {
            node_key: self.keys,
            node_pos: self.positions,
            node_category: self.categories,
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            key_index: self.key_index,
            spatial_idx,
        }
    }
}

impl Default for StreetGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
