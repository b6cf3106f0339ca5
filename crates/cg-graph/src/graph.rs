//! The walkable node/edge graph consumed by traffic and agent layers.
//!
//! # Data layout
//!
//! Nodes live in a dense `Vec` indexed by `NodeId`; adjacency is a parallel
//! `Vec<Vec<NodeId>>`.  Edges are undirected, weighted by Euclidean
//! distance, stored once under the canonical `(low id, high id)` key.  An
//! R-tree (via `rstar`) over node positions serves nearest-node snapping.
//!
//! The graph is assembled by [`GraphBuilder`](crate::GraphBuilder) and
//! frozen for generation purposes, but stays open for downstream layers:
//! delivery-style agents insert their own `Supply` nodes after the fact —
//! the core recognises the kind without ever producing it.

use std::collections::VecDeque;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashSet;

use cg_core::{GenRng, NodeId, Point};

use crate::{GraphError, GraphResult};

/// Bounded random draws before the samplers fall back to a linear scan.
const SAMPLE_ATTEMPTS: usize = 200;

// ── Node / Edge ───────────────────────────────────────────────────────────────

/// Walk-node classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Ordinary walkable position — the samplers' preferred pool.
    Normal,
    /// Sidewalk-ring corner or merged junction corner.
    Intersection,
    /// Tagged by downstream delivery agents; never produced here.
    Supply,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub position: Point,
    pub kind: NodeKind,
}

/// Undirected weighted edge; `a < b` by construction.
#[derive(Copy, Clone, Debug)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    /// Euclidean distance between the endpoints.
    pub weight: f64,
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── WalkGraph ─────────────────────────────────────────────────────────────────

/// Undirected walkable graph with spatial snapping and seeded samplers.
#[derive(Default)]
pub struct WalkGraph {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<NodeId>>,
    edges: Vec<Edge>,
    edge_set: FxHashSet<(u32, u32)>,
    spatial: RTree<NodeEntry>,
}

impl WalkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append a node and index it spatially.
    pub fn add_node(&mut self, position: Point, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { id, position, kind });
        self.adjacency.push(Vec::new());
        self.spatial.insert(NodeEntry { point: [position.x, position.y], id });
        id
    }

    /// Connect two nodes.  Self-loops and duplicate edges are ignored;
    /// returns whether a new edge was created.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || a.index() >= self.nodes.len() || b.index() >= self.nodes.len() {
            return false;
        }
        let key = canonical(a, b);
        if !self.edge_set.insert(key) {
            return false;
        }
        let weight = self.nodes[a.index()]
            .position
            .distance(self.nodes[b.index()].position);
        self.edges.push(Edge { a: NodeId(key.0), b: NodeId(key.1), weight });
        self.adjacency[a.index()].push(b);
        self.adjacency[b.index()].push(a);
        true
    }

    /// Remove the edge between two nodes, if present.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let key = canonical(a, b);
        if !self.edge_set.remove(&key) {
            return false;
        }
        self.edges.retain(|e| canonical(e.a, e.b) != key);
        self.adjacency[a.index()].retain(|&n| n != b);
        self.adjacency[b.index()].retain(|&n| n != a);
        true
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_set.contains(&canonical(a, b))
    }

    /// Neighbour ids of `node` (empty for unknown ids).
    pub fn adjacent(&self, node: NodeId) -> &[NodeId] {
        self.adjacency
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Neighbour positions of `node`.
    pub fn adjacent_points(&self, node: NodeId) -> Vec<Point> {
        self.adjacent(node)
            .iter()
            .filter_map(|&n| self.node(n))
            .map(|n| n.position)
            .collect()
    }

    /// Positions of every `Supply` node (downstream-inserted).
    pub fn supply_points(&self) -> Vec<Point> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Supply)
            .map(|n| n.position)
            .collect()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `position`, or `None` on an empty graph.
    pub fn closest_node(&self, position: Point) -> Option<NodeId> {
        self.spatial
            .nearest_neighbor(&[position.x, position.y])
            .map(|e| e.id)
    }

    /// Node ids within `radius` of `position`, ascending by id.
    pub fn nodes_within(&self, position: Point, radius: f64) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .spatial
            .locate_within_distance([position.x, position.y], radius * radius)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Minimum number of edges between two nodes (BFS).
    pub fn edge_hop_distance(&self, from: NodeId, to: NodeId) -> GraphResult<usize> {
        if self.node(from).is_none() {
            return Err(GraphError::NodeNotFound(from));
        }
        if self.node(to).is_none() {
            return Err(GraphError::NodeNotFound(to));
        }
        if from == to {
            return Ok(0);
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        visited[from.index()] = true;
        queue.push_back((from, 0usize));

        while let Some((node, hops)) = queue.pop_front() {
            for &next in self.adjacent(node) {
                if next == to {
                    return Ok(hops + 1);
                }
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back((next, hops + 1));
                }
            }
        }
        Err(GraphError::NoPath { from, to })
    }

    /// Hop distance from `from` to every reachable node (`usize::MAX` for
    /// unreachable ones).
    fn hop_distances(&self, from: NodeId) -> Vec<usize> {
        let mut dist = vec![usize::MAX; self.nodes.len()];
        let mut queue = VecDeque::new();
        if from.index() < self.nodes.len() {
            dist[from.index()] = 0;
            queue.push_back(from);
        }
        while let Some(node) = queue.pop_front() {
            let d = dist[node.index()];
            for &next in self.adjacent(node) {
                if dist[next.index()] == usize::MAX {
                    dist[next.index()] = d + 1;
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    // ── Random samplers ───────────────────────────────────────────────────

    /// A uniformly random walkable node, preferring `Normal` nodes and
    /// falling back to the whole graph when none exist (coarse graphs have
    /// only ring corners).
    pub fn random_node(&self, exclude: &[NodeId], rng: &mut GenRng) -> Option<NodeId> {
        let pool = self.sample_pool(exclude);
        rng.choose(&pool).copied()
    }

    /// A random walkable node whose Euclidean distance from a random base
    /// node falls in `[min_distance, max_distance]`.
    pub fn random_node_with_distance(
        &self,
        base: &[NodeId],
        exclude: &[NodeId],
        min_distance: f64,
        max_distance: f64,
        rng: &mut GenRng,
    ) -> Option<NodeId> {
        let pool = self.sample_pool(exclude);
        if pool.is_empty() || base.is_empty() {
            return None;
        }
        let in_band = |candidate: NodeId, anchor: NodeId| -> bool {
            match (self.node(candidate), self.node(anchor)) {
                (Some(c), Some(a)) => {
                    let d = c.position.distance(a.position);
                    d >= min_distance && d <= max_distance
                }
                _ => false,
            }
        };

        for _ in 0..SAMPLE_ATTEMPTS {
            let candidate = *rng.choose(&pool)?;
            let anchor = *rng.choose(base)?;
            if in_band(candidate, anchor) {
                return Some(candidate);
            }
        }
        // Deterministic sweep once random probing has failed.
        pool.into_iter()
            .find(|&c| base.iter().any(|&a| in_band(c, a)))
    }

    /// A random walkable node at a target hop count from a random base
    /// node.  The target is drawn uniformly from `[min_hops, max_hops]`;
    /// when no node sits at exactly that depth, the reachable node with the
    /// closest depth is returned instead.
    pub fn random_node_with_edge_distance(
        &self,
        base: &[NodeId],
        exclude: &[NodeId],
        min_hops: usize,
        max_hops: usize,
        rng: &mut GenRng,
    ) -> Option<NodeId> {
        let anchor = *rng.choose(base)?;
        let pool = self.sample_pool(exclude);
        if pool.is_empty() || min_hops > max_hops {
            return None;
        }
        let target = rng.gen_range(min_hops..=max_hops);
        let dist = self.hop_distances(anchor);

        let exact: Vec<NodeId> = pool
            .iter()
            .copied()
            .filter(|&n| dist[n.index()] == target)
            .collect();
        if let Some(&hit) = rng.choose(&exact) {
            return Some(hit);
        }

        // Closest reachable depth; ties go to the lowest id.
        pool.into_iter()
            .filter(|&n| dist[n.index()] != usize::MAX)
            .min_by_key(|&n| (dist[n.index()].abs_diff(target), n))
    }

    /// Sampling pool: `Normal` nodes minus exclusions, falling back to all
    /// non-excluded nodes when no `Normal` nodes exist.
    fn sample_pool(&self, exclude: &[NodeId]) -> Vec<NodeId> {
        let normal: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Normal && !exclude.contains(&n.id))
            .map(|n| n.id)
            .collect();
        if !normal.is_empty() {
            return normal;
        }
        self.nodes
            .iter()
            .filter(|n| !exclude.contains(&n.id))
            .map(|n| n.id)
            .collect()
    }
}

#[inline]
fn canonical(a: NodeId, b: NodeId) -> (u32, u32) {
    if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) }
}
