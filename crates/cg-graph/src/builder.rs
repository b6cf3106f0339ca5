//! Derives the walkable graph from accepted road segments.
//!
//! Each segment contributes a rectangular "sidewalk ring": four corner
//! nodes offset from the segment by `sidewalk_offset` both laterally and
//! longitudinally, joined by four edges.  Rings of nearby roads are then
//! stitched together wherever two nodes sit closer than
//! `2 * sidewalk_offset + connect_slack`, which yields one connected walk
//! component per physically connected road cluster without any separate
//! authoring pass.  Corners landing on the same quantised point (e.g. a
//! T-junction's shared shoulder) merge into a single node.
//!
//! Optionally, long edges are subdivided with interpolated `Normal` nodes so
//! samplers have non-corner positions to draw from.

use rustc_hash::FxHashMap;

use cg_core::{NodeId, Point, Segment};

use crate::graph::{NodeKind, WalkGraph};

pub struct GraphBuilder {
    sidewalk_offset: f64,
    connect_slack: f64,
    interpolate: bool,
}

impl GraphBuilder {
    pub fn new(sidewalk_offset: f64, connect_slack: f64) -> Self {
        Self { sidewalk_offset, connect_slack, interpolate: false }
    }

    /// Enable subdivision of long edges with interpolated walk nodes.
    pub fn interpolate(mut self, on: bool) -> Self {
        self.interpolate = on;
        self
    }

    /// Build the graph for the given segments.
    pub fn build<'a, I>(&self, segments: I) -> WalkGraph
    where
        I: IntoIterator<Item = &'a Segment>,
    {
        let mut graph = WalkGraph::new();
        let mut by_key: FxHashMap<(i64, i64), NodeId> = FxHashMap::default();

        // ── Sidewalk rings ────────────────────────────────────────────────
        for segment in segments {
            let dir = segment.direction();
            let normal = dir.perp();
            let off = self.sidewalk_offset;

            let corners = [
                segment.start - dir * off + normal * off,
                segment.end + dir * off + normal * off,
                segment.end + dir * off - normal * off,
                segment.start - dir * off - normal * off,
            ];
            let ids = corners.map(|corner| {
                *by_key
                    .entry(corner.key())
                    .or_insert_with(|| graph.add_node(corner, NodeKind::Intersection))
            });
            for i in 0..4 {
                graph.add_edge(ids[i], ids[(i + 1) % 4]);
            }
        }

        // ── Connect adjacent roads ────────────────────────────────────────
        self.connect_adjacent(&mut graph);

        // ── Optional subdivision ──────────────────────────────────────────
        if self.interpolate {
            self.subdivide_edges(&mut graph);
        }

        graph
    }

    /// Add an edge between every node pair closer than the connection
    /// threshold.  Neighbour lists are sorted so edge insertion order (and
    /// therefore every downstream iteration) is deterministic.
    fn connect_adjacent(&self, graph: &mut WalkGraph) {
        let threshold = 2.0 * self.sidewalk_offset + self.connect_slack;
        let positions: Vec<(NodeId, Point)> =
            graph.nodes().map(|n| (n.id, n.position)).collect();

        for &(id, position) in &positions {
            for other in graph.nodes_within(position, threshold) {
                if other > id {
                    graph.add_edge(id, other);
                }
            }
        }
    }

    /// Split every edge longer than `2 * sidewalk_offset` into evenly
    /// spaced pieces joined through interpolated `Normal` nodes.
    fn subdivide_edges(&self, graph: &mut WalkGraph) {
        let spacing = 2.0 * self.sidewalk_offset;
        let snapshot: Vec<(NodeId, NodeId, f64)> =
            graph.edges().iter().map(|e| (e.a, e.b, e.weight)).collect();

        for (a, b, weight) in snapshot {
            let pieces = (weight / spacing).floor() as usize;
            if pieces <= 1 {
                continue;
            }
            let (Some(start), Some(end)) = (graph.node(a), graph.node(b)) else {
                continue;
            };
            let (start, end) = (start.position, end.position);

            graph.remove_edge(a, b);
            let mut previous = a;
            for i in 1..pieces {
                let position = start.lerp(end, i as f64 / pieces as f64);
                let node = graph.add_node(position, NodeKind::Normal);
                graph.add_edge(previous, node);
                previous = node;
            }
            graph.add_edge(previous, b);
        }
    }
}
