//! Sampled pedestrian routes and the neighbourhood-summary query.

use std::collections::BTreeMap;

use cg_core::config::RouteConfig;
use cg_core::{Bounds, CityConfig, Direction8, Element, GenRng, Point, Route, RouteId, Segment};

use crate::buildings::BuildingManager;
use crate::elements::ElementManager;

// ── RouteSampler ──────────────────────────────────────────────────────────────

/// Produces short point sequences for downstream agents.
pub struct RouteSampler {
    cfg: RouteConfig,
}

impl RouteSampler {
    pub fn new(config: &CityConfig) -> Self {
        Self { cfg: config.route.clone() }
    }

    /// Sample a route along one road: N uniform parameters in `[0, 1]`,
    /// returned as raw interpolations (consumers snap to graph nodes
    /// themselves if they need to).
    pub fn route_along_road(&self, segment: &Segment, id: RouteId, rng: &mut GenRng) -> Route {
        let n = rng.gen_range(self.cfg.min_points_per_route..=self.cfg.max_points_per_route);
        let points: Vec<Point> = (0..n)
            .map(|_| segment.point_at(rng.gen_range(0.0..=1.0)))
            .collect();
        Route::new(id, points)
    }

    /// Placeholder route for element-driven planners: a single point at a
    /// randomly chosen element's centre.
    pub fn route_from_elements(
        &self,
        elements: &[Element],
        id: RouteId,
        rng: &mut GenRng,
    ) -> Option<Route> {
        let element = rng.choose(elements)?;
        Some(Route::new(id, vec![element.center]))
    }
}

// ── Neighbourhood summary ─────────────────────────────────────────────────────

/// Structured description of what surrounds a point: nearest buildings with
/// their compass direction from the query point, and a per-type histogram of
/// nearby elements.  `BTreeMap` keeps the key order stable for callers that
/// serialise the summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AroundLabel {
    /// Element type name → count within the window (up to `k` elements).
    pub element_stats: BTreeMap<String, usize>,
    /// Building type name → eight-wind direction from the query point.
    /// The nearest building of each name wins.
    pub building_stats: BTreeMap<String, Direction8>,
}

/// Summarise up to `k` nearest buildings and `k` nearest elements within a
/// square window of half-side `radius` around `point`.
pub fn point_around_label(
    point: Point,
    buildings: &BuildingManager,
    elements: &ElementManager,
    radius: f64,
    k: usize,
) -> AroundLabel {
    let window = Bounds::new(point.x - radius, point.y - radius, 2.0 * radius, 2.0 * radius);

    let mut nearby_buildings: Vec<_> = buildings
        .candidates(&window)
        .into_iter()
        .filter_map(|id| buildings.get(id))
        .filter(|b| window.contains_point(b.center))
        .collect();
    nearby_buildings
        .sort_by(|a, b| f64::total_cmp(&point.distance(a.center), &point.distance(b.center)));

    let mut building_stats = BTreeMap::new();
    for building in nearby_buildings.into_iter().take(k) {
        // entry() keeps the nearest of each name (sorted ascending above).
        building_stats
            .entry(building.kind.name.clone())
            .or_insert_with(|| Direction8::from_points(point, building.center));
    }

    let mut nearby_elements: Vec<_> = elements
        .candidates(&window)
        .into_iter()
        .filter_map(|id| elements.get(id))
        .filter(|e| window.contains_point(e.center))
        .collect();
    nearby_elements
        .sort_by(|a, b| f64::total_cmp(&point.distance(a.center), &point.distance(b.center)));

    let mut element_stats = BTreeMap::new();
    for element in nearby_elements.into_iter().take(k) {
        *element_stats.entry(element.kind.name.clone()).or_insert(0) += 1;
    }

    AroundLabel { element_stats, building_stats }
}
