//! `CityGenerator` — the phase driver collaborators talk to.
//!
//! # Phases
//!
//! `generate_step` advances one small unit of work per call so visualisers
//! can render intermediate states:
//!
//! 1. **Roads**: seed, then one proposal per step through the growth loop;
//!    intersections are collected when the queue drains or the cap is hit.
//! 2. **Buildings**: one segment's frontage per step.
//! 3. **Elements**: roadside pass per segment, perimeter pass per building,
//!    then the defensive centre-inside-building sweep.
//! 4. **Routes**: one route per segment, plus one element-anchored route.
//! 5. **Graph**: derive the walkable graph.
//!
//! `generate` drives the steps to completion.  All state is owned here and
//! frozen read-only once `is_generation_complete` reports true; the edit
//! API (`add_road` / `remove_road` / `modify_road`) re-runs local
//! constraints and invalidates every phase derived from road geometry.

use log::{debug, info};

use cg_core::{
    BuildingId, CityConfig, GenRng, Intersection, NodeId, Point, Route, RouteId, Segment,
    SegmentId,
};
use cg_graph::{GraphBuilder, WalkGraph};

use crate::buildings::{BuildingGenerator, BuildingManager};
use crate::elements::{ElementGenerator, ElementManager};
use crate::growth::{LocalOutcome, RoadGrowth};
use crate::roads::RoadManager;
use crate::routes::{point_around_label, AroundLabel, RouteSampler};
use crate::{CityError, CityResult};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Where the driver currently is.  Cursor-carrying phases walk the id space
/// of the collection they iterate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Roads,
    Buildings { next: usize },
    RoadsideElements { next: usize },
    BuildingElements { next: usize },
    ElementFilter,
    Routes { next: usize },
    ElementRoute,
    Graph,
    Done,
}

// ── CityGenerator ─────────────────────────────────────────────────────────────

/// Owner of every manager, the growth state, and the single seeded RNG.
pub struct CityGenerator {
    config: CityConfig,
    rng: GenRng,
    roads: RoadManager,
    growth: RoadGrowth,
    intersections: Vec<Intersection>,
    buildings: BuildingManager,
    building_gen: BuildingGenerator,
    elements: ElementManager,
    element_gen: ElementGenerator,
    route_sampler: RouteSampler,
    routes: Vec<Route>,
    graph: Option<WalkGraph>,
    phase: Phase,
}

impl CityGenerator {
    /// Validate the configuration and set up empty managers.
    pub fn new(config: CityConfig) -> CityResult<Self> {
        config.validate()?;
        Ok(Self {
            rng: GenRng::new(config.seed),
            roads: RoadManager::new(&config)?,
            growth: RoadGrowth::new(&config),
            intersections: Vec::new(),
            buildings: BuildingManager::new(&config)?,
            building_gen: BuildingGenerator::new(&config),
            elements: ElementManager::new(&config)?,
            element_gen: ElementGenerator::new(&config),
            route_sampler: RouteSampler::new(&config),
            routes: Vec::new(),
            graph: None,
            phase: Phase::Roads,
            config,
        })
    }

    /// Run generation to completion.
    pub fn generate(&mut self) -> CityResult<()> {
        while !self.is_generation_complete() {
            self.generate_step()?;
        }
        Ok(())
    }

    /// Advance one unit of work.  A no-op once generation is complete.
    pub fn generate_step(&mut self) -> CityResult<()> {
        match self.phase {
            Phase::Roads => self.step_roads(),
            Phase::Buildings { next } => self.step_buildings(next),
            Phase::RoadsideElements { next } => self.step_roadside_elements(next),
            Phase::BuildingElements { next } => self.step_building_elements(next),
            Phase::ElementFilter => self.step_element_filter(),
            Phase::Routes { next } => self.step_routes(next),
            Phase::ElementRoute => self.step_element_route(),
            Phase::Graph => self.step_graph(),
            Phase::Done => Ok(()),
        }
    }

    pub fn is_generation_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    // ── Phase steps ───────────────────────────────────────────────────────

    fn step_roads(&mut self) -> CityResult<()> {
        if !self.growth.is_seeded() {
            self.growth.seed(self.config.quadtree.bounds.center());
            return Ok(());
        }
        if self.growth.is_done(&self.roads) {
            self.intersections = self.growth.collect_intersections(&self.roads);
            info!(
                "road phase complete: {} segments, {} intersections",
                self.roads.len(),
                self.intersections.len()
            );
            self.phase = Phase::Buildings { next: 0 };
            return Ok(());
        }
        self.growth.step(&mut self.roads, &mut self.rng)?;
        Ok(())
    }

    fn step_buildings(&mut self, next: usize) -> CityResult<()> {
        if next >= self.roads.slot_count() {
            info!("building phase complete: {} buildings", self.buildings.len());
            self.phase = Phase::RoadsideElements { next: 0 };
            return Ok(());
        }
        let id = SegmentId(next as u32);
        if let Some(segment) = self.roads.get(id).copied() {
            // Highways carry no frontage.
            if !segment.meta.highway {
                self.building_gen.generate_along_segment(
                    &segment,
                    id,
                    &self.roads,
                    &mut self.buildings,
                    &mut self.rng,
                );
            }
        }
        self.phase = Phase::Buildings { next: next + 1 };
        Ok(())
    }

    fn step_roadside_elements(&mut self, next: usize) -> CityResult<()> {
        if next >= self.roads.slot_count() {
            self.phase = Phase::BuildingElements { next: 0 };
            return Ok(());
        }
        let id = SegmentId(next as u32);
        if let Some(segment) = self.roads.get(id).copied() {
            self.element_gen.generate_along_segment(
                &segment,
                id,
                &self.roads,
                &self.buildings,
                &mut self.elements,
                &mut self.rng,
            );
        }
        self.phase = Phase::RoadsideElements { next: next + 1 };
        Ok(())
    }

    fn step_building_elements(&mut self, next: usize) -> CityResult<()> {
        if next >= self.buildings.len() {
            self.phase = Phase::ElementFilter;
            return Ok(());
        }
        let building = self.buildings.get(BuildingId(next as u32)).cloned();
        if let Some(building) = building {
            self.element_gen.generate_around_building(
                &building,
                &self.roads,
                &self.buildings,
                &mut self.elements,
                &mut self.rng,
            );
        }
        self.phase = Phase::BuildingElements { next: next + 1 };
        Ok(())
    }

    fn step_element_filter(&mut self) -> CityResult<()> {
        self.element_gen
            .filter_by_buildings(&self.buildings, &mut self.elements)?;
        info!("element phase complete: {} elements", self.elements.len());
        self.phase = Phase::Routes { next: 0 };
        Ok(())
    }

    fn step_routes(&mut self, next: usize) -> CityResult<()> {
        if next >= self.roads.slot_count() {
            self.phase = Phase::ElementRoute;
            return Ok(());
        }
        let id = SegmentId(next as u32);
        if let Some(segment) = self.roads.get(id).copied() {
            let route = self.route_sampler.route_along_road(
                &segment,
                RouteId(self.routes.len() as u32),
                &mut self.rng,
            );
            self.routes.push(route);
        }
        self.phase = Phase::Routes { next: next + 1 };
        Ok(())
    }

    fn step_element_route(&mut self) -> CityResult<()> {
        if let Some(route) = self.route_sampler.route_from_elements(
            self.elements.as_slice(),
            RouteId(self.routes.len() as u32),
            &mut self.rng,
        ) {
            self.routes.push(route);
        }
        self.phase = Phase::Graph;
        Ok(())
    }

    fn step_graph(&mut self) -> CityResult<()> {
        let graph = GraphBuilder::new(
            self.config.graph.sidewalk_offset,
            self.config.graph.connect_slack,
        )
        .interpolate(self.config.graph.interpolate)
        .build(self.roads.iter().map(|(_, s)| s));
        info!(
            "graph phase complete: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        self.graph = Some(graph);
        self.phase = Phase::Done;
        Ok(())
    }

    // ── Read-only accessors ───────────────────────────────────────────────

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    pub fn roads(&self) -> &RoadManager {
        &self.roads
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn buildings(&self) -> &BuildingManager {
        &self.buildings
    }

    pub fn elements(&self) -> &ElementManager {
        &self.elements
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The derived graph; `None` until the graph phase has run.
    pub fn graph(&self) -> Option<&WalkGraph> {
        self.graph.as_ref()
    }

    /// Neighbourhood summary around `point` (§ asset-retrieval collaborator).
    pub fn point_around_label(&self, point: Point, radius: f64, k: usize) -> AroundLabel {
        point_around_label(point, &self.buildings, &self.elements, radius, k)
    }

    // ── Graph queries (thin delegators) ───────────────────────────────────

    pub fn closest_node(&self, position: Point) -> Option<NodeId> {
        self.graph.as_ref()?.closest_node(position)
    }

    pub fn adjacent_points(&self, node: NodeId) -> Vec<Point> {
        self.graph
            .as_ref()
            .map(|g| g.adjacent_points(node))
            .unwrap_or_default()
    }

    pub fn edge_distance_between(&self, a: NodeId, b: NodeId) -> Option<usize> {
        self.graph.as_ref()?.edge_hop_distance(a, b).ok()
    }

    pub fn random_node(&mut self, exclude: &[NodeId]) -> Option<NodeId> {
        self.graph.as_ref()?.random_node(exclude, &mut self.rng)
    }

    // ── Edit API ──────────────────────────────────────────────────────────

    /// Insert a road through the local-constraints pass.  Returns the new
    /// id, or `None` when the pass rejects the road (not an error).  Global
    /// goals are *not* spawned for edits.
    pub fn add_road(&mut self, start: Point, end: Point) -> CityResult<Option<SegmentId>> {
        let proposal = Segment::new(start, end);
        proposal.validate().map_err(CityError::from)?;

        match self
            .growth
            .check_local_constraints(&proposal, &self.roads, None)
        {
            LocalOutcome::Reject(reason) => {
                debug!("add_road rejected ({reason}): {start} -> {end}");
                Ok(None)
            }
            LocalOutcome::Accept { segment, .. } => {
                let id = self.roads.add(segment)?;
                self.invalidate_derived();
                Ok(Some(id))
            }
            LocalOutcome::Split { proposal, crossed, at } => {
                self.growth.apply_split(crossed, at, &mut self.roads)?;
                let id = self.roads.add(proposal)?;
                self.invalidate_derived();
                Ok(Some(id))
            }
        }
    }

    /// Remove a road by id.  Fails on unknown ids.
    pub fn remove_road(&mut self, id: SegmentId) -> CityResult<()> {
        self.roads.remove(id)?;
        self.invalidate_derived();
        Ok(())
    }

    /// Replace a road's geometry, keeping its metadata, re-running local
    /// constraints against everything else.  Returns whether the change was
    /// applied (`false` = rejected, road left untouched).
    pub fn modify_road(&mut self, id: SegmentId, start: Point, end: Point) -> CityResult<bool> {
        let old = *self.roads.get(id).ok_or(CityError::SegmentNotFound(id))?;
        let proposal = Segment::with_meta(start, end, old.meta);
        proposal.validate().map_err(CityError::from)?;

        match self
            .growth
            .check_local_constraints(&proposal, &self.roads, Some(id))
        {
            LocalOutcome::Reject(reason) => {
                debug!("modify_road {id} rejected ({reason})");
                Ok(false)
            }
            LocalOutcome::Accept { segment, .. } => {
                self.roads.update(id, segment)?;
                self.invalidate_derived();
                Ok(true)
            }
            LocalOutcome::Split { proposal, crossed, at } => {
                self.growth.apply_split(crossed, at, &mut self.roads)?;
                self.roads.update(id, proposal)?;
                self.invalidate_derived();
                Ok(true)
            }
        }
    }

    /// Re-derive intersections and rewind every phase that depends on road
    /// geometry.  During the road phase only the intersection list is
    /// refreshed; growth continues where it was.
    fn invalidate_derived(&mut self) {
        self.intersections = self.growth.collect_intersections(&self.roads);
        if self.phase != Phase::Roads {
            self.buildings.clear();
            self.building_gen.reset();
            self.elements.clear();
            self.routes.clear();
            self.graph = None;
            self.phase = Phase::Buildings { next: 0 };
        }
    }
}
