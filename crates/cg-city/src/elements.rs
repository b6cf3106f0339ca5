//! Street-element placement: lamps, signs, trees, benches.
//!
//! Two passes run after buildings.  The spline pass drops elements at even
//! offsets along each road's verges; the perimeter pass scatters a few
//! around each building.  Both share one collision filter (existing
//! elements, buildings, road rectangles), and a final sweep deletes any
//! element whose centre ended up inside a building OBB — numeric edge cases
//! at rotated corners can slip through the pairwise tests.

use log::debug;

use cg_core::config::ElementConfig;
use cg_core::{
    Bounds, Building, CityConfig, Element, ElementId, ElementOwner, ElementType, GenRng,
    Segment, SegmentId,
};
use cg_spatial::QuadTree;

use crate::buildings::BuildingManager;
use crate::roads::RoadManager;
use crate::CityResult;

/// Clearance kept between a roadside element and the carriageway edge.
const VERGE_CLEARANCE: f64 = 1.0;

// ── ElementManager ────────────────────────────────────────────────────────────

/// Owner of the placed-element arena and its spatial index.
pub struct ElementManager {
    elements: Vec<Element>,
    quadtree: QuadTree<ElementId>,
    world: Bounds,
    max_objects: usize,
    max_levels: usize,
}

impl ElementManager {
    pub fn new(config: &CityConfig) -> CityResult<Self> {
        let q = &config.quadtree;
        Ok(Self {
            elements: Vec::new(),
            quadtree: QuadTree::new(q.bounds, q.max_objects, q.max_levels)?,
            world: q.bounds,
            max_objects: q.max_objects,
            max_levels: q.max_levels,
        })
    }

    /// Whether `bounds` inflated by `buffer` clears every existing element.
    pub fn can_place(&self, bounds: &Bounds, buffer: f64) -> bool {
        let inflated = bounds.inflate(buffer);
        let candidates = self.quadtree.retrieve(&inflated.index_envelope());
        candidates.into_iter().all(|id| {
            self.elements
                .get(id.index())
                .is_none_or(|e| !e.bounds.overlaps(&inflated))
        })
    }

    /// Add an element; ids are assigned in placement order.
    pub fn add(&mut self, kind: ElementType, bounds: Bounds, owner: ElementOwner) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.quadtree.insert(bounds.index_envelope(), id);
        self.elements.push(Element::new(id, kind, bounds, owner));
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Placed elements in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Candidate element ids near `rect` (spatial superset).
    pub fn candidates(&self, rect: &Bounds) -> Vec<ElementId> {
        let mut ids = self.quadtree.retrieve(rect);
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Keep only elements satisfying `keep`, compacting ids and rebuilding
    /// the index.  Ids are re-assigned in surviving order — the defensive
    /// filter runs before anything downstream captures element ids.
    pub fn retain<F: FnMut(&Element) -> bool>(&mut self, mut keep: F) -> CityResult<()> {
        let survivors: Vec<Element> = self.elements.drain(..).filter(|e| keep(e)).collect();
        self.quadtree = QuadTree::new(self.world, self.max_objects, self.max_levels)?;
        for (i, mut element) in survivors.into_iter().enumerate() {
            element.id = ElementId(i as u32);
            self.quadtree.insert(element.bounds.index_envelope(), element.id);
            self.elements.push(element);
        }
        Ok(())
    }

    /// Drop every element (edit-API invalidation).
    pub fn clear(&mut self) {
        self.elements.clear();
        self.quadtree.clear();
    }
}

// ── ElementGenerator ──────────────────────────────────────────────────────────

/// The two placement passes plus the defensive centre-inside-building sweep.
pub struct ElementGenerator {
    cfg: ElementConfig,
    road_width: f64,
    types: Vec<ElementType>,
}

impl ElementGenerator {
    pub fn new(config: &CityConfig) -> Self {
        Self {
            cfg: config.element.clone(),
            road_width: config.road.road_width,
            types: config.element.element_types(),
        }
    }

    /// Spline pass: evenly spaced verge positions along one segment,
    /// alternating sides.
    pub fn generate_along_segment(
        &self,
        segment: &Segment,
        segment_id: SegmentId,
        roads: &RoadManager,
        buildings: &BuildingManager,
        elements: &mut ElementManager,
        rng: &mut GenRng,
    ) {
        let length = segment.length();
        let spacing = self.cfg.road_element_spacing;
        let normal = segment.direction().perp();
        let slots = (length / spacing).floor() as usize;

        for i in 1..=slots {
            let Some(kind) = rng.choose(&self.types).cloned() else { return };
            let side = if i % 2 == 0 { 1.0 } else { -1.0 };
            let lateral =
                self.road_width / 2.0 + kind.height.max(kind.width) / 2.0 + VERGE_CLEARANCE;
            let center =
                segment.point_at(i as f64 * spacing / length) + normal * (side * lateral);
            let bounds = Bounds::from_center(center, kind.width, kind.height, segment.angle());

            if self.clear_to_place(&bounds, roads, buildings, elements) {
                elements.add(kind, bounds, ElementOwner::Road(segment_id));
            } else {
                debug!("roadside element blocked along {segment_id}");
            }
        }
    }

    /// Perimeter pass: up to `elements_per_building` proposals offset
    /// outward from the building's edges.
    pub fn generate_around_building(
        &self,
        building: &Building,
        roads: &RoadManager,
        buildings: &BuildingManager,
        elements: &mut ElementManager,
        rng: &mut GenRng,
    ) {
        if self.cfg.elements_per_building == 0 {
            return;
        }
        let corners = building.bounds.corners();
        let count = rng.gen_range(0..=self.cfg.elements_per_building);

        for _ in 0..count {
            let Some(kind) = rng.choose(&self.types).cloned() else { return };
            let edge = rng.gen_range(0..4usize);
            let t = rng.gen_range(0.2..0.8);

            let a = corners[edge];
            let b = corners[(edge + 1) % 4];
            let anchor = a.lerp(b, t);
            // Corners run counter-clockwise, so the outward normal is the
            // clockwise perpendicular of the edge direction.
            let outward = -(b - a).normalize().perp();
            let offset =
                self.cfg.element_building_distance + kind.width.max(kind.height) / 2.0;
            let center = anchor + outward * offset;
            let bounds =
                Bounds::from_center(center, kind.width, kind.height, building.rotation);

            if self.clear_to_place(&bounds, roads, buildings, elements) {
                elements.add(kind, bounds, ElementOwner::Building(building.id));
            } else {
                debug!("perimeter element blocked at building {}", building.id);
            }
        }
    }

    /// Defensive sweep: drop any element whose centre lies inside a building
    /// OBB.
    pub fn filter_by_buildings(
        &self,
        buildings: &BuildingManager,
        elements: &mut ElementManager,
    ) -> CityResult<()> {
        elements.retain(|element| {
            let probe = Bounds::from_center(element.center, 1.0, 1.0, 0.0);
            buildings
                .candidates(&probe.inflate(1.0))
                .into_iter()
                .filter_map(|id| buildings.get(id))
                .all(|b| !b.bounds.contains_point(element.center))
        })
    }

    /// Shared collision filter: existing elements (with the element-element
    /// buffer), building OBBs (with the element-building buffer), and road
    /// rectangles.
    fn clear_to_place(
        &self,
        bounds: &Bounds,
        roads: &RoadManager,
        buildings: &BuildingManager,
        elements: &ElementManager,
    ) -> bool {
        if !elements.can_place(bounds, self.cfg.element_element_distance) {
            return false;
        }

        let near_buildings = bounds.inflate(self.cfg.element_building_distance);
        let building_hit = buildings
            .candidates(&near_buildings.index_envelope())
            .into_iter()
            .filter_map(|id| buildings.get(id))
            .any(|b| b.bounds.overlaps(&near_buildings));
        if building_hit {
            return false;
        }

        let road_hit = roads
            .candidates(&bounds.index_envelope())
            .into_iter()
            .filter_map(|id| roads.get(id))
            .any(|seg| seg.road_rect(self.road_width).overlaps(bounds));
        !road_hit
    }
}
