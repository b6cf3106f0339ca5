//! Building placement along road frontages.
//!
//! Each non-highway segment gets a frontage walk on both sides: march from
//! start to end in jittered strides, propose an oriented building at each
//! position, and keep it only if its buffered OBB clears every existing
//! building and every road rectangle.  Collisions shift the position forward
//! by a half stride for a bounded number of retries before the slot is
//! skipped.

use log::debug;

use cg_core::config::BuildingConfig;
use cg_core::{
    Bounds, Building, BuildingId, BuildingType, CityConfig, GenRng, Point, Segment, SegmentId,
};
use cg_spatial::QuadTree;

use crate::roads::RoadManager;
use crate::CityResult;

/// Collision retries per frontage slot before giving up on it.
const PLACEMENT_RETRIES: usize = 3;

// ── BuildingManager ───────────────────────────────────────────────────────────

/// Owner of the placed-building arena and its spatial index.
pub struct BuildingManager {
    buildings: Vec<Building>,
    quadtree: QuadTree<BuildingId>,
}

impl BuildingManager {
    pub fn new(config: &CityConfig) -> CityResult<Self> {
        let q = &config.quadtree;
        Ok(Self {
            buildings: Vec::new(),
            quadtree: QuadTree::new(q.bounds, q.max_objects, q.max_levels)?,
        })
    }

    /// Whether an OBB inflated by `buffer` clears every existing building.
    pub fn can_place(&self, bounds: &Bounds, buffer: f64) -> bool {
        let inflated = bounds.inflate(buffer);
        let candidates = self.quadtree.retrieve(&inflated.index_envelope());
        candidates.into_iter().all(|id| {
            self.buildings
                .get(id.index())
                .is_none_or(|b| !b.bounds.overlaps(&inflated))
        })
    }

    /// Add a building; ids are assigned in placement order.
    pub fn add(&mut self, kind: BuildingType, bounds: Bounds) -> BuildingId {
        let id = BuildingId(self.buildings.len() as u32);
        self.quadtree.insert(bounds.index_envelope(), id);
        self.buildings.push(Building::new(id, kind, bounds));
        id
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id.index())
    }

    /// Placed buildings in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Candidate building ids near `rect` (spatial superset).
    pub fn candidates(&self, rect: &Bounds) -> Vec<BuildingId> {
        let mut ids = self.quadtree.retrieve(rect);
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Drop every building (edit-API invalidation).
    pub fn clear(&mut self) {
        self.buildings.clear();
        self.quadtree.clear();
    }
}

// ── BuildingGenerator ─────────────────────────────────────────────────────────

/// Frontage-walk placement pass.
///
/// The per-run tally of placed required categories biases type selection:
/// while any required category is still missing, the picker draws from the
/// missing ones only, so coverage is satisfied before optional types appear.
pub struct BuildingGenerator {
    cfg: BuildingConfig,
    road_width: f64,
    types: Vec<BuildingType>,
    /// Placement counts, parallel to `types`.
    placed: Vec<usize>,
}

impl BuildingGenerator {
    pub fn new(config: &CityConfig) -> Self {
        let types = config.building.building_types();
        let placed = vec![0; types.len()];
        Self {
            cfg: config.building.clone(),
            road_width: config.road.road_width,
            types,
            placed,
        }
    }

    /// Reset the coverage tally (edit-API invalidation).
    pub fn reset(&mut self) {
        self.placed.fill(0);
    }

    /// Place buildings along both frontages of one segment.
    /// Highway segments carry no frontage and are skipped by the caller.
    pub fn generate_along_segment(
        &mut self,
        segment: &Segment,
        segment_id: SegmentId,
        roads: &RoadManager,
        buildings: &mut BuildingManager,
        rng: &mut GenRng,
    ) {
        let length = segment.length();
        let normal = segment.direction().perp();
        let stride = self.cfg.frontage_stride;

        for side in [1.0, -1.0] {
            let mut along = stride * 0.5 + rng.jitter(self.cfg.stride_jitter);
            while along < length {
                let type_idx = self.pick_type(rng);
                let kind = self.types[type_idx].clone();
                let placed =
                    self.try_place_at(segment, side, along, length, &kind, normal, roads, buildings);
                if placed {
                    self.placed[type_idx] += 1;
                } else {
                    debug!(
                        "no room for {} along {} side {side}",
                        kind.name, segment_id
                    );
                }
                along += stride + rng.jitter(self.cfg.stride_jitter);
            }
        }
    }

    /// Attempt one frontage slot, shifting forward by half strides on
    /// collision.  Returns whether a building was placed.
    #[allow(clippy::too_many_arguments)]
    fn try_place_at(
        &self,
        segment: &Segment,
        side: f64,
        along: f64,
        length: f64,
        kind: &BuildingType,
        normal: Point,
        roads: &RoadManager,
        buildings: &mut BuildingManager,
    ) -> bool {
        // Long edge parallel to the road.
        let frontage_extent = kind.width.max(kind.height);
        let depth = kind.width.min(kind.height);
        let lateral = self.road_width / 2.0 + self.cfg.road_building_distance + depth / 2.0;

        let mut offset = along;
        for _ in 0..=PLACEMENT_RETRIES {
            if offset >= length {
                break;
            }
            let center = segment.point_at(offset / length) + normal * (side * lateral);
            let bounds = Bounds::from_center(center, frontage_extent, depth, segment.angle());

            if buildings.can_place(&bounds, self.cfg.building_building_distance)
                && self.clears_roads(&bounds, roads)
            {
                buildings.add(kind.clone(), bounds);
                return true;
            }
            offset += self.cfg.frontage_stride / 2.0;
        }
        false
    }

    /// Whether the buffered OBB avoids every nearby road rectangle.
    fn clears_roads(&self, bounds: &Bounds, roads: &RoadManager) -> bool {
        let inflated = bounds.inflate(self.cfg.road_building_distance);
        let candidates = roads.candidates(&inflated.index_envelope());
        candidates.into_iter().all(|id| {
            roads
                .get(id)
                .is_none_or(|seg| !seg.road_rect(self.road_width).overlaps(&inflated))
        })
    }

    /// Choose the next building type: any still-missing required category
    /// first, the full palette otherwise.
    fn pick_type(&self, rng: &mut GenRng) -> usize {
        let missing: Vec<usize> = self
            .types
            .iter()
            .enumerate()
            .filter(|(i, t)| t.is_required && self.placed[*i] == 0)
            .map(|(i, _)| i)
            .collect();
        let pool: Vec<usize> = if missing.is_empty() {
            (0..self.types.len()).collect()
        } else {
            missing
        };
        rng.choose(&pool).copied().unwrap_or(0)
    }
}
