//! Canonical storage for accepted road segments.
//!
//! # Data layout
//!
//! Segments live in a dense `Vec` indexed by `SegmentId` in acceptance
//! order, with a parallel alive-flag so removal and splitting never disturb
//! existing ids.  A quadtree keyed on each segment's snap-inflated AABB
//! serves the local-constraints pass; every id the quadtree returns is a
//! *candidate* that callers re-test with precise geometry.

use cg_core::{Bounds, CityConfig, Segment, SegmentId};
use cg_spatial::QuadTree;

use crate::{CityError, CityResult};

/// Owner of the accepted-segment arena and its spatial index.
pub struct RoadManager {
    segments: Vec<Segment>,
    alive: Vec<bool>,
    alive_count: usize,
    quadtree: QuadTree<SegmentId>,
    /// AABB inflation applied on insert, from `road.snap_distance`.
    snap_distance: f64,
}

impl RoadManager {
    pub fn new(config: &CityConfig) -> CityResult<Self> {
        let q = &config.quadtree;
        Ok(Self {
            segments: Vec::new(),
            alive: Vec::new(),
            alive_count: 0,
            quadtree: QuadTree::new(q.bounds, q.max_objects, q.max_levels)?,
            snap_distance: config.road.snap_distance,
        })
    }

    /// Accept a segment: validate, assign the next id, index it.
    pub fn add(&mut self, segment: Segment) -> CityResult<SegmentId> {
        segment.validate()?;
        let id = SegmentId::try_from(self.segments.len())
            .map_err(|_| CityError::IdSpaceExhausted)?;
        self.quadtree.insert(segment.aabb(self.snap_distance), id);
        self.segments.push(segment);
        self.alive.push(true);
        self.alive_count += 1;
        Ok(id)
    }

    /// Remove a segment.  Its id is retired, never reused.
    pub fn remove(&mut self, id: SegmentId) -> CityResult<Segment> {
        let segment = *self.get(id).ok_or(CityError::SegmentNotFound(id))?;
        self.quadtree.remove(&segment.aabb(self.snap_distance), &id);
        self.alive[id.index()] = false;
        self.alive_count -= 1;
        Ok(segment)
    }

    /// Replace a segment's geometry in place, re-indexing it.
    pub fn update(&mut self, id: SegmentId, new_segment: Segment) -> CityResult<()> {
        new_segment.validate()?;
        let old = *self.get(id).ok_or(CityError::SegmentNotFound(id))?;
        self.quadtree.remove(&old.aabb(self.snap_distance), &id);
        self.quadtree.insert(new_segment.aabb(self.snap_distance), id);
        self.segments[id.index()] = new_segment;
        Ok(())
    }

    /// The segment for `id`, if it is still alive.
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        if id.index() < self.segments.len() && self.alive[id.index()] {
            Some(&self.segments[id.index()])
        } else {
            None
        }
    }

    /// Candidate segment ids whose indexed AABB may overlap `rect`,
    /// deduplicated and ascending.
    pub fn candidates(&self, rect: &Bounds) -> Vec<SegmentId> {
        let mut ids = self.quadtree.retrieve(rect);
        ids.sort_unstable();
        ids.dedup();
        ids.retain(|id| self.alive[id.index()]);
        ids
    }

    /// Alive segments in acceptance order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(i, _)| self.alive[*i])
            .map(|(i, s)| (SegmentId(i as u32), s))
    }

    /// Number of alive segments.
    pub fn len(&self) -> usize {
        self.alive_count
    }

    pub fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    /// Total id slots handed out, dead ones included.  Phase cursors walk
    /// `0..slot_count()` and skip dead slots via [`RoadManager::get`].
    pub fn slot_count(&self) -> usize {
        self.segments.len()
    }
}
