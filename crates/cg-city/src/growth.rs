//! Iterative road growth — the centrepiece of the generator.
//!
//! # Algorithm
//!
//! Growth runs a pop/process/push loop over a delay-ordered proposal queue:
//!
//! 1. Pop the pending proposal with the smallest delay `t`.
//! 2. Run the local-constraints pass (length/angle sanity, intersection with
//!    truncate-or-split, endpoint snapping, parallel rejection, angle
//!    crowding).  The pass never mutates shared state; it returns an
//!    [`LocalOutcome`] the step applies.
//! 3. On acceptance, spawn global goals from the far endpoint: a straight
//!    continuation and up to two ±90° branches, each delayed by
//!    `t + 1 + deviation/15` so straight growth is explored first.
//!
//! Proposals that were truncated, snapped, or split into an existing road
//! are *severed*: they terminate there and spawn no goals.
//!
//! Rejection is normal control flow — logged at debug, never an error.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use cg_core::geom::{
    angle_difference, min_degree_difference, normalize_deg, segment_intersection,
    point_segment_distance, projection_parameter,
};
use cg_core::{CityConfig, GenRng, Intersection, Point, Segment, SegmentId, SegmentMeta};
use cg_core::config::RoadConfig;
use cg_spatial::ProposalQueue;

use crate::roads::RoadManager;
use crate::{CityError, CityResult};

/// Numerical buffer for the proper-intersection test: parameter values this
/// close to an endpoint count as touching, not crossing.
const INTERSECT_BUFFER: f64 = 0.001;

/// Intersections at proposal parameter `e` beyond this truncate the proposal
/// instead of splitting the crossed segment.
const NEAR_END_E: f64 = 0.95;

/// Angular tolerance (mod 180) below which two segments count as parallel.
const PARALLEL_EPS_DEG: f64 = 10.0;

/// Divisor converting angular deviation from the parent into proposal delay.
const STRAIGHTNESS_PENALTY_DIV: f64 = 15.0;

/// Orientation clustering tolerance when classifying intersections.
const ORIENTATION_EPS_DEG: f64 = 1.0;

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Result of the local-constraints pass over one proposal.
pub(crate) enum LocalOutcome {
    /// Accept the (possibly snapped or truncated) proposal.  `severed`
    /// proposals terminated on existing geometry and spawn no goals.
    Accept { segment: Segment, severed: bool },
    /// Accept the proposal truncated at `at`, splitting `crossed` there.
    Split { proposal: Segment, crossed: SegmentId, at: Point },
    /// Drop the proposal.
    Reject(&'static str),
}

/// What one growth step did, as seen by the phase driver.
#[derive(Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A proposal was accepted (possibly alongside a split of an existing
    /// segment).
    Accepted,
    /// A proposal was popped and rejected.
    Rejected,
    /// Queue empty or segment cap reached — the road phase is over.
    Exhausted,
}

// ── RoadGrowth ────────────────────────────────────────────────────────────────

/// State of the road-growth loop: the proposal queue plus the running
/// highway-length budget and the junction set fed by splits.
pub struct RoadGrowth {
    cfg: RoadConfig,
    queue: ProposalQueue,
    seeded: bool,
    /// Cumulative length of accepted highway segments; once past
    /// `cfg.highway_length`, continuations demote to streets.
    accepted_highway_len: f64,
    /// Quantised points where a segment was split — always classified as
    /// crossings.
    junctions: FxHashSet<(i64, i64)>,
}

impl RoadGrowth {
    pub fn new(config: &CityConfig) -> Self {
        Self {
            cfg: config.road.clone(),
            queue: ProposalQueue::new(),
            seeded: false,
            accepted_highway_len: 0.0,
            junctions: FxHashSet::default(),
        }
    }

    /// Enqueue the seed pair: two proposals leaving `origin` in opposing
    /// directions at `t = 0`, highway when a backbone budget is configured.
    pub fn seed(&mut self, origin: Point) {
        let highway = self.cfg.highway_length > 0.0;
        let length = self.proposal_length(highway);
        for angle in [0.0, 180.0] {
            let end = origin + unit_vector(angle) * length;
            self.queue.enqueue(Segment::with_meta(
                origin,
                end,
                SegmentMeta { highway, t: 0.0 },
            ));
        }
        self.seeded = true;
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// `true` once the queue has drained or the cap is reached.
    pub fn is_done(&self, roads: &RoadManager) -> bool {
        self.queue.is_empty() || roads.len() >= self.cfg.segment_cap
    }

    /// Pop and process one proposal.
    pub fn step(&mut self, roads: &mut RoadManager, rng: &mut GenRng) -> CityResult<StepOutcome> {
        if roads.len() >= self.cfg.segment_cap {
            return Ok(StepOutcome::Exhausted);
        }
        let Some(proposal) = self.queue.dequeue() else {
            return Ok(StepOutcome::Exhausted);
        };

        // Non-finite geometry is a hard failure; a degenerate zero-length
        // proposal (possible after aggressive truncation upstream) is just a
        // rejection.
        if !proposal.start.is_finite() || !proposal.end.is_finite() {
            proposal.validate()?;
        }

        match self.check_local_constraints(&proposal, roads, None) {
            LocalOutcome::Reject(reason) => {
                debug!("proposal rejected ({reason}): {} -> {}", proposal.start, proposal.end);
                Ok(StepOutcome::Rejected)
            }
            LocalOutcome::Accept { segment, severed } => {
                self.accept(segment, severed, roads, rng)?;
                Ok(StepOutcome::Accepted)
            }
            LocalOutcome::Split { proposal, crossed, at } => {
                self.apply_split(crossed, at, roads)?;
                // A split termination is always severed.
                self.accept(proposal, true, roads, rng)?;
                Ok(StepOutcome::Accepted)
            }
        }
    }

    /// Add an accepted segment and, unless severed, enqueue its global goals.
    fn accept(
        &mut self,
        segment: Segment,
        severed: bool,
        roads: &mut RoadManager,
        rng: &mut GenRng,
    ) -> CityResult<SegmentId> {
        if segment.meta.highway {
            self.accepted_highway_len += segment.length();
        }
        let id = roads.add(segment)?;
        if !severed {
            for goal in self.global_goals(&segment, rng) {
                self.queue.enqueue(goal);
            }
        }
        Ok(id)
    }

    /// Split `crossed` at `at`, preserving its metadata on both halves.
    pub(crate) fn apply_split(
        &mut self,
        crossed: SegmentId,
        at: Point,
        roads: &mut RoadManager,
    ) -> CityResult<()> {
        let old = *roads.get(crossed).ok_or(CityError::SegmentNotFound(crossed))?;
        roads.update(crossed, Segment::with_meta(old.start, at, old.meta))?;
        roads.add(Segment::with_meta(at, old.end, old.meta))?;
        self.junctions.insert(at.key());
        Ok(())
    }

    // ── Local constraints ─────────────────────────────────────────────────

    /// The merge/snap/intersect/parallel/crowding pass.  `exclude` skips one
    /// existing segment (used when re-validating a modified road against
    /// everything else).
    pub(crate) fn check_local_constraints(
        &self,
        proposal: &Segment,
        roads: &RoadManager,
        exclude: Option<SegmentId>,
    ) -> LocalOutcome {
        let mut proposal = *proposal;

        // 1. Length sanity and snap-to-grid orientation.
        let length = proposal.length();
        if length < self.cfg.min_length {
            return LocalOutcome::Reject("below minimum length");
        }
        let angle = proposal.angle();
        let grid = normalize_deg((angle / 90.0).round() * 90.0);
        let grid_dev = min_degree_difference(angle, grid);
        if grid_dev > f64::EPSILON && grid_dev < self.cfg.snap_angle_deg {
            proposal.end = proposal.start + unit_vector(grid) * length;
        }

        let candidates = {
            let mut c = roads.candidates(&proposal.aabb(self.cfg.snap_distance));
            if let Some(skip) = exclude {
                c.retain(|&id| id != skip);
            }
            c
        };

        // 2. Proper intersections with existing segments: take the crossing
        //    closest to the proposal's start.
        let mut severed = false;
        let mut closest: Option<(Point, f64, SegmentId)> = None;
        for &id in &candidates {
            let Some(other) = roads.get(id) else { continue };
            if let Some((point, e)) = segment_intersection(
                proposal.start,
                proposal.end,
                other.start,
                other.end,
                INTERSECT_BUFFER,
            ) {
                if closest.is_none_or(|(_, best_e, _)| e < best_e) {
                    closest = Some((point, e, id));
                }
            }
        }
        if let Some((point, e, id)) = closest {
            if e >= NEAR_END_E {
                // Crossing near the far end: pull the endpoint back onto the
                // crossed segment and keep going through the later checks.
                proposal.end = point;
                severed = true;
            } else {
                proposal.end = point;
                if proposal.start == proposal.end {
                    return LocalOutcome::Reject("degenerate after truncation");
                }
                return LocalOutcome::Split { proposal, crossed: id, at: point };
            }
        }

        // 3. Endpoint snapping onto a nearby existing vertex.
        if let Some(vertex) = self.nearby_endpoint(proposal.end, roads, &candidates) {
            proposal.end = vertex;
            severed = true;
        }
        if proposal.start == proposal.end {
            return LocalOutcome::Reject("degenerate after snapping");
        }

        // 4. Near-parallel segment with overlapping projection inside the
        //    minimum lateral clearance.
        let angle = proposal.angle();
        for &id in &candidates {
            let Some(other) = roads.get(id) else { continue };
            if min_degree_difference(angle, other.angle()) >= PARALLEL_EPS_DEG {
                continue;
            }
            if self.laterally_crowded(&proposal, other) {
                return LocalOutcome::Reject("parallel within minimum distance");
            }
        }

        // 5. Angle crowding at the start vertex.
        let outgoing = proposal.angle();
        for incident in self.incident_angles(proposal.start, roads, &candidates) {
            if angle_difference(outgoing, incident) < self.cfg.min_angle_between_deg {
                return LocalOutcome::Reject("crowded angle at start vertex");
            }
        }

        // Snapping moved the endpoint after the intersection scan; make sure
        // the adjusted geometry still crosses nothing.
        if severed {
            for &id in &candidates {
                let Some(other) = roads.get(id) else { continue };
                if segment_intersection(
                    proposal.start,
                    proposal.end,
                    other.start,
                    other.end,
                    INTERSECT_BUFFER,
                )
                .is_some()
                {
                    return LocalOutcome::Reject("crossing introduced by snap");
                }
            }
        }

        LocalOutcome::Accept { segment: proposal, severed }
    }

    /// Closest existing endpoint within `merge_distance` of `point`, looking
    /// at both accepted candidates and still-queued proposals.
    fn nearby_endpoint(
        &self,
        point: Point,
        roads: &RoadManager,
        candidates: &[SegmentId],
    ) -> Option<Point> {
        let mut best: Option<(f64, Point)> = None;
        let mut consider = |vertex: Point| {
            let d = point.distance(vertex);
            if d > 0.0 && d < self.cfg.merge_distance && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, vertex));
            }
        };
        for &id in candidates {
            if let Some(seg) = roads.get(id) {
                consider(seg.start);
                consider(seg.end);
            }
        }
        for seg in self.queue.iter() {
            consider(seg.start);
            consider(seg.end);
        }
        best.map(|(_, vertex)| vertex)
    }

    /// Whether two near-parallel segments run alongside each other closer
    /// than the lateral minimum.  The overlapping-projection requirement
    /// keeps end-to-end continuations (which project outside `(0, 1)`) legal.
    fn laterally_crowded(&self, proposal: &Segment, other: &Segment) -> bool {
        let pairs = [
            (proposal.midpoint(), other.start, other.end),
            (other.midpoint(), proposal.start, proposal.end),
        ];
        for (mid, start, end) in pairs {
            let t = projection_parameter(mid, start, end);
            if t > 0.0
                && t < 1.0
                && point_segment_distance(mid, start, end) < self.cfg.parallel_min_distance
            {
                return true;
            }
        }
        false
    }

    /// Outgoing orientations of every segment (accepted or queued) incident
    /// at `vertex` within the merge tolerance.
    fn incident_angles(
        &self,
        vertex: Point,
        roads: &RoadManager,
        candidates: &[SegmentId],
    ) -> Vec<f64> {
        let mut angles = Vec::new();
        let mut consider = |seg: &Segment| {
            if seg.start.distance(vertex) < self.cfg.merge_distance {
                angles.push(seg.angle());
            } else if seg.end.distance(vertex) < self.cfg.merge_distance {
                angles.push(normalize_deg(seg.angle() + 180.0));
            }
        };
        for &id in candidates {
            if let Some(seg) = roads.get(id) {
                consider(seg);
            }
        }
        for seg in self.queue.iter() {
            consider(seg);
        }
        angles
    }

    // ── Global goals ──────────────────────────────────────────────────────

    /// New proposals spawned from an accepted segment's far endpoint.
    fn global_goals(&self, parent: &Segment, rng: &mut GenRng) -> Vec<Segment> {
        let mut goals = Vec::new();
        let base = parent.angle();

        // Straight continuation.  Highways continue unconditionally while
        // the backbone budget lasts, then demote to streets; streets roll
        // against the continuation weight.
        if parent.meta.highway {
            let still_highway = self.accepted_highway_len < self.cfg.highway_length;
            let angle = base + rng.jitter(self.cfg.continuation_jitter_deg);
            goals.push(self.spawn(parent, angle, still_highway));
        } else if rng.gen_bool(self.cfg.continuation_probability) {
            let angle = base + rng.jitter(self.cfg.continuation_jitter_deg);
            goals.push(self.spawn(parent, angle, false));
        }

        // Left/right street branches.
        let branch_p = if parent.meta.highway {
            self.cfg.highway_branch_probability
        } else {
            self.cfg.branch_probability
        };
        for turn in [90.0, -90.0] {
            if rng.gen_bool(branch_p) {
                let angle = base + turn + rng.jitter(self.cfg.continuation_jitter_deg);
                goals.push(self.spawn(parent, angle, false));
            }
        }
        goals
    }

    /// One child proposal leaving `parent.end` at `angle`.
    fn spawn(&self, parent: &Segment, angle: f64, highway: bool) -> Segment {
        let angle = normalize_deg(angle);
        let end = parent.end + unit_vector(angle) * self.proposal_length(highway);
        let deviation = min_degree_difference(parent.angle(), angle);
        Segment::with_meta(
            parent.end,
            end,
            SegmentMeta {
                highway,
                t: parent.meta.t + 1.0 + deviation / STRAIGHTNESS_PENALTY_DIV,
            },
        )
    }

    fn proposal_length(&self, highway: bool) -> f64 {
        if highway {
            self.cfg.segment_length * self.cfg.highway_length_factor
        } else {
            self.cfg.segment_length
        }
    }

    // ── Intersection collection ───────────────────────────────────────────

    /// Collect every shared endpoint among alive segments, with incidence
    /// lists and the crossing classification (3+ distinct outgoing
    /// orientations, or a junction produced by splitting).
    pub fn collect_intersections(&self, roads: &RoadManager) -> Vec<Intersection> {
        let mut incidence: FxHashMap<(i64, i64), (Point, Vec<SegmentId>)> = FxHashMap::default();
        for (id, seg) in roads.iter() {
            for point in [seg.start, seg.end] {
                incidence
                    .entry(point.key())
                    .or_insert_with(|| (point, Vec::new()))
                    .1
                    .push(id);
            }
        }

        // Hash iteration order is arbitrary; sort by quantised key so the
        // collected list (and everything exported from it) is stable.
        let mut entries: Vec<((i64, i64), Point, Vec<SegmentId>)> = incidence
            .into_iter()
            .filter(|(_, (_, ids))| ids.len() >= 2)
            .map(|(key, (point, ids))| (key, point, ids))
            .collect();
        entries.sort_unstable_by_key(|(key, _, _)| *key);

        entries
            .into_iter()
            .map(|(key, point, mut ids)| {
                ids.sort_unstable();
                let crossing = self.junctions.contains(&key)
                    || distinct_orientations(point, &ids, roads) >= 3;
                Intersection { point, segments: ids, crossing }
            })
            .collect()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn unit_vector(angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(rad.cos(), rad.sin())
}

/// Number of distinct outgoing orientations (1° clusters) at `point`.
fn distinct_orientations(point: Point, ids: &[SegmentId], roads: &RoadManager) -> usize {
    let mut angles: Vec<f64> = ids
        .iter()
        .filter_map(|&id| roads.get(id))
        .map(|seg| {
            if seg.start == point {
                seg.angle()
            } else {
                normalize_deg(seg.angle() + 180.0)
            }
        })
        .collect();
    angles.sort_unstable_by(f64::total_cmp);
    let mut distinct = 0;
    let mut last: Option<f64> = None;
    for a in angles {
        if last.is_none_or(|l| (a - l).abs() > ORIENTATION_EPS_DEG) {
            distinct += 1;
            last = Some(a);
        }
    }
    distinct
}
