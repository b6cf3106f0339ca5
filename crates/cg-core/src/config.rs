//! Typed configuration for a generation run.
//!
//! The on-disk shape is a JSON document with a single top-level `citygen`
//! key whose sections mirror the structs below, e.g.:
//!
//! ```json
//! {
//!   "citygen": {
//!     "seed": 7,
//!     "quadtree": { "bounds": { "x": -1000, "y": -1000, "width": 2000, "height": 2000 } },
//!     "road": { "segment_cap": 200 }
//!   }
//! }
//! ```
//!
//! Every field has a default, so partial documents (or none at all) are
//! valid input.  [`CityConfig::validate`] runs at generator construction and
//! fails fast on nonsensical values; nothing downstream re-checks.

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::entity::{BuildingType, ElementType};
use crate::error::{CoreError, CoreResult};

// ── Top level ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    pub quadtree: QuadtreeConfig,
    pub road: RoadConfig,
    pub building: BuildingConfig,
    pub element: ElementConfig,
    pub route: RouteConfig,
    pub graph: GraphConfig,
    /// Directory the exporter writes into.
    pub output_dir: String,
    /// Master RNG seed.  The same seed always produces identical output.
    pub seed: u64,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            quadtree: QuadtreeConfig::default(),
            road: RoadConfig::default(),
            building: BuildingConfig::default(),
            element: ElementConfig::default(),
            route: RouteConfig::default(),
            graph: GraphConfig::default(),
            output_dir: "output".to_owned(),
            seed: 42,
        }
    }
}

/// On-disk wrapper: everything lives under a single `citygen` key.
#[derive(Default, Serialize, Deserialize)]
struct ConfigDoc {
    #[serde(default)]
    citygen: CityConfig,
}

impl CityConfig {
    /// Parse from a JSON document with the `citygen` top-level key.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let doc: ConfigDoc =
            serde_json::from_str(json).map_err(|e| CoreError::Parse(e.to_string()))?;
        doc.citygen.validate()?;
        Ok(doc.citygen)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &std::path::Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Fail fast on values the generator cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        let b = &self.quadtree.bounds;
        if !b.is_finite() || b.width <= 0.0 || b.height <= 0.0 {
            return Err(CoreError::Config(format!(
                "quadtree bounds must be finite with positive extent, got {b:?}"
            )));
        }
        if self.quadtree.max_objects == 0 {
            return Err(CoreError::Config("quadtree.max_objects must be >= 1".into()));
        }
        if self.quadtree.max_levels == 0 {
            return Err(CoreError::Config("quadtree.max_levels must be >= 1".into()));
        }
        if self.road.min_length <= 0.0 || self.road.segment_length < self.road.min_length {
            return Err(CoreError::Config(format!(
                "road lengths invalid: min_length {} segment_length {}",
                self.road.min_length, self.road.segment_length
            )));
        }
        if self.building.required_types.is_empty() && self.building.optional_types.is_empty() {
            return Err(CoreError::Config(
                "at least one building type (required or optional) must be configured".into(),
            ));
        }
        if self.building.frontage_stride <= 0.0 {
            return Err(CoreError::Config("building.frontage_stride must be positive".into()));
        }
        if self.building.stride_jitter < 0.0
            || self.building.stride_jitter >= self.building.frontage_stride
        {
            return Err(CoreError::Config(format!(
                "building.stride_jitter {} must be in [0, frontage_stride)",
                self.building.stride_jitter
            )));
        }
        if self.element.types.is_empty() {
            return Err(CoreError::Config("at least one element type must be configured".into()));
        }
        if self.element.road_element_spacing <= 0.0 {
            return Err(CoreError::Config("element.road_element_spacing must be positive".into()));
        }
        if self.route.min_points_per_route == 0
            || self.route.min_points_per_route > self.route.max_points_per_route
        {
            return Err(CoreError::Config(format!(
                "route points range invalid: [{}, {}]",
                self.route.min_points_per_route, self.route.max_points_per_route
            )));
        }
        if self.graph.sidewalk_offset <= 0.0 {
            return Err(CoreError::Config("graph.sidewalk_offset must be positive".into()));
        }
        Ok(())
    }
}

// ── Quadtree ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeConfig {
    /// World AABB seeding every spatial index.
    pub bounds: Bounds,
    /// A node splits once it holds more than this many items…
    pub max_objects: usize,
    /// …unless it is already at this depth.
    pub max_levels: usize,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(-1000.0, -1000.0, 2000.0, 2000.0),
            max_objects: 10,
            max_levels: 4,
        }
    }
}

// ── Roads ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Stop growing once this many segments are accepted.
    pub segment_cap: usize,
    /// Cumulative highway length after which continuations demote to streets.
    /// Zero disables the highway backbone entirely.
    pub highway_length: f64,
    /// Nominal street segment length; highways multiply by
    /// `highway_length_factor`.
    pub segment_length: f64,
    pub highway_length_factor: f64,
    /// Probability of a left (and independently, right) street branch.
    pub branch_probability: f64,
    /// Branch probability while growing highway — lower, so the backbone
    /// runs long before the street grid fills in.
    pub highway_branch_probability: f64,
    /// Probability a street spawns a straight continuation.
    pub continuation_probability: f64,
    /// Uniform angular jitter applied to continuations and branches.
    pub continuation_jitter_deg: f64,
    /// Proposals shorter than this are rejected outright.
    pub min_length: f64,
    /// Orientations within this of a 90° grid angle snap onto it.
    pub snap_angle_deg: f64,
    /// Minimum angle between segments meeting at a shared endpoint.
    pub min_angle_between_deg: f64,
    /// Lateral clearance below which a near-parallel proposal is rejected.
    pub parallel_min_distance: f64,
    /// Endpoints closer than this merge into a shared vertex.
    pub merge_distance: f64,
    /// Inflation applied to segment AABBs in the road quadtree.
    pub snap_distance: f64,
    /// Carriageway width used for safety rectangles and export scaling.
    pub road_width: f64,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            segment_cap: 400,
            highway_length: 3000.0,
            segment_length: 100.0,
            highway_length_factor: 1.5,
            branch_probability: 0.08,
            highway_branch_probability: 0.02,
            continuation_probability: 0.85,
            continuation_jitter_deg: 3.0,
            min_length: 20.0,
            snap_angle_deg: 10.0,
            min_angle_between_deg: 30.0,
            parallel_min_distance: 30.0,
            merge_distance: 15.0,
            snap_distance: 30.0,
            road_width: 12.0,
        }
    }
}

// ── Buildings ─────────────────────────────────────────────────────────────────

/// One building category as configured (the `is_required` flag comes from
/// which list the entry sits in).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildingTypeConfig {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingConfig {
    /// Minimum clearance between two building OBBs.
    pub building_building_distance: f64,
    /// Minimum clearance between a building OBB and a road rectangle.
    pub road_building_distance: f64,
    /// Distance between successive frontage positions along a segment.
    pub frontage_stride: f64,
    /// Uniform jitter applied to each stride.
    pub stride_jitter: f64,
    /// Categories that must each be placed at least once when space permits.
    pub required_types: Vec<BuildingTypeConfig>,
    pub optional_types: Vec<BuildingTypeConfig>,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            building_building_distance: 10.0,
            road_building_distance: 10.0,
            frontage_stride: 60.0,
            stride_jitter: 10.0,
            required_types: vec![
                BuildingTypeConfig { name: "House".into(), width: 40.0, height: 30.0 },
                BuildingTypeConfig { name: "Shop".into(), width: 60.0, height: 40.0 },
            ],
            optional_types: vec![
                BuildingTypeConfig { name: "Office".into(), width: 50.0, height: 50.0 },
                BuildingTypeConfig { name: "Restaurant".into(), width: 45.0, height: 35.0 },
            ],
        }
    }
}

impl BuildingConfig {
    /// The full palette with `is_required` resolved, required types first.
    pub fn building_types(&self) -> Vec<BuildingType> {
        let required = self.required_types.iter().map(|t| BuildingType {
            name: t.name.clone(),
            width: t.width,
            height: t.height,
            is_required: true,
        });
        let optional = self.optional_types.iter().map(|t| BuildingType {
            name: t.name.clone(),
            width: t.width,
            height: t.height,
            is_required: false,
        });
        required.chain(optional).collect()
    }
}

// ── Elements ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementTypeConfig {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Minimum clearance between two elements.
    pub element_element_distance: f64,
    /// Outward offset of around-building elements from the building OBB.
    pub element_building_distance: f64,
    /// Spacing between roadside element positions along a segment.
    pub road_element_spacing: f64,
    /// Upper bound of elements proposed around each building.
    pub elements_per_building: usize,
    pub types: Vec<ElementTypeConfig>,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            element_element_distance: 5.0,
            element_building_distance: 3.0,
            road_element_spacing: 40.0,
            elements_per_building: 2,
            types: vec![
                ElementTypeConfig { name: "Lamp".into(), width: 2.0, height: 2.0 },
                ElementTypeConfig { name: "Sign".into(), width: 2.0, height: 2.0 },
                ElementTypeConfig { name: "Tree".into(), width: 4.0, height: 4.0 },
                ElementTypeConfig { name: "Bench".into(), width: 3.0, height: 2.0 },
            ],
        }
    }
}

impl ElementConfig {
    pub fn element_types(&self) -> Vec<ElementType> {
        self.types
            .iter()
            .map(|t| ElementType { name: t.name.clone(), width: t.width, height: t.height })
            .collect()
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub min_points_per_route: usize,
    pub max_points_per_route: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { min_points_per_route: 2, max_points_per_route: 5 }
    }
}

// ── Derived graph ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Lateral and longitudinal offset of sidewalk-ring corners from the
    /// road segment.
    pub sidewalk_offset: f64,
    /// Extra slack on top of `2 * sidewalk_offset` when connecting nodes of
    /// adjacent roads.
    pub connect_slack: f64,
    /// Subdivide long ring edges with interpolated walk nodes.  Off by
    /// default: consumers that count edge hops between ring corners expect
    /// the coarse graph.
    pub interpolate: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { sidewalk_offset: 8.0, connect_slack: 1.0, interpolate: false }
    }
}
