//! The `progen_world.json` descriptor consumed by the engine bridge.
//!
//! A flat node list: every road, building, and element becomes one node with
//! a stable id `GEN_<Type>_<n>` (`n` is the node's position in the list) and
//! a transform.  World units are centimetres on the engine side, so every
//! coordinate is multiplied by 100; values are rounded to 4 decimals to keep
//! diffs clean.

use serde::{Deserialize, Serialize};

use cg_core::{Building, Element, Segment};

/// Engine scale denominator for road meshes: the base road asset is 20 000
/// engine units long.
const ROAD_MESH_LENGTH: f64 = 20_000.0;

// ── Record shapes ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseMapRec {
    pub name: String,
    pub env_bin: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationRec {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationRec {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleRec {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodePropertiesRec {
    pub location: LocationRec,
    pub orientation: OrientationRec,
    pub scale: ScaleRec,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldNodeRec {
    pub id: String,
    pub instance_name: String,
    pub properties: NodePropertiesRec,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldDoc {
    pub base_map: BaseMapRec,
    pub nodes: Vec<WorldNodeRec>,
}

// ── Node constructors ─────────────────────────────────────────────────────────

pub(crate) fn road_node(segment: &Segment, position: usize) -> WorldNodeRec {
    let center = segment.midpoint();
    let scale_x = segment.length() * 100.0 / ROAD_MESH_LENGTH;
    WorldNodeRec {
        id: format!("GEN_Road_{position}"),
        instance_name: "BP_Road1_C".to_owned(),
        properties: NodePropertiesRec {
            location: LocationRec {
                x: round4(center.x * 100.0),
                y: round4(center.y * 100.0),
                z: 0.0,
            },
            orientation: OrientationRec {
                pitch: 0.0,
                yaw: round4(segment.angle()),
                roll: 0.0,
            },
            scale: ScaleRec {
                x: round4(scale_x * 0.95),
                y: round4(1.0 * 0.9),
                z: 1.0,
            },
        },
    }
}

pub(crate) fn building_node(building: &Building, position: usize) -> WorldNodeRec {
    WorldNodeRec {
        id: format!("GEN_{}_{position}", building.kind.name),
        instance_name: building.kind.name.clone(),
        properties: NodePropertiesRec {
            location: LocationRec {
                x: round4(building.center.x * 100.0),
                y: round4(building.center.y * 100.0),
                z: 0.0,
            },
            orientation: OrientationRec {
                pitch: 0.0,
                yaw: round4(building.rotation),
                roll: 0.0,
            },
            scale: ScaleRec { x: 1.0, y: 1.0, z: 1.0 },
        },
    }
}

pub(crate) fn element_node(element: &Element, position: usize) -> WorldNodeRec {
    WorldNodeRec {
        id: format!("GEN_{}_{position}", element.kind.name),
        instance_name: element.kind.name.clone(),
        properties: NodePropertiesRec {
            location: LocationRec {
                x: round4(element.center.x * 100.0),
                y: round4(element.center.y * 100.0),
                z: 0.0,
            },
            orientation: OrientationRec {
                pitch: 0.0,
                yaw: round4(element.rotation),
                roll: 0.0,
            },
            scale: ScaleRec { x: 1.0, y: 1.0, z: 1.0 },
        },
    }
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
