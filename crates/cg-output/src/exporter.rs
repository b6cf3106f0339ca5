//! The exporter: snapshot a completed (or in-progress) generation into the
//! five JSON documents.
//!
//! Iteration over the managers is insertion-ordered, so repeated exports of
//! the same generation are byte-identical — callers diff output directories
//! to detect regressions.

use std::fs;
use std::path::Path;

use serde::Serialize;

use cg_city::CityGenerator;
use cg_core::ElementOwner;

use crate::records::{
    BuildingRec, BuildingsDoc, ElementRec, ElementsDoc, OwnerRec, RoadRec, RoadsDoc, RouteRec,
    RoutesDoc,
};
use crate::world::{building_node, element_node, road_node, BaseMapRec, WorldDoc};
use crate::OutputResult;

/// Borrow-only exporter over a generator snapshot.
pub struct CityExporter<'a> {
    city: &'a CityGenerator,
}

impl<'a> CityExporter<'a> {
    pub fn new(city: &'a CityGenerator) -> Self {
        Self { city }
    }

    // ── Document construction ─────────────────────────────────────────────

    pub fn roads_doc(&self) -> RoadsDoc {
        RoadsDoc {
            roads: self
                .city
                .roads()
                .iter()
                .map(|(_, s)| RoadRec {
                    start: s.start.into(),
                    end: s.end.into(),
                    is_highway: s.meta.highway,
                })
                .collect(),
        }
    }

    pub fn buildings_doc(&self) -> BuildingsDoc {
        BuildingsDoc {
            buildings: self
                .city
                .buildings()
                .iter()
                .map(|b| BuildingRec {
                    center: b.center.into(),
                    rotation: b.rotation,
                    kind: b.kind.name.clone(),
                    bounds: b.bounds.into(),
                })
                .collect(),
        }
    }

    pub fn elements_doc(&self) -> ElementsDoc {
        ElementsDoc {
            elements: self
                .city
                .elements()
                .iter()
                .map(|e| ElementRec {
                    center: e.center.into(),
                    rotation: e.rotation,
                    kind: e.kind.name.clone(),
                    bounds: e.bounds.into(),
                    owner: Some(match e.owner {
                        ElementOwner::Road(id) => OwnerRec { kind: "road".into(), id: id.0 },
                        ElementOwner::Building(id) => {
                            OwnerRec { kind: "building".into(), id: id.0 }
                        }
                    }),
                })
                .collect(),
        }
    }

    pub fn routes_doc(&self) -> RoutesDoc {
        RoutesDoc {
            routes: self
                .city
                .routes()
                .iter()
                .map(|r| RouteRec {
                    start: r.start.into(),
                    end: r.end.into(),
                    points: r.points.iter().map(|&p| p.into()).collect(),
                })
                .collect(),
        }
    }

    pub fn world_doc(&self) -> WorldDoc {
        let bounds = self.city.config().quadtree.bounds;
        let mut nodes = Vec::new();
        for (_, segment) in self.city.roads().iter() {
            nodes.push(road_node(segment, nodes.len()));
        }
        for building in self.city.buildings().iter() {
            nodes.push(building_node(building, nodes.len()));
        }
        for element in self.city.elements().iter() {
            nodes.push(element_node(element, nodes.len()));
        }
        WorldDoc {
            base_map: BaseMapRec {
                name: "map_1".to_owned(),
                env_bin: "gym_citynav\\Binaries\\Win64\\gym_citynav.exe".to_owned(),
                width: bounds.width,
                height: bounds.height,
            },
            nodes,
        }
    }

    // ── JSON strings ──────────────────────────────────────────────────────

    pub fn roads_json(&self) -> OutputResult<String> {
        to_pretty(&self.roads_doc())
    }

    pub fn buildings_json(&self) -> OutputResult<String> {
        to_pretty(&self.buildings_doc())
    }

    pub fn elements_json(&self) -> OutputResult<String> {
        to_pretty(&self.elements_doc())
    }

    pub fn routes_json(&self) -> OutputResult<String> {
        to_pretty(&self.routes_doc())
    }

    pub fn world_json(&self) -> OutputResult<String> {
        to_pretty(&self.world_doc())
    }

    // ── Filesystem ────────────────────────────────────────────────────────

    /// Write all five documents into `dir`, creating it if needed.
    pub fn export_all(&self, dir: &Path) -> OutputResult<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join("roads.json"), self.roads_json()?)?;
        fs::write(dir.join("buildings.json"), self.buildings_json()?)?;
        fs::write(dir.join("elements.json"), self.elements_json()?)?;
        fs::write(dir.join("routes.json"), self.routes_json()?)?;
        fs::write(dir.join("progen_world.json"), self.world_json()?)?;
        Ok(())
    }
}

/// 2-space-indented JSON, trailing newline included so files diff cleanly.
fn to_pretty<T: Serialize>(doc: &T) -> OutputResult<String> {
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    Ok(text)
}
