//! Load exported documents back into core types.
//!
//! Used by round-trip verification and by external tooling that re-ingests a
//! generated city.  Order is preserved exactly as written; ids are
//! re-assigned sequentially from the file order (which matches the original
//! placement order by construction).

use std::fs;
use std::path::{Path, PathBuf};

use cg_core::{
    Building, BuildingId, BuildingType, Element, ElementId, ElementOwner, ElementType, Point,
    Route, RouteId, Segment, SegmentId, SegmentMeta,
};

use crate::records::{BuildingsDoc, ElementsDoc, RoadsDoc, RoutesDoc};
use crate::OutputResult;

/// Reads the four entity documents from an export directory.
pub struct CityReader {
    dir: PathBuf,
}

impl CityReader {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }

    pub fn read_roads(&self) -> OutputResult<Vec<Segment>> {
        let doc: RoadsDoc = self.read_doc("roads.json")?;
        Ok(doc
            .roads
            .into_iter()
            .map(|r| {
                Segment::with_meta(
                    r.start.into(),
                    r.end.into(),
                    SegmentMeta { highway: r.is_highway, t: 0.0 },
                )
            })
            .collect())
    }

    pub fn read_buildings(&self) -> OutputResult<Vec<Building>> {
        let doc: BuildingsDoc = self.read_doc("buildings.json")?;
        Ok(doc
            .buildings
            .into_iter()
            .enumerate()
            .map(|(i, b)| {
                let kind = BuildingType {
                    name: b.kind,
                    width: b.bounds.width,
                    height: b.bounds.height,
                    is_required: false,
                };
                Building::new(BuildingId(i as u32), kind, b.bounds.into())
            })
            .collect())
    }

    pub fn read_elements(&self) -> OutputResult<Vec<Element>> {
        let doc: ElementsDoc = self.read_doc("elements.json")?;
        Ok(doc
            .elements
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                let kind = ElementType {
                    name: e.kind,
                    width: e.bounds.width,
                    height: e.bounds.height,
                };
                let owner = match e.owner {
                    Some(o) if o.kind == "building" => {
                        ElementOwner::Building(BuildingId(o.id))
                    }
                    Some(o) => ElementOwner::Road(SegmentId(o.id)),
                    // Files from tools that drop attribution still load.
                    None => ElementOwner::Road(SegmentId::INVALID),
                };
                Element::new(ElementId(i as u32), kind, e.bounds.into(), owner)
            })
            .collect())
    }

    pub fn read_routes(&self) -> OutputResult<Vec<Route>> {
        let doc: RoutesDoc = self.read_doc("routes.json")?;
        Ok(doc
            .routes
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let points: Vec<Point> = r.points.into_iter().map(Into::into).collect();
                Route::new(RouteId(i as u32), points)
            })
            .collect())
    }

    fn read_doc<T: serde::de::DeserializeOwned>(&self, file: &str) -> OutputResult<T> {
        let text = fs::read_to_string(self.dir.join(file))?;
        Ok(serde_json::from_str(&text)?)
    }
}
