//! Unit tests for cg-output.
//!
//! Exporter tests drive a small real generation (no-growth config plus the
//! edit API) so documents have content without depending on large runs.

#[cfg(test)]
mod helpers {
    use cg_city::CityGenerator;
    use cg_core::{CityConfig, Point};

    /// A small complete city: one street with buildings, elements, routes,
    /// and a graph.
    pub fn small_city(seed: u64) -> CityGenerator {
        let mut cfg = CityConfig::default();
        cfg.road.segment_cap = 0;
        cfg.seed = seed;
        let mut city = CityGenerator::new(cfg).unwrap();
        city.add_road(Point::new(0.0, 0.0), Point::new(800.0, 0.0))
            .unwrap();
        city.generate().unwrap();
        city
    }

    /// A full stochastic run for determinism checks.
    pub fn grown_city(seed: u64) -> CityGenerator {
        let mut cfg = CityConfig::default();
        cfg.seed = seed;
        cfg.road.segment_cap = 50;
        let mut city = CityGenerator::new(cfg).unwrap();
        city.generate().unwrap();
        city
    }
}

#[cfg(test)]
mod documents {
    use crate::CityExporter;

    #[test]
    fn roads_doc_preserves_order_and_flags() {
        let city = super::helpers::small_city(3);
        let doc = CityExporter::new(&city).roads_doc();
        assert_eq!(doc.roads.len(), city.roads().len());
        assert!(!doc.roads[0].is_highway, "edit-API roads are streets");
    }

    #[test]
    fn json_is_two_space_indented_with_stable_keys() {
        let city = super::helpers::small_city(3);
        let json = CityExporter::new(&city).roads_json().unwrap();
        assert!(json.starts_with("{\n  \"roads\": ["));
        // Key order inside a record follows struct declaration order.
        let start_idx = json.find("\"start\"").unwrap();
        let end_idx = json.find("\"end\"").unwrap();
        let flag_idx = json.find("\"is_highway\"").unwrap();
        assert!(start_idx < end_idx && end_idx < flag_idx);
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn buildings_doc_round_numbers_survive_serde() {
        let city = super::helpers::small_city(3);
        let exporter = CityExporter::new(&city);
        let doc = exporter.buildings_doc();
        assert_eq!(doc.buildings.len(), city.buildings().len());
        for (rec, building) in doc.buildings.iter().zip(city.buildings().iter()) {
            assert_eq!(rec.kind, building.kind.name);
            assert!((rec.center.x - building.center.x).abs() < 1e-12);
            assert!((rec.bounds.rotation - building.rotation).abs() < 1e-12);
        }
    }

    #[test]
    fn elements_doc_carries_owner_attribution() {
        let city = super::helpers::small_city(3);
        let doc = CityExporter::new(&city).elements_doc();
        assert!(!doc.elements.is_empty(), "verge elements line the street");
        for rec in &doc.elements {
            let owner = rec.owner.as_ref().expect("exporter always attributes");
            assert!(owner.kind == "road" || owner.kind == "building");
        }
    }
}

#[cfg(test)]
mod world {
    use crate::CityExporter;

    #[test]
    fn node_ids_match_list_positions() {
        let city = super::helpers::small_city(3);
        let doc = CityExporter::new(&city).world_doc();
        assert!(!doc.nodes.is_empty());
        for (i, node) in doc.nodes.iter().enumerate() {
            assert!(
                node.id.starts_with("GEN_") && node.id.ends_with(&format!("_{i}")),
                "id {} does not encode position {i}",
                node.id
            );
        }
        assert!(doc.nodes[0].id.starts_with("GEN_Road_"), "roads come first");
    }

    #[test]
    fn coordinates_are_scaled_to_centimetres() {
        let city = super::helpers::small_city(3);
        let doc = CityExporter::new(&city).world_doc();
        // The single road runs (0,0) -> (800,0): centre (400,0) -> 40000 cm.
        let road = &doc.nodes[0];
        assert!((road.properties.location.x - 40_000.0).abs() < 1e-6);
        assert!((road.properties.location.y).abs() < 1e-6);
        // Scale: 800 units * 100 / 20000 * 0.95.
        assert!((road.properties.scale.x - 3.8).abs() < 1e-9);
        assert!((road.properties.scale.y - 0.9).abs() < 1e-9);
    }

    #[test]
    fn base_map_reflects_world_bounds() {
        let city = super::helpers::small_city(3);
        let doc = CityExporter::new(&city).world_doc();
        assert_eq!(doc.base_map.name, "map_1");
        assert!((doc.base_map.width - 2000.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod determinism {
    use crate::CityExporter;

    /// S5: one seed, two full runs, byte-identical world documents.
    #[test]
    fn identical_seeds_export_identical_bytes() {
        let a = super::helpers::grown_city(7);
        let b = super::helpers::grown_city(7);
        let ea = CityExporter::new(&a);
        let eb = CityExporter::new(&b);

        assert_eq!(ea.world_json().unwrap(), eb.world_json().unwrap());
        assert_eq!(ea.roads_json().unwrap(), eb.roads_json().unwrap());
        assert_eq!(ea.buildings_json().unwrap(), eb.buildings_json().unwrap());
        assert_eq!(ea.elements_json().unwrap(), eb.elements_json().unwrap());
        assert_eq!(ea.routes_json().unwrap(), eb.routes_json().unwrap());
    }

    /// S6: re-exporting the same snapshot never changes a byte.
    #[test]
    fn repeated_export_is_stable() {
        let city = super::helpers::grown_city(7);
        let exporter = CityExporter::new(&city);
        assert_eq!(exporter.world_json().unwrap(), exporter.world_json().unwrap());
        assert_eq!(exporter.roads_json().unwrap(), exporter.roads_json().unwrap());
    }
}

#[cfg(test)]
mod round_trip {
    use cg_core::ElementOwner;

    use crate::{CityExporter, CityReader};

    /// Property 9: written files load back into the same ordered sets.
    #[test]
    fn export_then_read_reproduces_collections() {
        let city = super::helpers::small_city(5);
        let dir = tempfile::tempdir().unwrap();
        CityExporter::new(&city).export_all(dir.path()).unwrap();

        let reader = CityReader::new(dir.path());

        let roads = reader.read_roads().unwrap();
        let originals: Vec<_> = city.roads().iter().map(|(_, s)| *s).collect();
        assert_eq!(roads.len(), originals.len());
        for (loaded, original) in roads.iter().zip(&originals) {
            assert_eq!(loaded.start, original.start);
            assert_eq!(loaded.end, original.end);
            assert_eq!(loaded.meta.highway, original.meta.highway);
        }

        let buildings = reader.read_buildings().unwrap();
        assert_eq!(buildings.len(), city.buildings().len());
        for (loaded, original) in buildings.iter().zip(city.buildings().iter()) {
            assert_eq!(loaded.center, original.center);
            assert_eq!(loaded.kind.name, original.kind.name);
        }

        let elements = reader.read_elements().unwrap();
        assert_eq!(elements.len(), city.elements().len());
        for (loaded, original) in elements.iter().zip(city.elements().iter()) {
            assert_eq!(loaded.center, original.center);
            assert_eq!(loaded.kind.name, original.kind.name);
            match (loaded.owner, original.owner) {
                (ElementOwner::Road(a), ElementOwner::Road(b)) => assert_eq!(a, b),
                (ElementOwner::Building(a), ElementOwner::Building(b)) => assert_eq!(a, b),
                (a, b) => panic!("owner mismatch: {a:?} vs {b:?}"),
            }
        }

        let routes = reader.read_routes().unwrap();
        assert_eq!(routes.len(), city.routes().len());
        for (loaded, original) in routes.iter().zip(city.routes().iter()) {
            assert_eq!(loaded.points.len(), original.points.len());
            assert_eq!(loaded.start, original.start);
            assert_eq!(loaded.end, original.end);
        }
    }

    #[test]
    fn export_creates_all_five_files() {
        let city = super::helpers::small_city(5);
        let dir = tempfile::tempdir().unwrap();
        CityExporter::new(&city).export_all(dir.path()).unwrap();

        for file in [
            "roads.json",
            "buildings.json",
            "elements.json",
            "routes.json",
            "progen_world.json",
        ] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
    }
}
