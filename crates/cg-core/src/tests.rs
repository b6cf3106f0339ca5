//! Unit tests for cg-core primitives.

#[cfg(test)]
mod ids {
    use crate::{BuildingId, NodeId, SegmentId};

    #[test]
    fn index_roundtrip() {
        let id = SegmentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(SegmentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(SegmentId(0) < SegmentId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(SegmentId::INVALID.0, u32::MAX);
        assert_eq!(BuildingId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(SegmentId(7).to_string(), "SegmentId(7)");
    }
}

#[cfg(test)]
mod points {
    use crate::Point;

    #[test]
    fn jitter_below_quantum_compares_equal() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(10.000004, 19.999996);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn distinct_points_differ() {
        assert_ne!(Point::new(0.0, 0.0), Point::new(0.001, 0.0));
    }

    #[test]
    fn vector_ops() {
        let a = Point::new(3.0, 4.0);
        assert!((a.length() - 5.0).abs() < 1e-9);
        assert_eq!(a + Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        assert_eq!(a - Point::new(3.0, 4.0), Point::ZERO);
        assert!((a.normalize().length() - 1.0).abs() < 1e-9);
        assert!(a.dot(a.perp()).abs() < 1e-9);
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = Point::new(1.0, 0.0);
        let r = p.rotate_about(Point::ZERO, 90.0);
        assert_eq!(r, Point::new(0.0, 1.0));
    }

    #[test]
    fn lerp_endpoints_and_middle() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 10.0));
    }
}

#[cfg(test)]
mod angles {
    use crate::geom::{angle_between, angle_difference, min_degree_difference, normalize_deg};
    use crate::Point;

    #[test]
    fn normalization() {
        assert!((normalize_deg(-90.0) - 270.0).abs() < 1e-9);
        assert!((normalize_deg(720.0)).abs() < 1e-9);
    }

    #[test]
    fn between_orthogonal_vectors() {
        let d = angle_between(Point::new(1.0, 0.0), Point::new(0.0, 1.0));
        assert!((d - 90.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_mod_180() {
        // 10° and 190° are the same road orientation.
        assert!(min_degree_difference(10.0, 190.0) < 1e-9);
        assert!((min_degree_difference(0.0, 90.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn difference_mod_360() {
        assert!((angle_difference(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angle_difference(0.0, 180.0) - 180.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod intersection {
    use crate::geom::{point_segment_distance, segment_intersection};
    use crate::Point;

    #[test]
    fn perpendicular_cross_found() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(400.0, 0.0),
            Point::new(200.0, -200.0),
            Point::new(200.0, 200.0),
            0.001,
        );
        let (p, e) = hit.expect("segments cross");
        assert_eq!(p, Point::new(200.0, 0.0));
        assert!((e - 0.5).abs() < 1e-9);
    }

    #[test]
    fn endpoint_touch_suppressed_by_buffer() {
        // The vertical segment starts exactly on the horizontal one — a
        // T-junction, not a crossing.
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(400.0, 0.0),
            Point::new(200.0, 0.0),
            Point::new(200.0, 200.0),
            0.001,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn parallel_returns_none() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(100.0, 10.0),
            0.001,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn point_to_segment() {
        let d = point_segment_distance(
            Point::new(50.0, 30.0),
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        );
        assert!((d - 30.0).abs() < 1e-9);
        // Beyond the end, distance goes to the endpoint.
        let d = point_segment_distance(
            Point::new(130.0, 40.0),
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        );
        assert!((d - 50.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod directions {
    use crate::{Direction8, Point};

    #[test]
    fn cardinal_sectors() {
        let o = Point::ZERO;
        assert_eq!(Direction8::from_points(o, Point::new(10.0, 0.0)), Direction8::East);
        assert_eq!(Direction8::from_points(o, Point::new(0.0, 10.0)), Direction8::North);
        assert_eq!(Direction8::from_points(o, Point::new(-10.0, 0.0)), Direction8::West);
        assert_eq!(Direction8::from_points(o, Point::new(0.0, -10.0)), Direction8::South);
    }

    #[test]
    fn diagonal_sectors() {
        let o = Point::ZERO;
        assert_eq!(Direction8::from_points(o, Point::new(10.0, 10.0)), Direction8::NorthEast);
        assert_eq!(Direction8::from_points(o, Point::new(-10.0, -10.0)), Direction8::SouthWest);
    }
}

#[cfg(test)]
mod bounds {
    use crate::{Bounds, Point};

    #[test]
    fn center_and_inflate() {
        let b = Bounds::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(b.center(), Point::new(5.0, 10.0));
        let i = b.inflate(5.0);
        assert_eq!(i.center(), b.center());
        assert!((i.width - 20.0).abs() < 1e-9);
        assert!((i.height - 30.0).abs() < 1e-9);
    }

    #[test]
    fn aabb_overlap() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects_aabb(&Bounds::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects_aabb(&Bounds::new(20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn obb_overlap_axis_aligned() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(8.0, 8.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&Bounds::new(11.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn obb_overlap_requires_rotation_awareness() {
        // A thin bar rotated 45° misses a box its AABB would hit.
        let bar = Bounds::with_rotation(0.0, 4.0, 20.0, 2.0, 45.0);
        let far_corner = Bounds::new(16.0, -4.0, 3.0, 3.0);
        assert!(bar.index_envelope().intersects_aabb(&far_corner.index_envelope()));
        assert!(!bar.overlaps(&far_corner));
    }

    #[test]
    fn rotated_45_squares_touching_corners_do_overlap() {
        let a = Bounds::with_rotation(0.0, 0.0, 10.0, 10.0, 45.0);
        let b = Bounds::new(2.0, 2.0, 6.0, 6.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn contains_point_rotated() {
        let b = Bounds::with_rotation(-10.0, -2.0, 20.0, 4.0, 90.0);
        // After rotation the bar is vertical: (0, 8) is inside, (8, 0) is not.
        assert!(b.contains_point(Point::new(0.0, 8.0)));
        assert!(!b.contains_point(Point::new(8.0, 0.0)));
    }

    #[test]
    fn index_envelope_covers_rotation() {
        // Sweep through the worst case: a thin bar's corners reach the
        // half-diagonal, slightly beyond max(width, height) / 2.
        for rotation in [5.0, 30.0, 45.0, 354.3] {
            let b = Bounds::with_rotation(0.0, 0.0, 20.0, 2.0, rotation);
            let env = b.index_envelope();
            for corner in b.corners() {
                assert!(
                    env.contains_point(corner),
                    "corner {corner} escapes envelope {env:?} at {rotation}°"
                );
            }
        }
    }
}

#[cfg(test)]
mod segments {
    use crate::{Point, Segment};

    #[test]
    fn angle_and_length() {
        let s = Segment::new(Point::ZERO, Point::new(0.0, 50.0));
        assert!((s.angle() - 90.0).abs() < 1e-9);
        assert!((s.length() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn aabb_inflation() {
        let s = Segment::new(Point::ZERO, Point::new(100.0, 0.0));
        let b = s.aabb(10.0);
        assert!((b.x + 10.0).abs() < 1e-9);
        assert!((b.width - 120.0).abs() < 1e-9);
        assert!((b.height - 20.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_degenerate() {
        assert!(Segment::new(Point::ZERO, Point::ZERO).validate().is_err());
        assert!(Segment::new(Point::new(f64::NAN, 0.0), Point::new(1.0, 0.0))
            .validate()
            .is_err());
        assert!(Segment::new(Point::ZERO, Point::new(1.0, 0.0)).validate().is_ok());
    }
}

#[cfg(test)]
mod config {
    use crate::CityConfig;

    #[test]
    fn defaults_validate() {
        assert!(CityConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let cfg = CityConfig::from_json_str(
            r#"{ "citygen": { "seed": 7, "road": { "segment_cap": 200 } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.road.segment_cap, 200);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.quadtree.max_objects, 10);
        assert!((cfg.road.merge_distance - 15.0).abs() < 1e-9);
    }

    #[test]
    fn zero_max_objects_rejected() {
        let err = CityConfig::from_json_str(
            r#"{ "citygen": { "quadtree": { "max_objects": 0 } } }"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn negative_bounds_rejected() {
        let err = CityConfig::from_json_str(
            r#"{ "citygen": { "quadtree": { "bounds": { "x": 0, "y": 0, "width": -5, "height": 10 } } } }"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn inverted_route_range_rejected() {
        let err = CityConfig::from_json_str(
            r#"{ "citygen": { "route": { "min_points_per_route": 9, "max_points_per_route": 2 } } }"#,
        );
        assert!(err.is_err());
    }
}
