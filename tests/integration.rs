use std::f64::consts::{FRAC_PI_2, TAU};

use ring_engine::RingEngine;
use ring_engine::geom::{Curve3, Point3};
use ring_engine::ring::{
    FractionPolicy, RadiusJitter, RingAssembly, RingConfig, RingError, SectionParams, SegmentSpec,
    assemble_ring, mesh_ring_section,
};

fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

fn preview_config() -> RingConfig {
    RingConfig {
        angular_segments: 24,
        edge_segments: 3,
        ..RingConfig::default()
    }
}

#[test]
fn json_inputs_drive_the_whole_pipeline() {
    let config: RingConfig = serde_json::from_str(
        r#"{"radius": 1.0, "radial_thickness": 0.3, "height": 0.1,
            "angular_segments": 8, "edge_segments": 2, "gap": 0.05}"#,
    )
    .expect("config json");
    let segments: Vec<SegmentSpec> = serde_json::from_str(
        r##"[{"progress": 0.6, "color": "#ff4040", "label": "used"},
             {"progressFraction": 0.4, "color": [0.2, 0.2, 0.2]}]"##,
    )
    .expect("segments json");

    let set = assemble_ring(&segments, &config).expect("ring");
    assert_eq!(set.len(), 2);
    assert_eq!(set.annotations[0].label_text, "used");
    assert_eq!(set.annotations[1].label_text, "40%");

    let export = serde_json::to_value(set.export()).expect("export json");
    assert_eq!(export["segments"][0]["color_hex"], "#ff4040");
    assert_eq!(
        export["segments"][0]["positions"].as_array().map(Vec::len),
        Some(9 * 4 * 3 * 3)
    );
    assert_eq!(
        export["segments"][1]["indices"].as_array().map(Vec::len),
        Some(8 * 4 * 2 * 2 * 3)
    );
}

#[test]
fn physical_gap_scenario_through_the_assembly() {
    // A gap fraction of 0.04 / 1.05 on the default ring is a 0.04 arc on the outer edge.
    let config = RingConfig {
        gap: 0.04 / 1.05,
        ..preview_config()
    };
    let segments = ring_engine::ring::default_segments();
    let set = assemble_ring(&segments, &config).expect("ring");

    let starts: Vec<f64> = set.placements.iter().map(|p| p.start_angle).collect();
    let ends: Vec<f64> = set.placements.iter().map(|p| p.end_angle()).collect();
    assert!(approx_eq(starts[0], 0.063_492, 1e-6));
    assert!(approx_eq(ends[0], 4.680_643, 1e-6));
    assert!(approx_eq(starts[1], 4.744_135, 1e-6));
    assert!(approx_eq(ends[1], TAU, 1e-9));
}

#[test]
fn single_segment_closes_the_ring() {
    let config = RingConfig {
        gap: 0.0,
        ..preview_config()
    };
    let set = assemble_ring(&[SegmentSpec::new(1.0, Default::default())], &config).expect("ring");
    let placement = &set.placements[0];
    assert_eq!(placement.start_angle, 0.0);
    assert!(approx_eq(placement.arc_length, TAU, 1e-12));

    // First and last cross-sections coincide.
    let mesh = &set.meshes[0].mesh;
    let stride = 4 * (config.edge_segments + 1);
    let last = config.angular_segments * stride;
    for k in 0..stride {
        let a = mesh.position(k).expect("first section");
        let b = mesh.position(last + k).expect("last section");
        assert!(a.distance_to(b) < 1e-12);
    }
}

#[test]
fn quarter_arc_section_scenario() {
    let params = SectionParams {
        radius: 1.0,
        radial_thickness: 0.3,
        height: 0.2,
        angular_segments: 4,
        start_angle: 0.0,
        arc_length: FRAC_PI_2,
        edge_segments: 1,
    };
    let (mesh, diagnostics) = mesh_ring_section(&params);
    assert_eq!(mesh.vertex_count(), 40);
    assert_eq!(mesh.triangle_count(), 32);
    assert_eq!(diagnostics.open_edge_count, 8 * (4 + 1));
    assert!(diagnostics.is_manifold());
}

#[test]
fn recompute_twice_gives_identical_exports() {
    let config = RingConfig {
        jitter: Some(RadiusJitter::seeded(0.25, 99)),
        ..preview_config()
    };
    let segments = vec![
        SegmentSpec::new(0.5, Default::default()),
        SegmentSpec::new(0.3, Default::default()),
        SegmentSpec::new(0.2, Default::default()),
    ];
    let assembly = RingAssembly::new(config).expect("valid config");

    let first = serde_json::to_string(&assembly.recompute(&segments).expect("ring").export())
        .expect("json");
    let second = serde_json::to_string(&assembly.recompute(&segments).expect("ring").export())
        .expect("json");
    assert_eq!(first, second);
}

#[test]
fn strict_policy_refuses_overfull_rings() {
    let config = RingConfig {
        fraction_policy: FractionPolicy::Reject,
        ..preview_config()
    };
    let segments = vec![SegmentSpec::new(0.8, Default::default()); 2];
    assert!(matches!(
        assemble_ring(&segments, &config),
        Err(RingError::FractionsExceedBudget { sum }) if approx_eq(sum, 1.6, 1e-12)
    ));
}

#[test]
fn connector_curve_bends_up_and_out() {
    let set = assemble_ring(&ring_engine::ring::default_segments(), &preview_config()).expect("ring");
    for (placement, connector) in set.placements.iter().zip(&set.annotations) {
        let mid = connector.curve().point_at(0.5);
        assert!(mid.z > placement.anchor_point.z);
        assert!(mid.planar_radius() > placement.anchor_point.planar_radius());
        assert!(connector.end.planar_radius() > mid.planar_radius());
    }
}

#[test]
fn native_engine_swaps_render_sets() {
    let mut engine = RingEngine::new();
    engine.replace_config(preview_config()).expect("config");
    engine.recompute().expect("recompute");
    let first_anchor: Point3 = engine.render_set().expect("set").placements[0].anchor_point;

    engine.replace_segments(vec![SegmentSpec::new(0.5, Default::default())]);
    assert!(engine.is_dirty());
    engine.recompute().expect("recompute");
    let set = engine.render_set().expect("set");
    assert_eq!(set.len(), 1);
    assert_ne!(set.placements[0].anchor_point, first_anchor);
}
