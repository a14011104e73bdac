use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::approx_eq;
use crate::geom::{Point3, Tolerance, Vec3};
use crate::ring::{
    LABEL_FONT_SIZE, Marker, Rgb, RingConfig, SegmentPlacement, SegmentSpec, allocate_arcs,
    build_connector, connector_curve,
};

fn placement_at(center_angle: f64) -> SegmentPlacement {
    SegmentPlacement {
        index: 0,
        start_angle: center_angle - 0.5,
        arc_length: 1.0,
        center_angle,
        radius: 0.75,
        anchor_point: Point3::on_circle(1.05, center_angle, 0.1),
        color: Rgb::VIOLET,
        progress: 0.75,
        label: None,
    }
}

fn assert_point_eq(actual: Point3, expected: Point3) {
    assert!(
        Tolerance::DEFAULT.approx_eq_point3(actual, expected),
        "{actual:?} != {expected:?}"
    );
}

#[test]
fn control_polygon_follows_the_outward_direction() {
    let placement = placement_at(FRAC_PI_2);
    let connector = build_connector(&placement, 0.5);
    let anchor = placement.anchor_point;

    assert_eq!(connector.start, anchor);
    assert_point_eq(connector.end, Point3::new(anchor.x, anchor.y + 0.75, anchor.z));
    assert_point_eq(connector.control, Point3::new(anchor.x, anchor.y + 0.4, anchor.z + 0.25));
}

#[test]
fn free_curve_matches_built_connector() {
    let placement = placement_at(2.4);
    let connector = build_connector(&placement, 0.3);
    let curve = connector_curve(placement.anchor_point, placement.center_angle, 0.3);
    assert_eq!(connector.curve(), curve);
}

#[test]
fn marker_frame_faces_outward_with_world_up() {
    let placement = placement_at(FRAC_PI_4);
    let connector = build_connector(&placement, 0.5);
    let transform = connector.marker.transform;
    let outward = Vec3::radial(FRAC_PI_4);

    assert!((transform.axis(2) - outward).length() < 1e-12);
    assert!((transform.axis(1) - Vec3::Z).length() < 1e-12);
    assert!((transform.axis(0).cross(transform.axis(1)) - transform.axis(2)).length() < 1e-12);
    assert_point_eq(transform.apply_point(Point3::ORIGIN), connector.end);

    assert_eq!(connector.marker.radius, Marker::RADIUS);
    assert_eq!(connector.marker.length, Marker::LENGTH);
}

#[test]
fn label_sits_past_the_marker() {
    let placement = placement_at(1.0);
    let connector = build_connector(&placement, 0.5);

    assert_eq!(connector.label_text, "75%");
    assert_eq!(connector.label_font_size, LABEL_FONT_SIZE);
    assert_point_eq(connector.label_position, connector.end + Vec3::radial(1.0) * 0.15);
    assert_eq!(connector.color, Rgb::VIOLET);

    let named = SegmentPlacement {
        label: Some("cache".to_string()),
        ..placement
    };
    assert_eq!(build_connector(&named, 0.5).label_text, "cache");
}

#[test]
fn samples_start_and_end_on_the_curve_and_rise() {
    let connector = build_connector(&placement_at(3.0), 0.5);
    let points = connector.sample(16);

    assert_eq!(points.len(), 17);
    assert_point_eq(points[0], connector.start);
    assert_point_eq(points[16], connector.end);
    for p in &points[1..16] {
        assert!(p.z > connector.start.z);
    }
}

#[test]
fn length_lies_between_chord_and_control_polygon() {
    let connector = build_connector(&placement_at(0.3), 0.5);
    let chord = connector.start.distance_to(connector.end);
    let polygon =
        connector.start.distance_to(connector.control) + connector.control.distance_to(connector.end);
    let length = connector.length();

    assert!(approx_eq(chord, 0.75, 1e-12));
    assert!(length > chord && length < polygon);
}

#[test]
fn one_connector_per_allocated_segment() {
    let config = RingConfig::default();
    let specs = vec![
        SegmentSpec::new(0.6, Rgb::CORAL),
        SegmentSpec::new(0.4, Rgb::PLUM).with_label("rest"),
    ];
    let placements = allocate_arcs(&specs, &config.gap_spec(), &config).unwrap();

    for placement in &placements {
        let connector = build_connector(placement, config.connector_length);
        assert_eq!(connector.index, placement.index);
        assert_eq!(connector.start, placement.anchor_point);
        let end_radius = connector.end.planar_radius();
        assert!(approx_eq(end_radius, config.outer_radius() + 0.75, 1e-12));
    }
}
