use std::f64::consts::TAU;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::approx_eq;
use crate::ring::{
    FractionPolicy, GapSpec, RadiusJitter, Rgb, RingConfig, RingError, SectionProfile, SegmentSpec,
    allocate_arcs, default_segments, random_segments,
};

fn spec(progress: f64) -> SegmentSpec {
    SegmentSpec::new(progress, Rgb::CHARCOAL)
}

#[test]
fn two_segment_scenario_matches_hand_arithmetic() {
    let gap = GapSpec::new(0.04, 1.05, 0.45);
    let placements = allocate_arcs(&default_segments(), &gap, &RingConfig::default()).unwrap();

    let adjusted = (0.04 / 1.05 + 0.04 / 0.45) / 2.0;
    let budget = TAU - 2.0 * adjusted;
    assert!(approx_eq(adjusted, 0.063_492, 1e-6));
    assert!(approx_eq(budget, 6.156_201, 1e-6));

    assert_eq!(placements.len(), 2);
    let (first, second) = (&placements[0], &placements[1]);

    assert!(approx_eq(first.start_angle, adjusted, 1e-12));
    assert!(approx_eq(first.arc_length, budget * 0.75, 1e-12));
    assert!(approx_eq(first.end_angle(), 4.680_643, 1e-5));

    assert!(approx_eq(second.start_angle, 4.744_135, 1e-5));
    assert!(approx_eq(second.end_angle(), TAU, 1e-9));
    assert!(approx_eq(second.arc_length, budget * 0.25, 1e-12));
}

#[test]
fn placements_are_disjoint_and_cover_the_circle() {
    let mut rng = StdRng::seed_from_u64(2024);
    let gap = GapSpec::new(0.05, 1.2, 0.6);

    for count in [1, 2, 3, 7, 16] {
        let specs = random_segments(count, &mut rng);
        let placements = allocate_arcs(&specs, &gap, &RingConfig::default()).unwrap();
        assert_eq!(placements.len(), count);

        let adjusted = gap.adjusted_angle();
        let arcs: f64 = placements.iter().map(|p| p.arc_length).sum();
        assert!(
            approx_eq(arcs + adjusted * count as f64, TAU, 1e-9),
            "count {count}: arcs {arcs} do not close the circle"
        );

        for pair in placements.windows(2) {
            assert!(pair[0].end_angle() < pair[1].start_angle);
            assert!(approx_eq(pair[0].end_angle() + adjusted, pair[1].start_angle, 1e-12));
        }
        for (i, placement) in placements.iter().enumerate() {
            assert_eq!(placement.index, i);
            assert!(approx_eq(
                placement.center_angle,
                placement.start_angle + placement.arc_length / 2.0,
                1e-12
            ));
        }
    }
}

#[test]
fn single_full_segment_without_gap_covers_everything() {
    let placements = allocate_arcs(&[spec(1.0)], &GapSpec::none(), &RingConfig::default()).unwrap();
    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].start_angle, 0.0);
    assert!(approx_eq(placements[0].arc_length, TAU, 1e-12));
}

#[test]
fn empty_input_gives_no_placements() {
    let placements = allocate_arcs(&[], &GapSpec::none(), &RingConfig::default()).unwrap();
    assert!(placements.is_empty());
}

#[test]
fn order_and_payload_follow_input() {
    let specs = vec![
        SegmentSpec::new(0.2, Rgb::CORAL).with_label("disk"),
        SegmentSpec::new(0.5, Rgb::PLUM),
        SegmentSpec::new(0.3, Rgb::SLATE).with_label("net"),
    ];
    let placements = allocate_arcs(&specs, &GapSpec::none(), &RingConfig::default()).unwrap();

    for (spec, placement) in specs.iter().zip(&placements) {
        assert_eq!(placement.color, spec.color);
        assert_eq!(placement.progress, spec.progress);
        assert_eq!(placement.label, spec.label);
    }
    assert_eq!(placements[1].label_text(), "50%");
    assert_eq!(placements[2].label_text(), "net");
}

#[test]
fn anchor_sits_on_outer_edge_of_top_face() {
    let config = RingConfig::default();
    let placements = allocate_arcs(&default_segments(), &config.gap_spec(), &config).unwrap();

    for placement in &placements {
        let anchor = placement.anchor_point;
        assert!(approx_eq(anchor.planar_radius(), config.outer_radius(), 1e-12));
        assert!(approx_eq(anchor.z, config.height / 2.0, 1e-12));
        assert!(approx_eq(anchor.y.atan2(anchor.x).rem_euclid(TAU), placement.center_angle, 1e-9));
    }
}

#[test]
fn square_profile_anchor_sits_on_its_taller_top_face() {
    let config = RingConfig {
        profile: SectionProfile::Square,
        ..RingConfig::default()
    };
    let placements = allocate_arcs(&default_segments(), &config.gap_spec(), &config).unwrap();

    for placement in &placements {
        let anchor = placement.anchor_point;
        assert!(approx_eq(anchor.planar_radius(), config.outer_radius(), 1e-12));
        assert!(approx_eq(anchor.z, config.radial_thickness / 2.0, 1e-12));
    }
}

#[test]
fn zero_fraction_is_placed_with_zero_length() {
    let placements = allocate_arcs(
        &[spec(0.5), spec(0.0), spec(0.5)],
        &GapSpec::new(0.1, 1.0, 1.0),
        &RingConfig::default(),
    )
    .unwrap();

    assert_eq!(placements[1].arc_length, 0.0);
    assert!(approx_eq(
        placements[1].start_angle,
        placements[0].end_angle() + 0.1,
        1e-12
    ));
}

#[test]
fn oversized_gap_is_a_configuration_error() {
    let specs = vec![spec(0.25); 4];
    let result = allocate_arcs(&specs, &GapSpec::new(2.0, 1.0, 1.0), &RingConfig::default());
    assert!(matches!(
        result,
        Err(RingError::GapExceedsCircle {
            segment_count: 4,
            ..
        })
    ));

    // Exactly 2π of gaps leaves nothing either.
    let exact = GapSpec::new(TAU / 4.0, 1.0, 1.0);
    assert!(allocate_arcs(&specs, &exact, &RingConfig::default()).is_err());
}

#[test]
fn fractions_outside_unit_interval_are_rejected() {
    let gap = GapSpec::none();
    let config = RingConfig::default();

    assert_eq!(
        allocate_arcs(&[spec(0.5), spec(1.5)], &gap, &config),
        Err(RingError::InvalidFraction {
            index: 1,
            value: 1.5
        })
    );
    assert!(matches!(
        allocate_arcs(&[spec(-0.1)], &gap, &config),
        Err(RingError::InvalidFraction { index: 0, .. })
    ));
    assert!(allocate_arcs(&[spec(f64::NAN)], &gap, &config).is_err());
}

#[test]
fn overshooting_fractions_follow_the_policy() {
    let specs = [spec(0.7), spec(0.6)];
    let gap = GapSpec::none();

    let accepted = allocate_arcs(&specs, &gap, &RingConfig::default()).unwrap();
    assert!(accepted[1].end_angle() > TAU);

    let strict = RingConfig {
        fraction_policy: FractionPolicy::Reject,
        ..RingConfig::default()
    };
    assert!(matches!(
        allocate_arcs(&specs, &gap, &strict),
        Err(RingError::FractionsExceedBudget { .. })
    ));

    // Float noise on an exact split is not an overshoot.
    let thirds = [spec(1.0 / 3.0), spec(1.0 / 3.0), spec(1.0 / 3.0)];
    assert!(allocate_arcs(&thirds, &gap, &strict).is_ok());
}

#[test]
fn invalid_dimensions_fail_before_layout() {
    let config = RingConfig {
        radius: 0.2,
        radial_thickness: 0.5,
        ..RingConfig::default()
    };
    assert!(matches!(
        allocate_arcs(&default_segments(), &GapSpec::none(), &config),
        Err(RingError::DegenerateInnerRadius { .. })
    ));
    assert_eq!(
        allocate_arcs(&default_segments(), &GapSpec::new(0.1, -1.0, 1.0), &RingConfig::default()),
        Err(RingError::InvalidGap)
    );
}

#[test]
fn seeded_jitter_is_repeatable_and_bounded() {
    let config = RingConfig {
        jitter: Some(RadiusJitter::seeded(0.25, 77)),
        ..RingConfig::default()
    };
    let specs = vec![spec(0.125); 8];

    let a = allocate_arcs(&specs, &config.gap_spec(), &config).unwrap();
    let b = allocate_arcs(&specs, &config.gap_spec(), &config).unwrap();
    assert_eq!(a, b);

    assert!(a.iter().any(|p| p.radius != config.radius));
    for placement in &a {
        assert!((placement.radius - config.radius).abs() <= 0.125);
        assert!(approx_eq(
            placement.anchor_point.planar_radius(),
            placement.radius + config.radial_thickness / 2.0,
            1e-12
        ));
    }
}

#[test]
fn jitter_never_collapses_the_inner_radius() {
    // Inner radius 0.05 with offsets up to 0.5 either way.
    let config = RingConfig {
        radius: 0.35,
        radial_thickness: 0.6,
        jitter: Some(RadiusJitter::seeded(1.0, 5)),
        ..RingConfig::default()
    };
    let placements = allocate_arcs(&vec![spec(0.05); 20], &GapSpec::none(), &config).unwrap();
    for placement in &placements {
        assert!(placement.radius - config.radial_thickness / 2.0 > 0.0);
    }
}
