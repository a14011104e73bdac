//! Arc allocation: weighted segments plus a gap become angular placements.
//!
//! The circle is shared out as follows. Every segment is followed by one gap
//! of `adjusted_gap` radians, the remaining `2π - N * adjusted_gap` is the
//! budget, and each segment takes `budget * progress` of it. The first
//! segment starts after one gap, so the last one ends exactly on `2π` when the
//! fractions sum to 1.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::geom::{Point3, Tolerance, Vec3};

use super::{FractionPolicy, GapSpec, RingConfig, RingError, Rgb, SegmentSpec};

/// Where one segment sits on the ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPlacement {
    /// Position of the segment in the input list.
    pub index: usize,
    pub start_angle: f64,
    /// Angular extent in radians.
    pub arc_length: f64,
    pub center_angle: f64,
    /// Centre-line radius of this segment, after jitter.
    pub radius: f64,
    /// Outer edge, mid-arc, on the top face.
    pub anchor_point: Point3,
    pub color: Rgb,
    pub progress: f64,
    pub label: Option<String>,
}

impl SegmentPlacement {
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.arc_length
    }

    /// Unit vector from the ring axis through the middle of the arc.
    #[must_use]
    pub fn outward(&self) -> Vec3 {
        Vec3::radial(self.center_angle)
    }

    #[must_use]
    pub fn label_text(&self) -> String {
        super::segment::label_text(self.label.as_deref(), self.progress)
    }
}

/// Lays `segments` out around the circle in input order.
///
/// Returns an empty list for an empty input. Dimension, gap and fraction
/// problems are reported before anything is placed.
pub fn allocate_arcs(
    segments: &[SegmentSpec],
    gap: &GapSpec,
    config: &RingConfig,
) -> Result<Vec<SegmentPlacement>, RingError> {
    config.validate()?;
    gap.validate()?;

    if segments.is_empty() {
        return Ok(Vec::new());
    }
    check_fractions(segments, config.fraction_policy)?;

    let count = segments.len();
    let adjusted_gap = gap.adjusted_angle();
    let gap_total = adjusted_gap * count as f64;
    if gap_total >= TAU {
        return Err(RingError::GapExceedsCircle {
            gap_total,
            segment_count: count,
        });
    }
    let budget = TAU - gap_total;

    let mut jitter = config.jitter.map(|j| (j, j.rng()));
    let half_thickness = config.radial_thickness / 2.0;
    let anchor_z = config.section_height() / 2.0;

    let mut angle = adjusted_gap;
    let placements = segments
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let arc_length = budget * spec.progress;
            let center_angle = angle + arc_length / 2.0;

            let radius = match jitter.as_mut() {
                Some((settings, rng)) => {
                    jittered_radius(config.radius, settings.offset(rng), half_thickness, index)
                }
                None => config.radius,
            };
            let anchor_point = Point3::on_circle(radius + half_thickness, center_angle, anchor_z);

            let placement = SegmentPlacement {
                index,
                start_angle: angle,
                arc_length,
                center_angle,
                radius,
                anchor_point,
                color: spec.color,
                progress: spec.progress,
                label: spec.label.clone(),
            };
            angle += arc_length + adjusted_gap;
            placement
        })
        .collect();

    Ok(placements)
}

fn check_fractions(segments: &[SegmentSpec], policy: FractionPolicy) -> Result<(), RingError> {
    for (index, spec) in segments.iter().enumerate() {
        if !spec.progress.is_finite() || !(0.0..=1.0).contains(&spec.progress) {
            return Err(RingError::InvalidFraction {
                index,
                value: spec.progress,
            });
        }
    }

    let sum: f64 = segments.iter().map(|s| s.progress).sum();
    if sum > 1.0 + Tolerance::LOOSE.eps {
        match policy {
            FractionPolicy::Accept => {
                log::warn!("segment fractions sum to {sum}; segments will overrun the circle");
            }
            FractionPolicy::Reject => return Err(RingError::FractionsExceedBudget { sum }),
        }
    }
    Ok(())
}

/// Keeps the jittered tube clear of the ring axis.
fn jittered_radius(base: f64, offset: f64, half_thickness: f64, index: usize) -> f64 {
    let radius = base + offset;
    if radius - half_thickness > 0.0 {
        radius
    } else {
        log::warn!("jitter would collapse the inner radius of segment {index}; using the base radius");
        base
    }
}
