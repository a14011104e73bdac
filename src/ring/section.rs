//! Cross-section extrusion: sweeps a rectangular tube profile along an arc.
//!
//! The detailed profile has four edges (top, outer wall, bottom, inner wall),
//! each sampled at `edge_segments + 1` points and walked counter-clockwise
//! when seen along the sweep direction. Corners are duplicated per edge so
//! every face keeps its own flat normal under smooth shading.
//!
//! Vertex `j` of edge `e` at angular step `i` lives at
//! `i * 4 * (E + 1) + e * (E + 1) + j`.

use crate::geom::{DegenerateInput, Mesh, MeshDiagnostics, RingMetrics, TimingBucket, finalize_mesh};

use super::{RingConfig, SegmentPlacement};

/// Edges of the rectangular cross-section.
pub const PROFILE_EDGES: usize = 4;

/// Corners per angular step of the coarse square profile.
const SQUARE_CORNERS: usize = 4;

/// Everything the mesher needs for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionParams {
    pub radius: f64,
    pub radial_thickness: f64,
    pub height: f64,
    pub angular_segments: usize,
    pub start_angle: f64,
    pub arc_length: f64,
    pub edge_segments: usize,
}

impl SectionParams {
    /// Parameters for `placement`, using the placement's (possibly jittered)
    /// radius.
    #[must_use]
    pub fn for_placement(placement: &SegmentPlacement, config: &RingConfig) -> Self {
        Self {
            radius: placement.radius,
            radial_thickness: config.radial_thickness,
            height: config.section_height(),
            angular_segments: config.angular_segments,
            start_angle: placement.start_angle,
            arc_length: placement.arc_length,
            edge_segments: config.edge_segments,
        }
    }

    /// `(S + 1) * 4 * (E + 1)`, or `None` when it does not fit in `usize`.
    #[must_use]
    pub fn vertex_count(&self) -> Option<usize> {
        self.angular_segments
            .checked_add(1)?
            .checked_mul(PROFILE_EDGES)?
            .checked_mul(self.edge_segments.checked_add(1)?)
    }

    /// `S * 4 * E * 2`, or `None` when it does not fit in `usize`.
    #[must_use]
    pub fn triangle_count(&self) -> Option<usize> {
        self.angular_segments
            .checked_mul(PROFILE_EDGES * 2)?
            .checked_mul(self.edge_segments)
    }

    fn degenerate_reason(&self, needs_edge_segments: bool) -> Option<DegenerateInput> {
        let values = [
            self.radius,
            self.radial_thickness,
            self.height,
            self.start_angle,
            self.arc_length,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Some(DegenerateInput::NonFiniteInput);
        }
        if self.angular_segments < 1 || (needs_edge_segments && self.edge_segments < 1) {
            return Some(DegenerateInput::NoSubdivisions);
        }
        if self.arc_length <= 0.0 {
            return Some(DegenerateInput::ZeroLengthArc);
        }
        None
    }

    fn angle_at(&self, step: usize) -> f64 {
        self.start_angle + step as f64 * self.arc_length / self.angular_segments as f64
    }
}

/// Builds the detailed tube mesh for one segment.
///
/// Degenerate parameters give an empty mesh; the reason is in the returned
/// diagnostics.
#[must_use]
pub fn mesh_ring_section(params: &SectionParams) -> (Mesh, MeshDiagnostics) {
    let mut metrics = RingMetrics::default();
    metrics.begin();
    let (mesh, mut diagnostics) = mesh_ring_section_with_metrics(params, &mut metrics);
    diagnostics.timing = metrics.end();
    (mesh, diagnostics)
}

fn mesh_ring_section_with_metrics(
    params: &SectionParams,
    metrics: &mut RingMetrics,
) -> (Mesh, MeshDiagnostics) {
    if let Some(reason) = params.degenerate_reason(true) {
        return skipped(reason);
    }
    let (Some(vertex_count), Some(triangle_count)) = (
        params.vertex_count().and_then(index_range),
        params.triangle_count(),
    ) else {
        return skipped(DegenerateInput::IndexOverflow);
    };

    let edge_points = params.edge_segments + 1;
    let stride = PROFILE_EDGES * edge_points;

    let (positions, indices) = metrics.time(TimingBucket::Meshing, || {
        let profile = rectangular_profile(params);
        let positions = sweep_profile(params, &profile);
        debug_assert_eq!(positions.len(), vertex_count as usize);

        let mut indices = Vec::with_capacity(triangle_count * 3);
        for step in 0..params.angular_segments {
            let base = step * stride;
            for edge in 0..PROFILE_EDGES {
                for j in 0..params.edge_segments {
                    let current = (base + edge * edge_points + j) as u32;
                    let next = current + stride as u32;
                    push_quad(&mut indices, current, current + 1, next, next + 1);
                }
            }
        }
        (positions, indices)
    });

    finalize_mesh(positions, indices, metrics)
}

/// Builds the coarse four-corner tube for one segment.
///
/// `edge_segments` is ignored. Corners are shared between faces, giving
/// `(S + 1) * 4` vertices and `8 * S` triangles with rounded-looking
/// smooth normals.
#[must_use]
pub fn mesh_square_section(params: &SectionParams) -> (Mesh, MeshDiagnostics) {
    let mut metrics = RingMetrics::default();
    metrics.begin();
    let (mesh, mut diagnostics) = mesh_square_section_with_metrics(params, &mut metrics);
    diagnostics.timing = metrics.end();
    (mesh, diagnostics)
}

fn mesh_square_section_with_metrics(
    params: &SectionParams,
    metrics: &mut RingMetrics,
) -> (Mesh, MeshDiagnostics) {
    if let Some(reason) = params.degenerate_reason(false) {
        return skipped(reason);
    }
    let square_vertices = params
        .angular_segments
        .checked_add(1)
        .and_then(|steps| steps.checked_mul(SQUARE_CORNERS))
        .and_then(index_range);
    if square_vertices.is_none() {
        return skipped(DegenerateInput::IndexOverflow);
    }

    let (inner, outer) = radial_bounds(params);
    let half_height = params.height / 2.0;
    // Outer top, outer bottom, inner top, inner bottom.
    let corners = [
        (outer, half_height),
        (outer, -half_height),
        (inner, half_height),
        (inner, -half_height),
    ];

    let (positions, indices) = metrics.time(TimingBucket::Meshing, || {
        let positions = sweep_profile(params, &corners);

        let mut indices = Vec::with_capacity(params.angular_segments * 8 * 3);
        for step in 0..params.angular_segments {
            let base = (step * SQUARE_CORNERS) as u32;
            let next = base + SQUARE_CORNERS as u32;
            // Top, outer wall, bottom, inner wall; each pair runs along the
            // profile in the same direction as the detailed mesher.
            for (a, b) in [(2, 0), (0, 1), (1, 3), (3, 2)] {
                push_quad(&mut indices, base + a, base + b, next + a, next + b);
            }
        }
        (positions, indices)
    });

    finalize_mesh(positions, indices, metrics)
}

fn skipped(reason: DegenerateInput) -> (Mesh, MeshDiagnostics) {
    log::debug!("ring section skipped: {reason}");
    (Mesh::empty(), MeshDiagnostics::degenerate(reason))
}

fn index_range(vertex_count: usize) -> Option<u32> {
    u32::try_from(vertex_count).ok()
}

fn radial_bounds(params: &SectionParams) -> (f64, f64) {
    let half = params.radial_thickness / 2.0;
    (params.radius - half, params.radius + half)
}

/// `(r, z)` samples of the four profile edges, edge after edge.
fn rectangular_profile(params: &SectionParams) -> Vec<(f64, f64)> {
    let (inner, outer) = radial_bounds(params);
    let half_height = params.height / 2.0;
    let segments = params.edge_segments as f64;

    let mut profile = Vec::with_capacity(PROFILE_EDGES * (params.edge_segments + 1));
    for edge in 0..PROFILE_EDGES {
        for j in 0..=params.edge_segments {
            let t = j as f64 / segments;
            let sample = match edge {
                0 => (inner + params.radial_thickness * t, half_height),
                1 => (outer, half_height - params.height * t),
                2 => (outer - params.radial_thickness * t, -half_height),
                _ => (inner, -half_height + params.height * t),
            };
            profile.push(sample);
        }
    }
    profile
}

/// Places a copy of `profile` at every angular step.
fn sweep_profile(params: &SectionParams, profile: &[(f64, f64)]) -> Vec<[f64; 3]> {
    let mut positions = Vec::with_capacity((params.angular_segments + 1) * profile.len());
    for step in 0..=params.angular_segments {
        let (sin, cos) = params.angle_at(step).sin_cos();
        positions.extend(profile.iter().map(|&(r, z)| [r * cos, r * sin, z]));
    }
    positions
}

/// Two triangles between neighbouring profile points `a`, `b` on one step
/// and `a_next`, `b_next` on the following step.
fn push_quad(indices: &mut Vec<u32>, a: u32, b: u32, a_next: u32, b_next: u32) {
    indices.extend_from_slice(&[a, b, a_next, b, b_next, a_next]);
}
