//! Mesh diagnostics for ring geometry.
//!
//! Every mesh builder returns a [`MeshDiagnostics`] next to the mesh. It
//! records buffer sizes, topology counts and, when the builder bailed out with
//! an empty mesh, the [`DegenerateInput`] that caused it. A degenerate segment
//! is resolved locally (empty mesh) instead of failing the whole ring, so the
//! diagnostics are where callers find out about it.
//!
//! # Example
//!
//! ```ignore
//! use ring_engine::ring::{SectionParams, mesh_ring_section};
//!
//! let (mesh, diagnostics) = mesh_ring_section(&params);
//! if let Some(reason) = diagnostics.degenerate_input {
//!     log::debug!("segment skipped: {reason}");
//! }
//! ```

use std::fmt;

use serde::Serialize;

/// Why a builder produced an empty mesh instead of geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateInput {
    /// Angular or cross-section subdivision count below one.
    NoSubdivisions,
    /// Arc length is zero or negative.
    ZeroLengthArc,
    /// A radius, height or angle was NaN or infinite.
    NonFiniteInput,
    /// More vertices than a `u32` index buffer can address.
    IndexOverflow,
}

impl fmt::Display for DegenerateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoSubdivisions => "subdivision count must be at least 1",
            Self::ZeroLengthArc => "arc length must be positive",
            Self::NonFiniteInput => "mesh inputs must be finite",
            Self::IndexOverflow => "vertex count exceeds the u32 index range",
        };
        f.write_str(text)
    }
}

/// Diagnostics for one generated mesh.
///
/// # Topology Metrics
///
/// - `open_edge_count`: Edges with only one adjacent triangle. A ring segment
///   is an uncapped tube whose four faces do not share corner vertices, so
///   open edges are expected.
/// - `non_manifold_edge_count`: Edges with more than two adjacent triangles.
///   Always zero for a well-formed segment.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MeshDiagnostics {
    /// Total number of vertices in the final mesh.
    pub vertex_count: usize,

    /// Total number of triangles in the final mesh.
    pub triangle_count: usize,

    /// Number of zero-area triangles (kept in the buffer, counted here).
    ///
    /// Non-zero when a dimension such as `height` collapses a face.
    pub degenerate_triangle_count: usize,

    /// Number of open (boundary) edges in the mesh.
    pub open_edge_count: usize,

    /// Number of non-manifold edges in the mesh.
    pub non_manifold_edge_count: usize,

    /// Set when the builder returned an empty mesh on purpose.
    pub degenerate_input: Option<DegenerateInput>,

    /// Optional timing breakdown. Only populated with the `ring_metrics`
    /// feature on native targets.
    #[serde(skip)]
    pub timing: Option<super::metrics::RingTimingReport>,

    /// Human-readable warnings.
    pub warnings: Vec<String>,
}

impl MeshDiagnostics {
    /// Creates a new empty diagnostics struct with all counts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics for a builder that skipped its work because of `reason`.
    #[must_use]
    pub fn degenerate(reason: DegenerateInput) -> Self {
        Self {
            degenerate_input: Some(reason),
            warnings: vec![reason.to_string()],
            ..Self::default()
        }
    }

    /// Returns `true` if the mesh is manifold (no edge shared by 3+ triangles).
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Returns `true` if the builder produced no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0 && self.triangle_count == 0
    }

    /// Returns `true` if nothing suspicious was recorded.
    ///
    /// Open edges are not counted as issues; see the struct docs.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.non_manifold_edge_count == 0
            && self.degenerate_triangle_count == 0
            && self.degenerate_input.is_none()
            && self.warnings.is_empty()
    }

    /// Returns `true` if any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Adds a warning message to the diagnostics.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merges another diagnostics struct into this one.
    ///
    /// Counts are summed and warnings appended. `degenerate_input` keeps the
    /// first reason seen; `timing` is not merged.
    pub fn merge(&mut self, other: &MeshDiagnostics) {
        self.vertex_count += other.vertex_count;
        self.triangle_count += other.triangle_count;
        self.degenerate_triangle_count += other.degenerate_triangle_count;
        self.open_edge_count += other.open_edge_count;
        self.non_manifold_edge_count += other.non_manifold_edge_count;
        if self.degenerate_input.is_none() {
            self.degenerate_input = other.degenerate_input;
        }
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"V:{vertices} T:{triangles} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];

        if self.degenerate_triangle_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_triangle_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        if let Some(reason) = self.degenerate_input {
            parts.push(format!("skipped({reason})"));
        }

        parts.join(" ")
    }
}

impl fmt::Display for MeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;

        if let Some(reason) = self.degenerate_input {
            writeln!(f, "  Skipped: {reason}")?;
        }

        if self.open_edge_count > 0 || self.non_manifold_edge_count > 0 {
            writeln!(f, "  Topology:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
        }

        if self.degenerate_triangle_count > 0 {
            writeln!(f, "  Degenerate triangles: {}", self.degenerate_triangle_count)?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.is_clean() { "CLEAN" } else { "ISSUES DETECTED" };
        writeln!(f, "  Status: {status}")?;

        Ok(())
    }
}
