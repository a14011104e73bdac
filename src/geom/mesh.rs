use std::collections::HashMap;

use super::diagnostics::MeshDiagnostics;
use super::metrics::{RingMetrics, TimingBucket};
use super::{Point3, Tolerance, Vec3};

/// Indexed triangle mesh with per-vertex normals.
///
/// Built once by a mesher and never mutated afterwards; a parameter change
/// produces a new mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<[f64; 3]>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
    /// Smooth normals, one per position.
    pub normals: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh indices are not a triangle list (len % 3 != 0)")]
    NotTriangleList,
    #[error("mesh has invalid vertex coordinates (NaN/Inf)")]
    NonFiniteVertex,
    #[error("mesh has out-of-bounds vertex indices")]
    IndexOutOfBounds,
    #[error("mesh normal buffer does not match vertex count")]
    NormalCountMismatch,
}

impl Mesh {
    /// A mesh with no vertices and no triangles.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a mesh from raw buffers and derives smooth normals.
    #[must_use]
    pub fn from_buffers(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        let normals = compute_smooth_normals(&positions, &indices);
        Self {
            positions,
            indices,
            normals,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.indices.is_empty()
    }

    /// Iterates over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| [tri[0], tri[1], tri[2]])
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point3> {
        self.positions.get(index).copied().map(Point3::from)
    }

    #[must_use]
    pub fn normal(&self, index: usize) -> Option<Vec3> {
        self.normals.get(index).copied().map(Vec3::from)
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangleList);
        }
        if self
            .positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
        {
            return Err(MeshError::NonFiniteVertex);
        }
        let n = self.positions.len();
        if self.indices.iter().any(|&i| i as usize >= n) {
            return Err(MeshError::IndexOutOfBounds);
        }
        if self.normals.len() != n {
            return Err(MeshError::NormalCountMismatch);
        }
        Ok(())
    }

    /// Returns the position buffer as a flat slice: `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        flatten_f64_array_slice::<3>(&self.positions)
    }

    /// Returns the normal buffer as a flat slice: `[nx0, ny0, nz0, ...]`.
    #[must_use]
    pub fn normals_flat(&self) -> &[f64] {
        flatten_f64_array_slice::<3>(&self.normals)
    }

    /// Single-precision copy of the positions, the format GPU buffers expect.
    #[must_use]
    pub fn positions_f32(&self) -> Vec<f32> {
        self.positions_flat().iter().map(|&v| v as f32).collect()
    }

    /// Single-precision copy of the normals.
    #[must_use]
    pub fn normals_f32(&self) -> Vec<f32> {
        self.normals_flat().iter().map(|&v| v as f32).collect()
    }
}

fn flatten_f64_array_slice<const N: usize>(data: &[[f64; N]]) -> &[f64] {
    let count = data.len().checked_mul(N).unwrap_or(0);
    let ptr = data.as_ptr().cast::<f64>();
    // SAFETY: `[[f64; N]]` is stored contiguously, and we compute the element count as `len * N`.
    unsafe { std::slice::from_raw_parts(ptr, count) }
}

/// Derives normals and diagnostics for freshly stitched buffers.
pub(crate) fn finalize_mesh(
    positions: Vec<[f64; 3]>,
    indices: Vec<u32>,
    metrics: &mut RingMetrics,
) -> (Mesh, MeshDiagnostics) {
    let normals = metrics.time(TimingBucket::Normals, || {
        compute_smooth_normals(&positions, &indices)
    });

    let (open_edge_count, non_manifold_edge_count, degenerate_triangle_count) =
        metrics.time(TimingBucket::Diagnostics, || {
            let (open, non_manifold) = count_edge_topology(&indices);
            let degenerate = count_degenerate_triangles(&positions, &indices, Tolerance::ZERO_LENGTH);
            (open, non_manifold, degenerate)
        });

    let mesh = Mesh {
        positions,
        indices,
        normals,
    };

    let mut diagnostics = MeshDiagnostics {
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        degenerate_triangle_count,
        open_edge_count,
        non_manifold_edge_count,
        ..MeshDiagnostics::default()
    };
    if non_manifold_edge_count > 0 {
        diagnostics.add_warning("mesh has non-manifold edges");
    }
    if degenerate_triangle_count > 0 {
        diagnostics.add_warning("mesh has zero-area triangles");
    }

    (mesh, diagnostics)
}

/// Area-weighted vertex normals: every triangle adds its unnormalized face
/// normal to its three corners, then each sum is normalized.
pub(crate) fn compute_smooth_normals(points: &[[f64; 3]], indices: &[u32]) -> Vec<[f64; 3]> {
    let mut normals = vec![[0.0, 0.0, 0.0]; points.len()];

    for tri in indices.chunks_exact(3) {
        let i0 = tri[0] as usize;
        let i1 = tri[1] as usize;
        let i2 = tri[2] as usize;

        let (Some(a), Some(b), Some(c)) = (points.get(i0), points.get(i1), points.get(i2)) else {
            continue;
        };

        let ab = Vec3::new(b[0] - a[0], b[1] - a[1], b[2] - a[2]);
        let ac = Vec3::new(c[0] - a[0], c[1] - a[1], c[2] - a[2]);
        let n = ab.cross(ac);

        for i in [i0, i1, i2] {
            normals[i][0] += n.x;
            normals[i][1] += n.y;
            normals[i][2] += n.z;
        }
    }

    for n in &mut normals {
        match Vec3::from(*n).normalized() {
            Some(unit) => *n = unit.to_array(),
            None => *n = [0.0, 0.0, 1.0],
        }
    }

    normals
}

/// Returns `(open_edges, non_manifold_edges)` of a triangle list.
#[must_use]
pub fn count_edge_topology(indices: &[u32]) -> (usize, usize) {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }

        for (ea, eb) in [(i0, i1), (i1, i2), (i2, i0)] {
            let key = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }

    let open_edge_count = edge_counts.values().filter(|&&count| count == 1).count();
    let non_manifold_edge_count = edge_counts.values().filter(|&&count| count > 2).count();
    (open_edge_count, non_manifold_edge_count)
}

fn count_degenerate_triangles(points: &[[f64; 3]], indices: &[u32], tol: Tolerance) -> usize {
    indices
        .chunks_exact(3)
        .filter(|tri| {
            let (Some(a), Some(b), Some(c)) = (
                points.get(tri[0] as usize),
                points.get(tri[1] as usize),
                points.get(tri[2] as usize),
            ) else {
                return true;
            };
            let ab = Vec3::new(b[0] - a[0], b[1] - a[1], b[2] - a[2]);
            let ac = Vec3::new(c[0] - a[0], c[1] - a[1], c[2] - a[2]);
            let area2 = ab.cross(ac).length_squared();
            !area2.is_finite() || area2 <= tol.eps_squared()
        })
        .count()
}
