mod core;
mod curve;
mod diagnostics;
mod mesh;
mod metrics;

pub use self::core::{Point3, Tolerance, Transform, Vec3};
pub use curve::{Curve3, QuadraticBezier3, curve_length, tessellate_curve_uniform};
pub use diagnostics::{DegenerateInput, MeshDiagnostics};
pub use mesh::{Mesh, MeshError, count_edge_topology};
pub use metrics::{RingMetrics, RingTimingReport, TimingBucket};

pub(crate) use mesh::finalize_mesh;
