/// Configuration errors. Raised before any geometry is built, so a failed
/// recompute never hands out a partial ring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RingError {
    #[error("{segment_count} gaps totalling {gap_total} rad leave no room on the circle")]
    GapExceedsCircle { gap_total: f64, segment_count: usize },
    #[error("radial thickness {radial_thickness} must be smaller than twice the radius {radius}")]
    DegenerateInnerRadius { radius: f64, radial_thickness: f64 },
    #[error("{name} must be finite and > 0 (got {value})")]
    InvalidDimension { name: &'static str, value: f64 },
    #[error("gap length must be finite and >= 0, reference radii finite and > 0")]
    InvalidGap,
    #[error("segment {index} progress must be finite and within [0, 1] (got {value})")]
    InvalidFraction { index: usize, value: f64 },
    #[error("segment fractions sum to {sum}, more than the circle holds")]
    FractionsExceedBudget { sum: f64 },
    #[error("invalid colour `{0}` (expected #rrggbb)")]
    InvalidColor(String),
}
