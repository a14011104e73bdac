use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Rgb;

/// One data category of the ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Share of the angle left after gaps, in `[0, 1]`.
    #[serde(alias = "progressFraction", alias = "progress_fraction")]
    pub progress: f64,
    #[serde(default)]
    pub color: Rgb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SegmentSpec {
    #[must_use]
    pub fn new(progress: f64, color: Rgb) -> Self {
        Self {
            progress,
            color,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label, or the progress as a whole percentage (`"75%"`).
    #[must_use]
    pub fn label_text(&self) -> String {
        label_text(self.label.as_deref(), self.progress)
    }
}

pub(crate) fn label_text(label: Option<&str>, progress: f64) -> String {
    match label {
        Some(text) => text.to_string(),
        None => format!("{}%", (progress * 100.0).round()),
    }
}

/// The two-category ring shown when no data has been supplied.
#[must_use]
pub fn default_segments() -> Vec<SegmentSpec> {
    vec![
        SegmentSpec::new(0.75, Rgb::VIOLET),
        SegmentSpec::new(0.25, Rgb::SLATE),
    ]
}

/// `count` segments with random weights normalised to sum to 1 and random
/// colours.
pub fn random_segments(count: usize, rng: &mut impl Rng) -> Vec<SegmentSpec> {
    // Strictly positive weights keep every segment visible.
    let weights: Vec<f64> = (0..count)
        .map(|_| rng.random_range(0.05..=1.0))
        .collect();
    let total: f64 = weights.iter().sum();

    weights
        .into_iter()
        .map(|w| SegmentSpec::new(w / total, Rgb::random(rng)))
        .collect()
}
