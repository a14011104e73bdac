use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::RingError;

/// Ring dimensions and tessellation density.
///
/// Deserializes from partial JSON; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Centre-line radius of the tube.
    pub radius: f64,
    /// Outer radius minus inner radius.
    pub radial_thickness: f64,
    pub height: f64,
    /// Subdivisions along each segment's arc.
    pub angular_segments: usize,
    /// Subdivisions of each of the four cross-section edges.
    pub edge_segments: usize,
    /// Gap between segments as a fraction of the outer radius.
    pub gap: f64,
    pub connector_length: f64,
    pub jitter: Option<RadiusJitter>,
    pub fraction_policy: FractionPolicy,
    pub profile: SectionProfile,
    /// Mesh segments on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            radius: 0.75,
            radial_thickness: 0.6,
            height: 0.2,
            angular_segments: 264,
            edge_segments: 128,
            gap: 0.03,
            connector_length: 0.5,
            jitter: None,
            fraction_policy: FractionPolicy::Accept,
            profile: SectionProfile::Detailed,
            parallel: false,
        }
    }
}

impl RingConfig {
    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.radius + self.radial_thickness / 2.0
    }

    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.radius - self.radial_thickness / 2.0
    }

    /// Height of the swept cross-section. The square profile is as tall as
    /// it is thick.
    #[must_use]
    pub fn section_height(&self) -> f64 {
        match self.profile {
            SectionProfile::Detailed => self.height,
            SectionProfile::Square => self.radial_thickness,
        }
    }

    /// Checks every dimension before any geometry is built.
    pub fn validate(&self) -> Result<(), RingError> {
        positive("radius", self.radius)?;
        positive("radial_thickness", self.radial_thickness)?;
        positive("height", self.height)?;
        positive("connector_length", self.connector_length)?;

        if self.radial_thickness >= 2.0 * self.radius {
            return Err(RingError::DegenerateInnerRadius {
                radius: self.radius,
                radial_thickness: self.radial_thickness,
            });
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(RingError::InvalidGap);
        }
        if let Some(jitter) = &self.jitter {
            if !jitter.amplitude.is_finite() || jitter.amplitude < 0.0 {
                return Err(RingError::InvalidDimension {
                    name: "jitter.amplitude",
                    value: jitter.amplitude,
                });
            }
        }
        Ok(())
    }

    /// Gap expressed as a physical length on the outer edge.
    #[must_use]
    pub fn gap_spec(&self) -> GapSpec {
        let outer = self.outer_radius();
        GapSpec::new(self.gap * outer, outer, self.inner_radius())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), RingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RingError::InvalidDimension { name, value })
    }
}

/// A gap given as arc length, converted to one angle for both ring edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapSpec {
    pub physical_gap_length: f64,
    pub reference_outer_radius: f64,
    pub reference_inner_radius: f64,
}

impl GapSpec {
    #[must_use]
    pub const fn new(
        physical_gap_length: f64,
        reference_outer_radius: f64,
        reference_inner_radius: f64,
    ) -> Self {
        Self {
            physical_gap_length,
            reference_outer_radius,
            reference_inner_radius,
        }
    }

    /// No gap at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }

    pub fn validate(&self) -> Result<(), RingError> {
        let length_ok = self.physical_gap_length.is_finite() && self.physical_gap_length >= 0.0;
        let radii_ok = [self.reference_outer_radius, self.reference_inner_radius]
            .iter()
            .all(|r| r.is_finite() && *r > 0.0);
        if length_ok && radii_ok {
            Ok(())
        } else {
            Err(RingError::InvalidGap)
        }
    }

    /// Mean of the gap angle measured on the outer and the inner edge.
    #[must_use]
    pub fn adjusted_angle(&self) -> f64 {
        let outer = self.physical_gap_length / self.reference_outer_radius;
        let inner = self.physical_gap_length / self.reference_inner_radius;
        (outer + inner) / 2.0
    }
}

/// What the allocator does when fractions sum above 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionPolicy {
    /// Lay the segments out as given and log a warning; they overrun the circle.
    #[default]
    Accept,
    /// Fail with [`RingError::FractionsExceedBudget`].
    Reject,
}

/// Cross-section shape swept along each segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionProfile {
    /// Rectangular profile with subdivided edges.
    #[default]
    Detailed,
    /// Four corners per step; the tube is `radial_thickness` tall.
    Square,
}

/// Per-segment random offset of the tube radius.
///
/// Each segment's radius moves by `(u - 0.5) * amplitude` with `u` uniform in
/// `[0, 1)`. With a seed the offsets repeat across recomputes; without one
/// every recompute draws fresh offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusJitter {
    pub amplitude: f64,
    pub seed: Option<u64>,
}

impl RadiusJitter {
    pub const PRODUCTION_AMPLITUDE: f64 = 0.25;

    #[must_use]
    pub const fn seeded(amplitude: f64, seed: u64) -> Self {
        Self {
            amplitude,
            seed: Some(seed),
        }
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub(crate) fn offset(&self, rng: &mut impl Rng) -> f64 {
        (rng.random::<f64>() - 0.5) * self.amplitude
    }
}

impl Default for RadiusJitter {
    fn default() -> Self {
        Self {
            amplitude: Self::PRODUCTION_AMPLITUDE,
            seed: None,
        }
    }
}
