use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::RingError;

/// Flat material colour, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RgbRepr")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Accepted JSON spellings of a colour.
#[derive(Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Hex(String),
    Channels([f64; 3]),
    Fields { r: f64, g: f64, b: f64 },
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = RingError;

    fn try_from(repr: RgbRepr) -> Result<Self, Self::Error> {
        match repr {
            RgbRepr::Hex(text) => Self::from_hex(&text),
            RgbRepr::Channels([r, g, b]) | RgbRepr::Fields { r, g, b } => {
                let color = Self::new(r, g, b);
                if [r, g, b].iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c)) {
                    Ok(color)
                } else {
                    Err(RingError::InvalidColor(format!("[{r}, {g}, {b}]")))
                }
            }
        }
    }
}

impl Rgb {
    /// Accent purple of the first default segment.
    pub const VIOLET: Self = Self::from_rgb255(0x67, 0x12, 0x9b);
    /// Neutral slate of the second default segment.
    pub const SLATE: Self = Self::from_rgb255(0x3d, 0x41, 0x48);
    pub const BLUE_VIOLET: Self = Self::from_rgb255(0x8a, 0x2b, 0xe2);
    pub const CHARCOAL: Self = Self::from_rgb255(0x40, 0x40, 0x40);
    pub const CORAL: Self = Self::from_rgb255(0xff, 0x40, 0x40);
    pub const PLUM: Self = Self::from_rgb255(0x8a, 0x12, 0x9b);

    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn from_rgb255(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(text: &str) -> Result<Self, RingError> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RingError::InvalidColor(text.to_string()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| RingError::InvalidColor(text.to_string()))?;
        Ok(Self::from_packed(value))
    }

    /// A uniformly random 24-bit colour.
    #[must_use]
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::from_packed(rng.random_range(0..=0x00ff_ffff))
    }

    fn from_packed(value: u32) -> Self {
        let [_, r, g, b] = value.to_be_bytes();
        Self::from_rgb255(r, g, b)
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::CHARCOAL
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}
