//! Color types and hex triplet parsing.

use serde::{Deserialize, Serialize};

use crate::error::{LifeError, Result};

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Color with full alpha.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Parse hex color triplets into a list of opaque colors.
///
/// Accepts `ffffff,000000`, `#ffffff,#000000` or `#ffffff#000000`.
/// Only the first six hex digits of each entry are used.
pub fn parse_color_triplets(s: &str) -> Result<Vec<RgbaColor>> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let s = s.replace(",#", ",").replace('#', ",");

    s.split(',').map(parse_triplet).collect()
}

fn parse_triplet(entry: &str) -> Result<RgbaColor> {
    let invalid = || LifeError::InvalidColor(entry.to_string());

    let hex = entry.get(..6).ok_or_else(invalid)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
    let r = channel(0..2).map_err(|_| invalid())?;
    let g = channel(2..4).map_err(|_| invalid())?;
    let b = channel(4..6).map_err(|_| invalid())?;

    Ok(RgbaColor::opaque(r, g, b))
}
