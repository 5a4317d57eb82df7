//! Age gradients.
//!
//! A gradient is a lookup table of `max_age` colors, indexed by cell age.
//! Three algorithms are available:
//!
//! - Linear: straight blend from the first to the last control color
//! - Polylinear: linear segments between consecutive control colors
//! - Bezier: every control color weighted by its Bernstein basis polynomial

use std::fmt;

use crate::error::{LifeError, Result};
use crate::schema::{GradientKind, RgbaColor};

/// Precomputed colors for every cell age.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    controls: Vec<RgbaColor>,
    points: Vec<RgbaColor>,
}

impl Gradient {
    /// Build a gradient with the selected algorithm.
    pub fn build(kind: GradientKind, colors: &[RgbaColor], max_age: usize) -> Result<Self> {
        match kind {
            GradientKind::Linear => Self::linear(colors, max_age),
            GradientKind::Polylinear => Self::polylinear(colors, max_age),
            GradientKind::Bezier => Self::bezier(colors, max_age),
        }
    }

    /// Linear gradient between the first and last control color.
    ///
    /// Interior control colors are ignored.
    pub fn linear(colors: &[RgbaColor], max_age: usize) -> Result<Self> {
        require_colors(GradientKind::Linear, colors, 1)?;
        require_max_age(max_age)?;

        let start = colors[0];
        let end = colors[colors.len() - 1];

        Ok(Self {
            controls: vec![start, end],
            points: interpolate(start, end, max_age),
        })
    }

    /// Linear segments between each pair of consecutive control colors.
    ///
    /// The range is split into `colors.len() - 1` equal segments; the last
    /// segment absorbs the remainder.
    pub fn polylinear(colors: &[RgbaColor], max_age: usize) -> Result<Self> {
        require_colors(GradientKind::Polylinear, colors, 2)?;
        require_max_age(max_age)?;

        let segments = colors.len() - 1;
        let n = max_age / segments;

        let mut points = Vec::with_capacity(max_age);
        for (i, pair) in colors.windows(2).enumerate() {
            let len = if i == segments - 1 {
                max_age - i * n
            } else {
                n
            };
            points.extend(interpolate(pair[0], pair[1], len));
        }

        Ok(Self {
            controls: colors.to_vec(),
            points,
        })
    }

    /// Bezier gradient through all control colors.
    pub fn bezier(colors: &[RgbaColor], max_age: usize) -> Result<Self> {
        require_colors(GradientKind::Bezier, colors, 1)?;
        require_max_age(max_age)?;

        let n = colors.len() - 1;
        let mut factorials = FactorialCache::new(n);

        let mut points = Vec::with_capacity(max_age);
        for t in 0..max_age {
            let u = position(t, max_age);
            let (mut r, mut g, mut b) = (0.0f64, 0.0f64, 0.0f64);
            for (i, c) in colors.iter().enumerate() {
                let w = factorials.bernstein(u, n, i);
                r += w * c.r as f64;
                g += w * c.g as f64;
                b += w * c.b as f64;
            }
            points.push(RgbaColor::opaque(r as u8, g as u8, b as u8));
        }

        Ok(Self {
            controls: colors.to_vec(),
            points,
        })
    }

    /// Control colors the gradient was built from.
    pub fn controls(&self) -> &[RgbaColor] {
        &self.controls
    }

    /// Every precomputed color, indexed by age.
    pub fn points(&self) -> &[RgbaColor] {
        &self.points
    }

    /// Number of entries (the `max_age` it was built with).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Color for a cell age. Ages past the end clamp to the last entry.
    #[inline]
    pub fn color_for_age(&self, age: u32) -> RgbaColor {
        let idx = (age as usize).min(self.points.len() - 1);
        self.points[idx]
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "controls:")?;
        writeln!(f, "{:?}", self.controls)?;
        writeln!(f)?;
        for (i, p) in self.points.iter().enumerate() {
            writeln!(f, "{} = {:?}", i, p)?;
        }
        Ok(())
    }
}

/// Memoized factorials for Bernstein coefficients.
///
/// Holds entries for `0..=max_n` only and lives for a single gradient build.
#[derive(Debug)]
pub struct FactorialCache {
    cache: Vec<Option<f64>>,
}

impl FactorialCache {
    pub fn new(max_n: usize) -> Self {
        Self {
            cache: vec![None; max_n + 1],
        }
    }

    /// n!, cached when `n` is within the cache bound.
    pub fn fact(&mut self, n: usize) -> f64 {
        if let Some(Some(f)) = self.cache.get(n) {
            return *f;
        }

        let result = if n <= 1 {
            1.0
        } else {
            n as f64 * self.fact(n - 1)
        };

        if let Some(slot) = self.cache.get_mut(n) {
            *slot = Some(result);
        }
        result
    }

    /// Bernstein basis value `C(n, i) * (1 - u)^(n - i) * u^i`.
    ///
    /// `u` runs from 0 to 1 along the curve, `n` is the number of control
    /// colors minus one and `i` the control color index.
    pub fn bernstein(&mut self, u: f64, n: usize, i: usize) -> f64 {
        let binomial = self.fact(n) / (self.fact(i) * self.fact(n - i));
        binomial * (1.0 - u).powi((n - i) as i32) * u.powi(i as i32)
    }
}

/// Position of age `t` along a table of `len` entries, in [0, 1].
#[inline]
fn position(t: usize, len: usize) -> f64 {
    if len <= 1 {
        0.0
    } else {
        t as f64 / (len - 1) as f64
    }
}

/// `len` colors blended linearly from `start` to `end`.
fn interpolate(start: RgbaColor, end: RgbaColor, len: usize) -> Vec<RgbaColor> {
    let lerp = |a: u8, b: u8, u: f64| (a as f64 + u * (b as f64 - a as f64)) as u8;

    (0..len)
        .map(|t| {
            let u = position(t, len);
            RgbaColor::opaque(
                lerp(start.r, end.r, u),
                lerp(start.g, end.g, u),
                lerp(start.b, end.b, u),
            )
        })
        .collect()
}

fn require_colors(kind: GradientKind, colors: &[RgbaColor], required: usize) -> Result<()> {
    if colors.len() < required {
        return Err(LifeError::InsufficientControlColors {
            kind,
            required,
            given: colors.len(),
        });
    }
    Ok(())
}

fn require_max_age(max_age: usize) -> Result<()> {
    if max_age == 0 {
        return Err(LifeError::EmptyInput("gradient needs a non-zero max age"));
    }
    Ok(())
}
