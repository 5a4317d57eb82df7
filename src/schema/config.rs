//! Configuration types for Life simulation parameters.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Capacity of the pattern intake queue.
pub const INTAKE_CAPACITY: usize = 2;

/// Gradient algorithm used to color cells by age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Straight blend between the first and last control color.
    #[default]
    Linear,
    /// Piecewise linear blend through every control color.
    Polylinear,
    /// Bernstein-weighted blend of all control colors.
    Bezier,
}

impl fmt::Display for GradientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradientKind::Linear => write!(f, "Linear"),
            GradientKind::Polylinear => write!(f, "Polylinear"),
            GradientKind::Bezier => write!(f, "Bezier"),
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    /// Grid width in cells.
    pub columns: usize,
    /// Grid height in cells.
    pub rows: usize,
    /// Cell size in pixels, used to map pointer positions onto cells.
    pub cell_size: usize,
    /// PRNG seed for the random world. 0 derives one from the clock.
    pub seed: u64,
    /// Probability that a cell starts alive in a random world.
    pub fill_ratio: f64,
    /// Rulestring in `B<digits>/S<digits>` form.
    pub rule: String,
    /// Ticks per second.
    pub fps: u32,
    /// Pattern file loaded on every reset.
    pub pattern_file: Option<PathBuf>,
    /// Start paused.
    pub pause: bool,
    /// Start with an empty world instead of a random one.
    pub empty: bool,
    /// Color cells by age.
    pub color: bool,
    /// Control colors as hex triplets, e.g. `#4682b4,#ffffff`.
    pub colors: String,
    /// Gradient algorithm.
    pub gradient: GradientKind,
    /// Number of entries in the age gradient.
    pub max_age: usize,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            columns: 100,
            rows: 100,
            cell_size: 5,
            seed: 0,
            fill_ratio: 0.15,
            rule: "B3/S23".to_string(),
            fps: 10,
            pattern_file: None,
            pause: false,
            empty: false,
            color: false,
            colors: "#4682b4,#ffffff".to_string(),
            gradient: GradientKind::Linear,
            max_age: 255,
        }
    }
}

impl LifeConfig {
    /// Get total number of cells (columns * rows).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.columns * self.rows
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.cell_size == 0 {
            return Err(ConfigError::InvalidCellSize);
        }
        if self.fps == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        if self.max_age == 0 {
            return Err(ConfigError::InvalidMaxAge);
        }
        if !(0.0..=1.0).contains(&self.fill_ratio) {
            return Err(ConfigError::InvalidFillRatio(self.fill_ratio));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (columns, rows) must be non-zero")]
    InvalidDimensions,
    #[error("Cell size must be non-zero")]
    InvalidCellSize,
    #[error("Tick rate (fps) must be non-zero")]
    InvalidTickRate,
    #[error("Maximum age must be non-zero")]
    InvalidMaxAge,
    #[error("Fill ratio {0} is outside [0, 1]")]
    InvalidFillRatio(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LifeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size(), 100 * 100);
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let config = LifeConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_validate_rejects_fill_ratio() {
        let config = LifeConfig {
            fill_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFillRatio(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LifeConfig =
            serde_json::from_str(r#"{"columns": 40, "gradient": "bezier"}"#).unwrap();
        assert_eq!(config.columns, 40);
        assert_eq!(config.rows, 100);
        assert_eq!(config.gradient, GradientKind::Bezier);
        assert_eq!(config.rule, "B3/S23");
    }
}
