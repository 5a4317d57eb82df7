//! Schema module - Configuration and color types for Life simulations.

mod color;
mod config;

pub use color::*;
pub use config::*;
