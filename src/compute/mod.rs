//! Compute module - Rules, grid evolution and age gradients.

mod gradient;
mod grid;
mod rules;

pub use gradient::*;
pub use grid::*;
pub use rules::*;
