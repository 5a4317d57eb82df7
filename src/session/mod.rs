//! Session module - Run loop state and the pattern intake queue.

mod intake;
mod simulation;

pub use intake::*;
pub use simulation::*;
