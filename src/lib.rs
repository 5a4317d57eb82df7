//! Toroid Life - Conway's Game of Life and birth/survival variants on a torus.
//!
//! This crate provides the simulation and pattern ingestion engine for a
//! wrap-around Life world: a toroidal grid with per-cell age tracking,
//! `B<digits>/S<digits>` rules, decoders for Life 1.05, plaintext and RLE
//! pattern files, and age-to-color gradients.
//!
//! # Architecture
//!
//! - `schema`: Configuration and color types
//! - `compute`: Rules, grid evolution and gradients
//! - `pattern`: Pattern files, format sniffing and the three decoders
//! - `session`: The run loop state and the bounded pattern intake
//!
//! # Example
//!
//! ```rust,no_run
//! use toroid_life::{
//!     schema::LifeConfig,
//!     pattern::Pattern,
//!     session::{Simulation, pattern_intake},
//! };
//!
//! let config = LifeConfig {
//!     empty: true,
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config).unwrap();
//!
//! // Patterns may arrive from another thread while the loop runs
//! let (sender, intake) = pattern_intake();
//! sim.attach_intake(intake);
//! sender
//!     .submit(Pattern::from_text("x = 3, y = 3\nbo$2bo$3o!").unwrap())
//!     .unwrap();
//!
//! for _ in 0..100 {
//!     sim.advance();
//! }
//! println!("{}", sim.status_line());
//! ```

pub mod compute;
pub mod error;
pub mod pattern;
pub mod schema;
pub mod session;

// Re-export commonly used types
pub use compute::{Cell, Gradient, Grid, RuleSet, TickStats};
pub use error::{LifeError, Result};
pub use pattern::{Pattern, PatternFormat};
pub use schema::{GradientKind, LifeConfig, RgbaColor};
pub use session::{Event, Flow, Key, Simulation, pattern_intake};
