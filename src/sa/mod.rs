//! Simulated annealing for UPMSP-SDST.
//!
//! A single-solution trajectory search over the six move families in
//! [`crate::neighborhood`]. Worsening candidates are accepted with the
//! Metropolis probability `exp(-delta / T)`; the temperature cools
//! geometrically and is reset when it becomes negligible.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Santos et al. (2016), "Analysis of stochastic local search methods for the
//!   unrelated parallel machine scheduling problem", ITOR

mod callback;
mod config;
mod runner;

pub use callback::{Incumbent, IncumbentCallback, IncumbentTrace};
pub use config::AnnealerConfig;
pub use runner::{AnnealResult, Annealer};
