//! Simulated annealing for the unrelated parallel machine scheduling problem
//! with sequence- and machine-dependent setup times (UPMSP-SDST).
//!
//! Given `n` jobs and `m` machines, each job must be processed by exactly
//! one machine. Processing times depend on the machine, and a setup time
//! that depends on the machine and on the ordered pair of consecutive jobs
//! is paid between jobs. The goal is to minimise the makespan, the
//! completion time of the last machine to finish.
//!
//! - [`problem`]: immutable instance data and the text-format loader.
//! - [`solution`]: the schedule with O(1) insert/remove/replace deltas,
//!   undo tokens and a lazily refreshed makespan machine.
//! - [`neighborhood`]: six move families (Shift, Switch, Task Move, Swap,
//!   Two-Shift, Direct Swap) with best/random neighbour queries and
//!   landscape statistics.
//! - [`sa`]: the annealing driver.
//! - [`construct`]: the random starting-solution heuristic.
//! - `batch` (feature `parallel`): independent runs on a rayon pool.
//!
//! # Example
//!
//! ```
//! use u_upmsp::problem::ProblemInstance;
//! use u_upmsp::sa::{Annealer, AnnealerConfig};
//!
//! let text = "\
//! 3 2 x x
//! 0 4 1 6
//! 0 5 1 2
//! 0 3 1 3
//! SSD
//! M0
//! 0 1 2
//! 1 0 1
//! 2 1 0
//! M1
//! 0 2 2
//! 1 0 3
//! 1 1 0
//! ";
//! let problem: ProblemInstance = text.parse().unwrap();
//! let config = AnnealerConfig::default()
//!     .with_iteration_limit(1_000)
//!     .with_seed(7);
//! let result = Annealer::run(&problem, &config);
//! assert!(result.best.is_feasible());
//! println!("{}", result.best);
//! ```
//!
//! Logging goes through `tracing`; install any subscriber to see run
//! progress.

#[cfg(feature = "parallel")]
pub mod batch;
pub mod construct;
pub mod neighborhood;
pub mod problem;
pub mod sa;
pub mod solution;
pub mod timer;
