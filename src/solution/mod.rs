//! Schedule representation with incremental cost bookkeeping.
//!
//! A [`Solution`] keeps one ordered job sequence per machine together with
//! each machine's completion time and the sum over all machines. Every
//! mutation goes through three primitives (`insert`, `remove`, `replace`)
//! whose cost delta is computed in O(1) from the immediate neighbours of the
//! touched slot, so neighbourhood operators can probe thousands of
//! candidates per millisecond.
//!
//! Each primitive returns an [`Edit`] token holding exactly what is needed
//! to invert it. Reverting a token restores the makespans, sequences and
//! assignments bit for bit.
//!
//! The index of the makespan machine is maintained lazily: mutations mark
//! the solution stale, and the overall makespan can only be read through a
//! [`Refreshed`] view obtained from [`Solution::refresh`].

mod audit;
mod edit;
mod state;

pub use audit::Infeasibility;
pub use edit::Edit;
pub use state::{Quality, Refreshed, Solution};
