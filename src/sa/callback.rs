//! Incumbent notifications.

use crate::solution::Solution;

/// Receives every new incumbent found by the annealer.
///
/// Called once with the starting solution (iteration 0, elapsed 0) and then
/// whenever the overall makespan strictly improves. The stopwatch is paused
/// while the callback runs, so its cost does not count against the time
/// budget.
///
/// Implemented for `()` (ignore everything), for any
/// `FnMut(&Solution, u64, u64)` closure and for [`IncumbentTrace`].
///
/// # Examples
///
/// ```
/// use u_upmsp::problem::ProblemInstance;
/// use u_upmsp::sa::{Annealer, AnnealerConfig};
///
/// let problem = ProblemInstance::from_fn(6, 2, |k, j| (k + j + 1) as u32, |_, _, _| 1).unwrap();
/// let config = AnnealerConfig::default().with_iteration_limit(100).with_seed(3);
///
/// let mut makespans = Vec::new();
/// let mut record = |best: &u_upmsp::solution::Solution<'_>, _iteration: u64, _nanos: u64| {
///     makespans.push(best.fresh().map(|view| view.makespan()));
/// };
/// let result = Annealer::run_with_callback(&problem, &config, &mut record);
/// assert_eq!(makespans.last().copied().flatten(), Some(result.best_makespan));
/// ```
pub trait IncumbentCallback {
    /// `incumbent` is refreshed; `elapsed_nanos` excludes paused time.
    fn on_new_incumbent(&mut self, incumbent: &Solution<'_>, iteration: u64, elapsed_nanos: u64);
}

impl IncumbentCallback for () {
    fn on_new_incumbent(&mut self, _: &Solution<'_>, _: u64, _: u64) {}
}

impl<F> IncumbentCallback for F
where
    F: FnMut(&Solution<'_>, u64, u64),
{
    fn on_new_incumbent(&mut self, incumbent: &Solution<'_>, iteration: u64, elapsed_nanos: u64) {
        self(incumbent, iteration, elapsed_nanos)
    }
}

/// An owned copy of one incumbent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incumbent {
    /// Iteration at which it was found (0 for the starting solution).
    pub iteration: u64,
    /// Counted search time in nanoseconds.
    pub elapsed_nanos: u64,
    pub makespan: i64,
    pub sum_makespan: i64,
    /// Job order of every machine.
    pub sequences: Vec<Vec<usize>>,
}

/// Collects every incumbent of a run, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncumbentTrace {
    pub incumbents: Vec<Incumbent>,
}

impl IncumbentTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent incumbent.
    pub fn last(&self) -> Option<&Incumbent> {
        self.incumbents.last()
    }

    pub fn len(&self) -> usize {
        self.incumbents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incumbents.is_empty()
    }
}

impl IncumbentCallback for IncumbentTrace {
    fn on_new_incumbent(&mut self, incumbent: &Solution<'_>, iteration: u64, elapsed_nanos: u64) {
        let mut snapshot = incumbent.clone();
        let quality = snapshot.refresh().quality();
        self.incumbents.push(Incumbent {
            iteration,
            elapsed_nanos,
            makespan: quality.makespan,
            sum_makespan: quality.sum_makespan,
            sequences: snapshot.sequences().to_vec(),
        });
    }
}
