//! Local-search neighbourhoods.
//!
//! Six move families perturb a [`Solution`]. Each family exposes the same
//! three queries through [`Neighborhood`]:
//!
//! - [`best_neighbor`](Neighborhood::best_neighbor) - exhaustive scan for
//!   the lexicographically best candidate
//! - [`any_neighbor`](Neighborhood::any_neighbor) - one randomly drawn
//!   candidate
//! - [`stats`](Neighborhood::stats) - classification of every candidate
//!
//! All three are driven by a single enumeration per family
//! ([`for_each_move`](Neighborhood::for_each_move)) that mutates a scratch
//! copy in place, hands a refreshed view to a visitor and undoes the move
//! before the next one.
//!
//! An optional *target machine* restricts a query to moves touching that
//! machine: single-machine families operate on it alone, two-machine
//! families use it as the source and pair it with every other machine.

mod direct_swap;
mod moves;
mod shift;
mod stats;
mod swap;
mod switch;
mod task_move;
mod two_shift;

pub use moves::{AppliedMove, Move};
pub use stats::{ClassStats, DeltaSummary, NeighborhoodStats, Relation, StatsClass};

use crate::solution::{Refreshed, Solution};
use rand::Rng;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// A move family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Neighborhood {
    /// Move one job to another position of the same machine.
    Shift,
    /// Exchange two jobs of the same machine.
    Switch,
    /// Move one job to any position of another machine.
    TaskMove,
    /// Exchange jobs between two machines, reinserting each anywhere.
    Swap,
    /// Relocate two jobs within the same machine.
    TwoShift,
    /// Exchange jobs between two machines, each taking the other's slot.
    DirectSwap,
}

/// Error returned when parsing an unknown neighbourhood key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown neighborhood '{0}' (expected one of: shift, switch, task-move, swap, two-shift, direct-swap)")]
pub struct UnknownNeighborhood(pub String);

impl Neighborhood {
    /// Every family, in the order the annealer enables them.
    pub const ALL: [Neighborhood; 6] = [
        Neighborhood::Shift,
        Neighborhood::Switch,
        Neighborhood::TaskMove,
        Neighborhood::Swap,
        Neighborhood::TwoShift,
        Neighborhood::DirectSwap,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Neighborhood::Shift => "Shift",
            Neighborhood::Switch => "Switch",
            Neighborhood::TaskMove => "Task Move",
            Neighborhood::Swap => "Swap",
            Neighborhood::TwoShift => "Two-Shift",
            Neighborhood::DirectSwap => "Direct Swap",
        }
    }

    /// Short identifier used in configuration.
    pub fn key(&self) -> &'static str {
        match self {
            Neighborhood::Shift => "shift",
            Neighborhood::Switch => "switch",
            Neighborhood::TaskMove => "task-move",
            Neighborhood::Swap => "swap",
            Neighborhood::TwoShift => "two-shift",
            Neighborhood::DirectSwap => "direct-swap",
        }
    }

    /// Visits every candidate of this family around `scratch`.
    ///
    /// The visitor sees the candidate through a refreshed view together with
    /// its descriptor. The move is undone before the next one is made, so
    /// after the call `scratch` holds its original schedule again (only the
    /// makespan-machine index may have been refreshed). Candidates are
    /// produced in a fixed order; see each family for details.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not a machine of the instance. A panic raised
    /// by `visit` propagates with the current candidate still applied, so
    /// `scratch` must be discarded if the unwind is caught. Pass a clone
    /// when the original schedule has to survive.
    pub fn for_each_move<'p, F>(
        &self,
        scratch: &mut Solution<'p>,
        target: Option<usize>,
        mut visit: F,
    ) where
        F: FnMut(Refreshed<'_, 'p>, Move),
    {
        check_target(scratch, target);
        match self {
            Neighborhood::Shift => shift::enumerate(scratch, target, &mut visit),
            Neighborhood::Switch => switch::enumerate(scratch, target, &mut visit),
            Neighborhood::TaskMove => task_move::enumerate(scratch, target, &mut visit),
            Neighborhood::Swap => swap::enumerate(scratch, target, &mut visit),
            Neighborhood::TwoShift => two_shift::enumerate(scratch, target, &mut visit),
            Neighborhood::DirectSwap => direct_swap::enumerate(scratch, target, &mut visit),
        }
    }

    /// The candidate with the lexicographically smallest
    /// (makespan, sum makespan), or an unchanged copy when no candidate
    /// strictly improves on `solution`.
    ///
    /// Ties go to the first candidate in enumeration order.
    pub fn best_neighbor<'p>(
        &self,
        solution: &Solution<'p>,
        target: Option<usize>,
    ) -> Solution<'p> {
        let mut scratch = solution.clone();
        let mut best = scratch.refresh().quality();
        let mut best_move = None;

        self.for_each_move(&mut scratch, target, |view, mv| {
            let quality = view.quality();
            if quality < best {
                best = quality;
                best_move = Some(mv);
            }
        });

        if let Some(mv) = best_move {
            let _kept = mv.apply(&mut scratch);
        }
        scratch.refresh();
        scratch
    }

    /// Draws one valid move of this family at random.
    ///
    /// Returns `None` when the family has no candidate on `solution` (for
    /// example Shift when every machine holds fewer than two jobs).
    ///
    /// # Panics
    ///
    /// Panics if `target` is not a machine of the instance.
    pub fn random_move<R: Rng + ?Sized>(
        &self,
        solution: &Solution<'_>,
        rng: &mut R,
        target: Option<usize>,
    ) -> Option<Move> {
        check_target(solution, target);
        match self {
            Neighborhood::Shift => shift::sample(solution, rng, target),
            Neighborhood::Switch => switch::sample(solution, rng, target),
            Neighborhood::TaskMove => task_move::sample(solution, rng, target),
            Neighborhood::Swap => swap::sample(solution, rng, target),
            Neighborhood::TwoShift => two_shift::sample(solution, rng, target),
            Neighborhood::DirectSwap => direct_swap::sample(solution, rng, target),
        }
    }

    /// A copy of `solution` with one random move applied.
    ///
    /// The copy is unchanged when the family has no candidate. It is always
    /// returned refreshed.
    pub fn any_neighbor<'p, R: Rng + ?Sized>(
        &self,
        solution: &Solution<'p>,
        rng: &mut R,
        target: Option<usize>,
    ) -> Solution<'p> {
        let mut neighbor = solution.clone();
        if let Some(mv) = self.random_move(solution, rng, target) {
            let _kept = mv.apply(&mut neighbor);
        }
        neighbor.refresh();
        neighbor
    }

    /// Classifies every candidate against `solution`.
    pub fn stats(&self, solution: &Solution<'_>) -> NeighborhoodStats {
        let mut scratch = solution.clone();
        let baseline = scratch.refresh().quality();
        let mut stats = NeighborhoodStats::new(*self, baseline);
        self.for_each_move(&mut scratch, None, |view, _| stats.register(view.quality()));
        stats
    }

    /// Number of candidates around `solution`.
    pub fn size(&self, solution: &Solution<'_>, target: Option<usize>) -> u64 {
        let mut scratch = solution.clone();
        let mut size = 0;
        self.for_each_move(&mut scratch, target, |_, _| size += 1);
        size
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Neighborhood {
    type Err = UnknownNeighborhood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Neighborhood::ALL
            .into_iter()
            .find(|nb| nb.key() == key)
            .ok_or_else(|| UnknownNeighborhood(s.to_string()))
    }
}

fn check_target(solution: &Solution<'_>, target: Option<usize>) {
    if let Some(machine) = target {
        let m = solution.problem().m();
        assert!(machine < m, "invalid target machine {machine} (instance has {m} machines)");
    }
}

/// Source machines to enumerate: the target alone, or all of them.
fn sources(solution: &Solution<'_>, target: Option<usize>) -> Range<usize> {
    match target {
        Some(machine) => machine..machine + 1,
        None => 0..solution.problem().m(),
    }
}

/// Second machines paired with `first`.
///
/// Targeted scans pair the target with every other machine; untargeted
/// scans visit each unordered pair once.
fn partners(first: usize, m: usize, targeted: bool) -> impl Iterator<Item = usize> {
    let start = if targeted { 0 } else { first + 1 };
    (start..m).filter(move |&k| k != first)
}

/// Draws a machine holding at least `min_jobs` jobs.
fn pick_machine<R: Rng + ?Sized>(
    solution: &Solution<'_>,
    rng: &mut R,
    target: Option<usize>,
    min_jobs: usize,
) -> Option<usize> {
    if let Some(machine) = target {
        return (solution.count(machine) >= min_jobs).then_some(machine);
    }
    let m = solution.problem().m();
    if !(0..m).any(|k| solution.count(k) >= min_jobs) {
        return None;
    }
    loop {
        let machine = rng.random_range(0..m);
        if solution.count(machine) >= min_jobs {
            return Some(machine);
        }
    }
}

/// Draws a machine other than `first` holding at least `min_jobs` jobs.
fn pick_partner<R: Rng + ?Sized>(
    solution: &Solution<'_>,
    rng: &mut R,
    first: usize,
    min_jobs: usize,
) -> Option<usize> {
    let m = solution.problem().m();
    if !(0..m).any(|k| k != first && solution.count(k) >= min_jobs) {
        return None;
    }
    loop {
        let machine = rng.random_range(0..m);
        if machine != first && solution.count(machine) >= min_jobs {
            return Some(machine);
        }
    }
}

/// Draws two distinct non-empty machines for an exchange.
///
/// Untargeted draws are ordered low to high, matching the enumeration of
/// unordered pairs.
fn pick_pair<R: Rng + ?Sized>(
    solution: &Solution<'_>,
    rng: &mut R,
    target: Option<usize>,
) -> Option<(usize, usize)> {
    let first = pick_machine(solution, rng, target, 1)?;
    let second = pick_partner(solution, rng, first, 1)?;
    if target.is_none() && second < first {
        Some((second, first))
    } else {
        Some((first, second))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::problem::ProblemInstance;

    /// Small instance with asymmetric costs on every machine.
    pub fn instance(n: usize, m: usize) -> ProblemInstance {
        ProblemInstance::from_fn(
            n,
            m,
            |k, j| (4 + (j * 7 + k * 5) % 11) as u32,
            |k, i, j| if i == j { 0 } else { ((i * 3 + j * 5 + k * 2) % 6) as u32 },
        )
        .unwrap()
    }
}
