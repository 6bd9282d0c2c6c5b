//! Shift: move one job to another position of the same machine.
//!
//! For each machine with at least two jobs and each source position, the
//! job is taken out and reinserted at every position of the shortened
//! sequence except the one it came from. A machine with `c` jobs yields
//! `c * (c - 1)` candidates.

use super::{pick_machine, sources, Move};
use crate::solution::{Refreshed, Solution};
use rand::Rng;

pub(super) fn enumerate<'p, F>(scratch: &mut Solution<'p>, target: Option<usize>, visit: &mut F)
where
    F: FnMut(Refreshed<'_, 'p>, Move),
{
    for machine in sources(scratch, target) {
        let count = scratch.count(machine);
        if count < 2 {
            continue;
        }
        for from in 0..count {
            let job = scratch.job_at(machine, from);
            let removed = scratch.remove(machine, from);
            for to in 0..count {
                if to == from {
                    continue;
                }
                let inserted = scratch.insert(job, machine, to);
                visit(scratch.refresh(), Move::Shift { machine, from, to });
                scratch.revert(inserted);
            }
            scratch.revert(removed);
        }
    }
}

pub(super) fn sample<R: Rng + ?Sized>(
    solution: &Solution<'_>,
    rng: &mut R,
    target: Option<usize>,
) -> Option<Move> {
    let machine = pick_machine(solution, rng, target, 2)?;
    let count = solution.count(machine);
    let from = rng.random_range(0..count);
    let to = loop {
        let to = rng.random_range(0..count);
        if to != from {
            break to;
        }
    };
    Some(Move::Shift { machine, from, to })
}
