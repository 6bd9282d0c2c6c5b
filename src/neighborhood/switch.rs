//! Switch: exchange two jobs of the same machine.
//!
//! Every unordered pair of positions is visited once, so a machine with
//! `c` jobs yields `c * (c - 1) / 2` candidates.

use super::{pick_machine, sources, Move};
use crate::solution::{Refreshed, Solution};
use rand::Rng;

pub(super) fn enumerate<'p, F>(scratch: &mut Solution<'p>, target: Option<usize>, visit: &mut F)
where
    F: FnMut(Refreshed<'_, 'p>, Move),
{
    for machine in sources(scratch, target) {
        let count = scratch.count(machine);
        for first in 0..count {
            for second in first + 1..count {
                let a = scratch.job_at(machine, first);
                let b = scratch.job_at(machine, second);
                let e1 = scratch.replace(a, machine, second);
                let e2 = scratch.replace(b, machine, first);
                visit(
                    scratch.refresh(),
                    Move::Switch {
                        machine,
                        first,
                        second,
                    },
                );
                scratch.revert(e2);
                scratch.revert(e1);
            }
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
    let x = rng.random_range(0..count);
    let y = loop {
        let y = rng.random_range(0..count);
        if y != x {
            break y;
        }
    };
    Some(Move::Switch {
        machine,
        first: x.min(y),
        second: x.max(y),
    })
}
