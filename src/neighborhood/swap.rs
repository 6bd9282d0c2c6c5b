//! Swap: exchange jobs between two machines, reinserting each at any
//! position of its new machine.
//!
//! For machines with `c1` and `c2` jobs every job pair yields `c1 * c2`
//! placements, so the pair contributes `(c1 * c2)^2` candidates.

use super::{partners, pick_pair, sources, Move};
use crate::solution::{Refreshed, Solution};
use rand::Rng;

pub(super) fn enumerate<'p, F>(scratch: &mut Solution<'p>, target: Option<usize>, visit: &mut F)
where
    F: FnMut(Refreshed<'_, 'p>, Move),
{
    let m = scratch.problem().m();
    for first_machine in sources(scratch, target) {
        for first_source in 0..scratch.count(first_machine) {
            let a = scratch.job_at(first_machine, first_source);
            let r1 = scratch.remove(first_machine, first_source);
            for second_machine in partners(first_machine, m, target.is_some()) {
                for second_source in 0..scratch.count(second_machine) {
                    let b = scratch.job_at(second_machine, second_source);
                    let r2 = scratch.remove(second_machine, second_source);
                    for first_target in 0..=scratch.count(first_machine) {
                        let i1 = scratch.insert(b, first_machine, first_target);
                        for second_target in 0..=scratch.count(second_machine) {
                            let i2 = scratch.insert(a, second_machine, second_target);
                            visit(
                                scratch.refresh(),
                                Move::Swap {
                                    first_machine,
                                    first_source,
                                    second_machine,
                                    second_source,
                                    first_target,
                                    second_target,
                                },
                            );
                            scratch.revert(i2);
                        }
                        scratch.revert(i1);
                    }
                    scratch.revert(r2);
                }
            }
            scratch.revert(r1);
        }
    }
}

pub(super) fn sample<R: Rng + ?Sized>(
    solution: &Solution<'_>,
    rng: &mut R,
    target: Option<usize>,
) -> Option<Move> {
    let (first_machine, second_machine) = pick_pair(solution, rng, target)?;
    let c1 = solution.count(first_machine);
    let c2 = solution.count(second_machine);
    Some(Move::Swap {
        first_machine,
        first_source: rng.random_range(0..c1),
        second_machine,
        second_source: rng.random_range(0..c2),
        first_target: rng.random_range(0..c1),
        second_target: rng.random_range(0..c2),
    })
}
