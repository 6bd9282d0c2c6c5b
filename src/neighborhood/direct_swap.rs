//! Direct swap: exchange jobs between two machines in place.

use super::{partners, pick_pair, sources, Move};
use crate::solution::{Refreshed, Solution};
use rand::Rng;

pub(super) fn enumerate<'p, F>(scratch: &mut Solution<'p>, target: Option<usize>, visit: &mut F)
where
    F: FnMut(Refreshed<'_, 'p>, Move),
{
    let m = scratch.problem().m();
    for first_machine in sources(scratch, target) {
        for first_position in 0..scratch.count(first_machine) {
            for second_machine in partners(first_machine, m, target.is_some()) {
                for second_position in 0..scratch.count(second_machine) {
                    let a = scratch.job_at(first_machine, first_position);
                    let b = scratch.job_at(second_machine, second_position);
                    let e1 = scratch.replace(b, first_machine, first_position);
                    let e2 = scratch.replace(a, second_machine, second_position);
                    visit(
                        scratch.refresh(),
                        Move::DirectSwap {
                            first_machine,
                            first_position,
                            second_machine,
                            second_position,
                        },
                    );
                    scratch.revert(e2);
                    scratch.revert(e1);
                }
            }
        }
    }
}

pub(super) fn sample<R: Rng + ?Sized>(
    solution: &Solution<'_>,
    rng: &mut R,
    target: Option<usize>,
) -> Option<Move> {
    let (first_machine, second_machine) = pick_pair(solution, rng, target)?;
    let first_position = rng.random_range(0..solution.count(first_machine));
    let second_position = rng.random_range(0..solution.count(second_machine));
    Some(Move::DirectSwap {
        first_machine,
        first_position,
        second_machine,
        second_position,
    })
}
