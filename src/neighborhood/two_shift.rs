//! Two-shift: relocate two jobs within the same machine.
//!
//! The first job is taken out, then a second one from the remaining
//! positions at or after the first's index. The first job is reinserted
//! at every position of the shortened sequence, then the second one. A
//! machine with `c >= 2` jobs yields `c * (c - 1) / 2 * (c - 1) * c`
//! candidates, some of which repeat an ordering or leave it unchanged.

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
        for first_source in 0..count {
            let a = scratch.job_at(machine, first_source);
            let r1 = scratch.remove(machine, first_source);
            for second_source in first_source..count - 1 {
                let b = scratch.job_at(machine, second_source);
                let r2 = scratch.remove(machine, second_source);
                for first_target in 0..=count - 2 {
                    let i1 = scratch.insert(a, machine, first_target);
                    for second_target in 0..=count - 1 {
                        let i2 = scratch.insert(b, machine, second_target);
                        visit(
                            scratch.refresh(),
                            Move::TwoShift {
                                machine,
                                first_source,
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
            scratch.revert(r1);
        }
    }
}

/// Draws the two removals and reinsertions uniformly at each step: the
/// first job from the whole machine, the second from what remains, then
/// a slot for each. A draw whose second job lies before the first is
/// rewritten as the enumerated move that removes the same two jobs in
/// index order and lands them on the same final positions.
pub(super) fn sample<R: Rng + ?Sized>(
    solution: &Solution<'_>,
    rng: &mut R,
    target: Option<usize>,
) -> Option<Move> {
    let machine = pick_machine(solution, rng, target, 2)?;
    let count = solution.count(machine);
    let first_source = rng.random_range(0..count);
    let second_source = rng.random_range(0..count - 1);
    let first_target = rng.random_range(0..count - 1);
    let second_target = rng.random_range(0..count);

    if second_source >= first_source {
        return Some(Move::TwoShift {
            machine,
            first_source,
            second_source,
            first_target,
            second_target,
        });
    }

    // Final positions of the job drawn first and the job drawn second.
    let first_lands = if first_target < second_target {
        first_target
    } else {
        first_target + 1
    };
    let second_lands = second_target;
    Some(Move::TwoShift {
        machine,
        first_source: second_source,
        second_source: first_source - 1,
        first_target: if second_lands < first_lands {
            second_lands
        } else {
            second_lands - 1
        },
        second_target: first_lands,
    })
}
