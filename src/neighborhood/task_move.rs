//! Task move: move one job to any position of another machine.

use super::{pick_machine, pick_partner, sources, Move};
use crate::solution::{Refreshed, Solution};
use rand::Rng;

pub(super) fn enumerate<'p, F>(scratch: &mut Solution<'p>, target: Option<usize>, visit: &mut F)
where
    F: FnMut(Refreshed<'_, 'p>, Move),
{
    let m = scratch.problem().m();
    for source_machine in sources(scratch, target) {
        for source_position in 0..scratch.count(source_machine) {
            let job = scratch.job_at(source_machine, source_position);
            let removed = scratch.remove(source_machine, source_position);
            for target_machine in (0..m).filter(|&k| k != source_machine) {
                for target_position in 0..=scratch.count(target_machine) {
                    let inserted = scratch.insert(job, target_machine, target_position);
                    visit(
                        scratch.refresh(),
                        Move::TaskMove {
                            source_machine,
                            source_position,
                            target_machine,
                            target_position,
                        },
                    );
                    scratch.revert(inserted);
                }
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
    if solution.problem().m() < 2 {
        return None;
    }
    let source_machine = pick_machine(solution, rng, target, 1)?;
    let source_position = rng.random_range(0..solution.count(source_machine));
    let target_machine = pick_partner(solution, rng, source_machine, 0)?;
    let target_position = rng.random_range(0..=solution.count(target_machine));
    Some(Move::TaskMove {
        source_machine,
        source_position,
        target_machine,
        target_position,
    })
}

#[cfg(test)]
mod tests {
    use crate::neighborhood::testing::instance;
    use crate::neighborhood::Neighborhood;
    use crate::solution::Solution;

    #[test]
    fn test_size() {
        let problem = instance(5, 3);
        let solution = Solution::from_sequences(&problem, &[vec![0, 1, 2], vec![3, 4], vec![]]);
        // machine 0: 3 jobs into (2+1) + (0+1) slots, machine 1: 2 jobs into (3+1) + 1
        assert_eq!(Neighborhood::TaskMove.size(&solution, None), 3 * 4 + 2 * 5);
        assert_eq!(Neighborhood::TaskMove.size(&solution, Some(2)), 0);
    }

    #[test]
    fn test_can_empty_a_machine() {
        let problem = instance(2, 2);
        let solution = Solution::from_sequences(&problem, &[vec![0], vec![1]]);
        let mut scratch = solution.clone();
        let mut emptied = 0;
        Neighborhood::TaskMove.for_each_move(&mut scratch, Some(0), |view, _| {
            assert_eq!(view.count(0), 0);
            assert_eq!(view.count(1), 2);
            emptied += 1;
        });
        assert_eq!(emptied, 2);
    }

    #[test]
    fn test_moves_assignment() {
        let problem = instance(3, 2);
        let solution = Solution::from_sequences(&problem, &[vec![0, 1], vec![2]]);
        let mut scratch = solution.clone();
        Neighborhood::TaskMove.for_each_move(&mut scratch, None, |view, mv| {
            if let crate::neighborhood::Move::TaskMove {
                source_machine,
                source_position,
                target_machine,
                target_position,
            } = mv
            {
                let job = solution.job_at(source_machine, source_position);
                assert_eq!(view.job_at(target_machine, target_position), job);
                assert_eq!(view.assignment(job), Some(target_machine));
            } else {
                panic!("unexpected move {mv:?}");
            }
        });
    }
}
