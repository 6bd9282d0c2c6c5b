//! Move descriptors and their application.

use crate::solution::{Edit, Solution};

/// One concrete perturbation of a [`Solution`].
///
/// Positions follow the order in which the move is carried out: a target
/// position is an index into the sequence *after* the source job(s) have
/// been removed. This is the same order the enumeration uses, so a
/// descriptor reported to a visitor can be replayed with [`Move::apply`]
/// on an unchanged copy of the starting solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Move the job at `from` to `to` on the same machine.
    Shift {
        machine: usize,
        from: usize,
        to: usize,
    },

    /// Exchange the jobs at `first` and `second` on the same machine.
    Switch {
        machine: usize,
        first: usize,
        second: usize,
    },

    /// Move the job at `source_position` of `source_machine` to
    /// `target_position` of `target_machine`.
    TaskMove {
        source_machine: usize,
        source_position: usize,
        target_machine: usize,
        target_position: usize,
    },

    /// Exchange one job of each machine, each landing at a free position.
    Swap {
        first_machine: usize,
        first_source: usize,
        second_machine: usize,
        second_source: usize,
        first_target: usize,
        second_target: usize,
    },

    /// Exchange one job of each machine, each taking the other's slot.
    DirectSwap {
        first_machine: usize,
        first_position: usize,
        second_machine: usize,
        second_position: usize,
    },

    /// Relocate two jobs of the same machine.
    TwoShift {
        machine: usize,
        first_source: usize,
        second_source: usize,
        first_target: usize,
        second_target: usize,
    },
}

impl Move {
    /// Applies the move through the solution's primitives.
    ///
    /// The returned token undoes it exactly.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor does not fit the solution's current shape.
    pub fn apply(&self, solution: &mut Solution<'_>) -> AppliedMove {
        let mut edits = Vec::with_capacity(4);
        match *self {
            Move::Shift { machine, from, to } => {
                let job = solution.job_at(machine, from);
                edits.push(solution.remove(machine, from));
                edits.push(solution.insert(job, machine, to));
            }
            Move::Switch {
                machine,
                first,
                second,
            } => {
                let a = solution.job_at(machine, first);
                let b = solution.job_at(machine, second);
                edits.push(solution.replace(a, machine, second));
                edits.push(solution.replace(b, machine, first));
            }
            Move::TaskMove {
                source_machine,
                source_position,
                target_machine,
                target_position,
            } => {
                let job = solution.job_at(source_machine, source_position);
                edits.push(solution.remove(source_machine, source_position));
                edits.push(solution.insert(job, target_machine, target_position));
            }
            Move::Swap {
                first_machine,
                first_source,
                second_machine,
                second_source,
                first_target,
                second_target,
            } => {
                let a = solution.job_at(first_machine, first_source);
                edits.push(solution.remove(first_machine, first_source));
                let b = solution.job_at(second_machine, second_source);
                edits.push(solution.remove(second_machine, second_source));
                edits.push(solution.insert(b, first_machine, first_target));
                edits.push(solution.insert(a, second_machine, second_target));
            }
            Move::DirectSwap {
                first_machine,
                first_position,
                second_machine,
                second_position,
            } => {
                let a = solution.job_at(first_machine, first_position);
                let b = solution.job_at(second_machine, second_position);
                edits.push(solution.replace(b, first_machine, first_position));
                edits.push(solution.replace(a, second_machine, second_position));
            }
            Move::TwoShift {
                machine,
                first_source,
                second_source,
                first_target,
                second_target,
            } => {
                let a = solution.job_at(machine, first_source);
                edits.push(solution.remove(machine, first_source));
                let b = solution.job_at(machine, second_source);
                edits.push(solution.remove(machine, second_source));
                edits.push(solution.insert(a, machine, first_target));
                edits.push(solution.insert(b, machine, second_target));
            }
        }
        AppliedMove { mv: *self, edits }
    }

    /// Machines whose sequence the move changes.
    pub fn machines(&self) -> (usize, Option<usize>) {
        match *self {
            Move::Shift { machine, .. }
            | Move::Switch { machine, .. }
            | Move::TwoShift { machine, .. } => (machine, None),
            Move::TaskMove {
                source_machine,
                target_machine,
                ..
            } => (source_machine, Some(target_machine)),
            Move::Swap {
                first_machine,
                second_machine,
                ..
            }
            | Move::DirectSwap {
                first_machine,
                second_machine,
                ..
            } => (first_machine, Some(second_machine)),
        }
    }
}

/// A move that has been applied, holding the edits needed to undo it.
#[must_use = "an applied move must be undone or explicitly kept"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    mv: Move,
    edits: Vec<Edit>,
}

impl AppliedMove {
    /// The move that was applied.
    pub fn descriptor(&self) -> Move {
        self.mv
    }

    /// Reverts every edit in reverse order.
    pub fn undo(self, solution: &mut Solution<'_>) {
        for edit in self.edits.into_iter().rev() {
            solution.revert(edit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ProblemInstance;

    fn problem() -> ProblemInstance {
        ProblemInstance::from_fn(
            6,
            3,
            |k, j| (1 + (j * 5 + k * 3) % 7) as u32,
            |k, i, j| ((i + 2 * j + k) % 4) as u32,
        )
        .unwrap()
    }

    fn start(problem: &ProblemInstance) -> Solution<'_> {
        Solution::from_sequences(problem, &[vec![0, 1, 2], vec![3, 4], vec![5]])
    }

    fn every_kind() -> Vec<Move> {
        vec![
            Move::Shift { machine: 0, from: 0, to: 2 },
            Move::Switch { machine: 0, first: 0, second: 2 },
            Move::TaskMove {
                source_machine: 1,
                source_position: 1,
                target_machine: 2,
                target_position: 0,
            },
            Move::Swap {
                first_machine: 0,
                first_source: 1,
                second_machine: 1,
                second_source: 0,
                first_target: 2,
                second_target: 1,
            },
            Move::DirectSwap {
                first_machine: 0,
                first_position: 2,
                second_machine: 2,
                second_position: 0,
            },
            Move::TwoShift {
                machine: 0,
                first_source: 0,
                second_source: 1,
                first_target: 1,
                second_target: 0,
            },
        ]
    }

    #[test]
    fn test_apply_keeps_solution_feasible() {
        let problem = problem();
        for mv in every_kind() {
            let mut solution = start(&problem);
            let _ = mv.apply(&mut solution);
            solution.refresh();
            assert_eq!(solution.audit(), Ok(()), "{mv:?}");
        }
    }

    #[test]
    fn test_apply_then_undo_restores() {
        let problem = problem();
        let original = start(&problem);
        for mv in every_kind() {
            let mut solution = original.clone();
            let applied = mv.apply(&mut solution);
            assert_eq!(applied.descriptor(), mv);
            applied.undo(&mut solution);
            assert_eq!(solution.sequences(), original.sequences(), "{mv:?}");
            assert_eq!(solution.machine_makespans(), original.machine_makespans());
            assert_eq!(solution.sum_makespan(), original.sum_makespan());
            for job in 0..problem.n() {
                assert_eq!(solution.assignment(job), original.assignment(job));
            }
        }
    }

    #[test]
    fn test_shift_semantics() {
        let problem = problem();
        let mut solution = start(&problem);
        let _ = Move::Shift { machine: 0, from: 0, to: 2 }.apply(&mut solution);
        assert_eq!(solution.sequence(0), &[1, 2, 0]);
    }

    #[test]
    fn test_swap_semantics() {
        let problem = problem();
        let mut solution = start(&problem);
        let _ = Move::Swap {
            first_machine: 0,
            first_source: 1,
            second_machine: 1,
            second_source: 0,
            first_target: 0,
            second_target: 1,
        }
        .apply(&mut solution);
        assert_eq!(solution.sequence(0), &[3, 0, 2]);
        assert_eq!(solution.sequence(1), &[4, 1]);
        assert_eq!(solution.assignment(1), Some(1));
        assert_eq!(solution.assignment(3), Some(0));
    }

    #[test]
    fn test_direct_swap_semantics() {
        let problem = problem();
        let mut solution = start(&problem);
        let _ = Move::DirectSwap {
            first_machine: 0,
            first_position: 2,
            second_machine: 1,
            second_position: 0,
        }
        .apply(&mut solution);
        assert_eq!(solution.sequence(0), &[0, 1, 3]);
        assert_eq!(solution.sequence(1), &[2, 4]);
        assert_eq!(solution.assignment(2), Some(1));
        assert_eq!(solution.assignment(3), Some(0));
    }

    #[test]
    fn test_machines() {
        let (first, second) = Move::TaskMove {
            source_machine: 2,
            source_position: 0,
            target_machine: 0,
            target_position: 0,
        }
        .machines();
        assert_eq!((first, second), (2, Some(0)));
    }
}
