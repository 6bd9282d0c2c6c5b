//! Full consistency audit of a schedule.

use super::state::Solution;
use thiserror::Error;

/// The first violated invariant found by [`Solution::audit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Infeasibility {
    #[error("job {job} on machine {machine} is out of range [0, {n})")]
    JobOutOfRange { job: usize, machine: usize, n: usize },

    #[error("job {job} is not assigned to any machine")]
    Unscheduled { job: usize },

    #[error("job {job} is scheduled {times} times")]
    Duplicated { job: usize, times: usize },

    #[error("assignment of job {job} is wrong: found {recorded:?}, expected machine {machine}")]
    WrongAssignment {
        job: usize,
        machine: usize,
        recorded: Option<usize>,
    },

    #[error("makespan of machine {machine} is wrong: cached {cached}, expected {expected}")]
    MakespanMismatch {
        machine: usize,
        cached: i64,
        expected: i64,
    },

    #[error("sum of makespans is wrong: cached {cached}, expected {expected}")]
    SumMismatch { cached: i64, expected: i64 },

    #[error("makespan machine is wrong: cached {cached}, expected {expected}")]
    MakespanMachineMismatch { cached: usize, expected: usize },
}

impl Solution<'_> {
    /// Checks every structural invariant from scratch.
    ///
    /// Verifies that the machine sequences partition the job set, that the
    /// assignment table agrees with them, that each cached makespan (and
    /// their sum) equals a full recomputation, and that the cached makespan
    /// machine is the true argmax. O(n + m) plus the cost recomputation;
    /// meant for tests and validation, not the search loop. A stale
    /// solution fails the last check unless its index happens to be right,
    /// so refresh before auditing.
    pub fn audit(&self) -> Result<(), Infeasibility> {
        let n = self.problem.n();

        let mut counter = vec![0usize; n];
        for (machine, seq) in self.sequences.iter().enumerate() {
            for &job in seq {
                if job >= n {
                    return Err(Infeasibility::JobOutOfRange { job, machine, n });
                }
                counter[job] += 1;
            }
        }
        for (job, &times) in counter.iter().enumerate() {
            match times {
                0 => return Err(Infeasibility::Unscheduled { job }),
                1 => {}
                _ => return Err(Infeasibility::Duplicated { job, times }),
            }
        }

        for (machine, seq) in self.sequences.iter().enumerate() {
            for &job in seq {
                if self.assignment[job] != Some(machine) {
                    return Err(Infeasibility::WrongAssignment {
                        job,
                        machine,
                        recorded: self.assignment[job],
                    });
                }
            }
        }

        let mut expected_machine = 0;
        let mut expected_sum = 0;
        for (machine, seq) in self.sequences.iter().enumerate() {
            let expected = self.problem.sequence_cost(machine, seq);
            if expected != self.makespan[machine] {
                return Err(Infeasibility::MakespanMismatch {
                    machine,
                    cached: self.makespan[machine],
                    expected,
                });
            }
            if expected > self.makespan[expected_machine] {
                expected_machine = machine;
            }
            expected_sum += expected;
        }

        if expected_sum != self.sum_makespan {
            return Err(Infeasibility::SumMismatch {
                cached: self.sum_makespan,
                expected: expected_sum,
            });
        }
        if expected_machine != self.makespan_machine {
            return Err(Infeasibility::MakespanMachineMismatch {
                cached: self.makespan_machine,
                expected: expected_machine,
            });
        }

        Ok(())
    }

    /// Whether [`audit`](Self::audit) passes.
    pub fn is_feasible(&self) -> bool {
        self.audit().is_ok()
    }

    /// Audit outcome as a flag plus a human-readable message.
    pub fn feasibility_report(&self) -> (bool, String) {
        match self.audit() {
            Ok(()) => (true, "The solution is feasible".to_string()),
            Err(err) => (false, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::ProblemInstance;
    use crate::solution::{Infeasibility, Solution};

    fn problem() -> ProblemInstance {
        ProblemInstance::from_fn(4, 2, |k, j| (2 + j + k) as u32, |_, i, j| (i + j) as u32 % 3)
            .unwrap()
    }

    #[test]
    fn test_feasible() {
        let problem = problem();
        let solution = Solution::from_sequences(&problem, &[vec![3, 0], vec![2, 1]]);
        assert_eq!(solution.audit(), Ok(()));
        assert_eq!(
            solution.feasibility_report(),
            (true, "The solution is feasible".to_string())
        );
    }

    #[test]
    fn test_missing_job() {
        let problem = problem();
        let solution = Solution::from_sequences(&problem, &[vec![3, 0], vec![2]]);
        assert_eq!(solution.audit(), Err(Infeasibility::Unscheduled { job: 1 }));
        assert!(!solution.is_feasible());
    }

    #[test]
    fn test_duplicate_job() {
        let problem = problem();
        let mut solution = Solution::from_sequences(&problem, &[vec![3, 0, 1], vec![2]]);
        let _ = solution.replace(0, 0, 2);
        let _ = solution.push(1, 1);
        solution.refresh();
        assert_eq!(
            solution.audit(),
            Err(Infeasibility::Duplicated { job: 0, times: 2 })
        );
    }

    #[test]
    fn test_wrong_assignment() {
        let problem = problem();
        let mut solution = Solution::from_sequences(&problem, &[vec![3, 0], vec![2, 1]]);
        solution.assignment[2] = Some(0);
        assert!(matches!(
            solution.audit(),
            Err(Infeasibility::WrongAssignment { job: 2, machine: 1, .. })
        ));
    }

    #[test]
    fn test_corrupted_makespan() {
        let problem = problem();
        let mut solution = Solution::from_sequences(&problem, &[vec![3, 0], vec![2, 1]]);
        solution.makespan[1] += 1;
        let (ok, message) = solution.feasibility_report();
        assert!(!ok);
        assert!(message.contains("machine 1"), "{message}");
    }

    #[test]
    fn test_stale_makespan_machine() {
        let problem = problem();
        let mut solution = Solution::from_sequences(&problem, &[vec![3, 0, 1, 2], vec![]]);
        assert!(solution.is_feasible());
        for _ in 0..4 {
            let job = solution.job_at(0, 0);
            let _ = solution.remove(0, 0);
            let _ = solution.push(job, 1);
        }
        assert!(matches!(
            solution.audit(),
            Err(Infeasibility::MakespanMachineMismatch { cached: 0, expected: 1 })
        ));
        solution.refresh();
        assert!(solution.is_feasible());
    }
}
