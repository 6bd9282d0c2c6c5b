//! Construction heuristics for starting solutions.

use crate::problem::ProblemInstance;
use crate::solution::Solution;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds a random complete schedule.
///
/// Jobs are visited in a shuffled order and each is appended to a
/// uniformly drawn machine. The result is refreshed.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use u_upmsp::construct::random_solution;
/// use u_upmsp::problem::ProblemInstance;
///
/// let problem = ProblemInstance::from_fn(10, 3, |_, _| 5, |_, _, _| 1).unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let solution = random_solution(&problem, &mut rng);
/// assert!(solution.is_feasible());
/// ```
pub fn random_solution<'p, R: Rng + ?Sized>(
    problem: &'p ProblemInstance,
    rng: &mut R,
) -> Solution<'p> {
    let mut jobs: Vec<usize> = (0..problem.n()).collect();
    jobs.shuffle(rng);

    let mut solution = Solution::new(problem);
    for job in jobs {
        let machine = rng.random_range(0..problem.m());
        let _ = solution.push(job, machine);
    }
    solution.refresh();
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn problem() -> ProblemInstance {
        ProblemInstance::from_fn(20, 4, |k, j| (1 + j + k) as u32, |_, i, j| ((i + j) % 3) as u32)
            .unwrap()
    }

    #[test]
    fn test_random_solution_is_feasible() {
        let problem = problem();
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let solution = random_solution(&problem, &mut rng);
            assert_eq!(solution.audit(), Ok(()));
            assert!(solution.is_fresh());
        }
    }

    #[test]
    fn test_random_solution_is_deterministic() {
        let problem = problem();
        let a = random_solution(&problem, &mut ChaCha8Rng::seed_from_u64(7));
        let b = random_solution(&problem, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a.sequences(), b.sequences());
    }

    #[test]
    fn test_single_machine_gets_everything() {
        let problem = ProblemInstance::from_fn(5, 1, |_, _| 2, |_, _, _| 0).unwrap();
        let solution = random_solution(&problem, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(solution.count(0), 5);
        assert_eq!(solution.sum_makespan(), 10);
    }
}
