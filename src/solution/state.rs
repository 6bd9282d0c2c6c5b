//! The mutable schedule and its O(1) cost primitives.

use super::edit::Edit;
use crate::problem::ProblemInstance;
use std::fmt;
use std::ops::Deref;

/// Whether the cached makespan-machine index matches the makespan array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Freshness {
    Fresh,
    Stale,
}

/// The lexicographic objective pair: overall makespan first, then the sum
/// of all machines' makespans.
///
/// The derived ordering compares `makespan` before `sum_makespan`, which is
/// exactly the order used to rank neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quality {
    /// Completion time of the last-finishing machine.
    pub makespan: i64,
    /// Sum of every machine's completion time.
    pub sum_makespan: i64,
}

/// A (possibly partial) schedule for one [`ProblemInstance`].
///
/// Borrowing the instance keeps cost queries free of extra arguments and
/// lets clones stay cheap: only the per-machine vectors are copied.
///
/// # Examples
///
/// ```
/// use u_upmsp::problem::ProblemInstance;
/// use u_upmsp::solution::Solution;
///
/// let problem = ProblemInstance::from_fn(3, 2, |k, j| (k + j + 1) as u32, |_, _, _| 1).unwrap();
/// let mut solution = Solution::new(&problem);
/// let _ = solution.push(0, 0);
/// let _ = solution.push(1, 0);
/// let _ = solution.push(2, 1);
///
/// let view = solution.refresh();
/// assert_eq!(view.machine_makespan(0), 1 + 1 + 2);
/// assert_eq!(view.makespan(), 4);
/// assert_eq!(view.makespan_machine(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Solution<'p> {
    pub(super) problem: &'p ProblemInstance,
    pub(super) assignment: Vec<Option<usize>>,
    pub(super) sequences: Vec<Vec<usize>>,
    pub(super) makespan: Vec<i64>,
    pub(super) sum_makespan: i64,
    pub(super) makespan_machine: usize,
    pub(super) freshness: Freshness,
}

impl<'p> Solution<'p> {
    /// Creates an empty schedule: no job is assigned.
    pub fn new(problem: &'p ProblemInstance) -> Self {
        let n = problem.n();
        let m = problem.m();
        Self {
            problem,
            assignment: vec![None; n],
            sequences: (0..m).map(|_| Vec::with_capacity(n)).collect(),
            makespan: vec![0; m],
            sum_makespan: 0,
            makespan_machine: 0,
            freshness: Freshness::Fresh,
        }
    }

    /// Builds a schedule by appending each machine's jobs in order.
    ///
    /// The result is refreshed. Partition validity is not checked here; use
    /// [`audit`](Self::audit) for that.
    ///
    /// # Panics
    ///
    /// Panics if `sequences` has more entries than machines or references
    /// an out-of-range job.
    pub fn from_sequences(problem: &'p ProblemInstance, sequences: &[Vec<usize>]) -> Self {
        assert!(
            sequences.len() <= problem.m(),
            "{} sequences for {} machines",
            sequences.len(),
            problem.m()
        );
        let mut solution = Self::new(problem);
        for (machine, jobs) in sequences.iter().enumerate() {
            for &job in jobs {
                let _ = solution.push(job, machine);
            }
        }
        solution.refresh();
        solution
    }

    /// The instance this schedule belongs to.
    #[inline]
    pub fn problem(&self) -> &'p ProblemInstance {
        self.problem
    }

    /// Number of jobs on `machine`.
    #[inline]
    pub fn count(&self, machine: usize) -> usize {
        self.sequences[machine].len()
    }

    /// Job at `position` of `machine`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of range.
    #[inline]
    pub fn job_at(&self, machine: usize, position: usize) -> usize {
        self.sequences[machine][position]
    }

    /// Processing order of `machine`.
    #[inline]
    pub fn sequence(&self, machine: usize) -> &[usize] {
        &self.sequences[machine]
    }

    /// Processing order of every machine.
    #[inline]
    pub fn sequences(&self) -> &[Vec<usize>] {
        &self.sequences
    }

    /// Machine the job is assigned to, if any.
    #[inline]
    pub fn assignment(&self, job: usize) -> Option<usize> {
        self.assignment[job]
    }

    /// Completion time of `machine`.
    #[inline]
    pub fn machine_makespan(&self, machine: usize) -> i64 {
        self.makespan[machine]
    }

    /// Completion time of every machine.
    #[inline]
    pub fn machine_makespans(&self) -> &[i64] {
        &self.makespan
    }

    /// Sum of every machine's completion time.
    ///
    /// Always current; unlike the overall makespan it needs no refresh.
    #[inline]
    pub fn sum_makespan(&self) -> i64 {
        self.sum_makespan
    }

    /// Whether the makespan-machine index is current.
    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }

    // ---- O(1) cost deltas ----

    /// Change of `machine`'s completion time if `job` were inserted at `position`.
    pub fn insertion_delta(&self, job: usize, machine: usize, position: usize) -> i64 {
        self.check_job(job);
        let seq = &self.sequences[machine];
        assert!(
            position <= seq.len(),
            "invalid insert position {position} on machine {machine} with {} jobs",
            seq.len()
        );
        let p = self.problem;
        let processing = p.processing(machine, job);

        if seq.is_empty() {
            processing
        } else if position == 0 {
            p.setup(machine, job, seq[0]) + processing
        } else if position == seq.len() {
            p.setup(machine, seq[position - 1], job) + processing
        } else {
            let left = seq[position - 1];
            let right = seq[position];
            processing + p.setup(machine, left, job) + p.setup(machine, job, right)
                - p.setup(machine, left, right)
        }
    }

    /// Change of `machine`'s completion time if the job at `position` were removed.
    pub fn removal_delta(&self, machine: usize, position: usize) -> i64 {
        let seq = &self.sequences[machine];
        self.check_position(machine, position);
        let p = self.problem;
        let job = seq[position];

        if seq.len() == 1 {
            -self.makespan[machine]
        } else if position == 0 {
            -(p.setup(machine, job, seq[1]) + p.processing(machine, job))
        } else if position == seq.len() - 1 {
            -(p.setup(machine, seq[position - 1], job) + p.processing(machine, job))
        } else {
            let left = seq[position - 1];
            let right = seq[position + 1];
            p.setup(machine, left, right)
                - (p.setup(machine, left, job)
                    + p.processing(machine, job)
                    + p.setup(machine, job, right))
        }
    }

    /// Change of `machine`'s completion time if `job` overwrote the job at `position`.
    pub fn replacement_delta(&self, job: usize, machine: usize, position: usize) -> i64 {
        self.check_job(job);
        let seq = &self.sequences[machine];
        self.check_position(machine, position);
        let p = self.problem;
        let old = seq[position];

        let mut delta = p.processing(machine, job) - p.processing(machine, old);
        if position > 0 {
            let left = seq[position - 1];
            delta += p.setup(machine, left, job) - p.setup(machine, left, old);
        }
        if position + 1 < seq.len() {
            let right = seq[position + 1];
            delta += p.setup(machine, job, right) - p.setup(machine, old, right);
        }
        delta
    }

    // ---- Mutation primitives ----

    /// Inserts `job` at `position` (`0..=count`) of `machine`.
    ///
    /// # Panics
    ///
    /// Panics if `job`, `machine` or `position` is out of range.
    pub fn insert(&mut self, job: usize, machine: usize, position: usize) -> Edit {
        let delta = self.insertion_delta(job, machine, position);
        let prior = self.assignment[job];

        self.assignment[job] = Some(machine);
        self.sequences[machine].insert(position, job);
        self.apply_delta(machine, delta);

        Edit::Inserted {
            job,
            machine,
            position,
            prior,
        }
    }

    /// Appends `job` at the end of `machine`.
    pub fn push(&mut self, job: usize, machine: usize) -> Edit {
        let position = self.count(machine);
        self.insert(job, machine, position)
    }

    /// Removes the job at `position` of `machine`; the job becomes unassigned.
    ///
    /// # Panics
    ///
    /// Panics if `machine` or `position` is out of range.
    pub fn remove(&mut self, machine: usize, position: usize) -> Edit {
        let delta = self.removal_delta(machine, position);
        let job = self.sequences[machine].remove(position);
        let prior = self.assignment[job];

        self.assignment[job] = None;
        self.apply_delta(machine, delta);

        Edit::Removed {
            job,
            machine,
            position,
            prior,
        }
    }

    /// Overwrites the job at `position` of `machine` with `job`.
    ///
    /// Only `job`'s assignment is updated. The displaced job keeps its
    /// entry, so exchanges written as two replaces stay consistent.
    ///
    /// # Panics
    ///
    /// Panics if `job`, `machine` or `position` is out of range.
    pub fn replace(&mut self, job: usize, machine: usize, position: usize) -> Edit {
        let delta = self.replacement_delta(job, machine, position);
        let previous = std::mem::replace(&mut self.sequences[machine][position], job);
        let prior = self.assignment[job];

        self.assignment[job] = Some(machine);
        self.apply_delta(machine, delta);

        Edit::Replaced {
            job,
            previous,
            machine,
            position,
            prior,
        }
    }

    /// Applies the exact inverse of `edit`.
    ///
    /// Edits must be reverted in the reverse order they were produced.
    pub fn revert(&mut self, edit: Edit) {
        match edit {
            Edit::Inserted {
                job,
                machine,
                position,
                prior,
            } => {
                debug_assert_eq!(self.sequences[machine][position], job);
                let _ = self.remove(machine, position);
                self.assignment[job] = prior;
            }
            Edit::Removed {
                job,
                machine,
                position,
                prior,
            } => {
                let _ = self.insert(job, machine, position);
                self.assignment[job] = prior;
            }
            Edit::Replaced {
                job,
                previous,
                machine,
                position,
                prior,
            } => {
                debug_assert_eq!(self.sequences[machine][position], job);
                let _ = self.replace(previous, machine, position);
                self.assignment[job] = prior;
            }
        }
    }

    // ---- Lazy makespan machine ----

    /// Brings the makespan-machine index up to date and returns a view
    /// through which the overall makespan can be read.
    ///
    /// O(m) when stale, O(1) otherwise.
    pub fn refresh(&mut self) -> Refreshed<'_, 'p> {
        if self.freshness == Freshness::Stale {
            let mut best = 0;
            for k in 1..self.makespan.len() {
                if self.makespan[k] > self.makespan[best] {
                    best = k;
                }
            }
            self.makespan_machine = best;
            self.freshness = Freshness::Fresh;
        }
        Refreshed { solution: self }
    }

    /// The refreshed view, if no mutation happened since the last refresh.
    pub fn fresh(&self) -> Option<Refreshed<'_, 'p>> {
        match self.freshness {
            Freshness::Fresh => Some(Refreshed { solution: self }),
            Freshness::Stale => None,
        }
    }

    #[inline]
    fn apply_delta(&mut self, machine: usize, delta: i64) {
        self.makespan[machine] += delta;
        self.sum_makespan += delta;
        self.freshness = Freshness::Stale;
    }

    #[inline]
    fn check_job(&self, job: usize) {
        assert!(
            job < self.problem.n(),
            "invalid job {job} (instance has {} jobs)",
            self.problem.n()
        );
    }

    #[inline]
    fn check_position(&self, machine: usize, position: usize) {
        assert!(
            position < self.sequences[machine].len(),
            "invalid position {position} on machine {machine} with {} jobs",
            self.sequences[machine].len()
        );
    }
}

impl fmt::Display for Solution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, seq) in self.sequences.iter().enumerate() {
            write!(f, "Machine {k}: [")?;
            for (idx, job) in seq.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{job}")?;
            }
            writeln!(f, "] (makespan: {})", self.makespan[k])?;
        }
        Ok(())
    }
}

/// A read-only view of a [`Solution`] whose makespan machine is current.
///
/// Obtained from [`Solution::refresh`] or [`Solution::fresh`]. The overall
/// makespan is only exposed here, so it can never be read stale.
#[derive(Debug, Clone, Copy)]
pub struct Refreshed<'s, 'p> {
    solution: &'s Solution<'p>,
}

impl<'s, 'p> Refreshed<'s, 'p> {
    /// Completion time of the last-finishing machine.
    #[inline]
    pub fn makespan(&self) -> i64 {
        self.solution.makespan[self.solution.makespan_machine]
    }

    /// Index of the last-finishing machine (lowest index on ties).
    #[inline]
    pub fn makespan_machine(&self) -> usize {
        self.solution.makespan_machine
    }

    /// The (makespan, sum makespan) objective pair.
    #[inline]
    pub fn quality(&self) -> Quality {
        Quality {
            makespan: self.makespan(),
            sum_makespan: self.solution.sum_makespan,
        }
    }

    /// The underlying solution.
    #[inline]
    pub fn solution(&self) -> &'s Solution<'p> {
        self.solution
    }
}

impl<'p> Deref for Refreshed<'_, 'p> {
    type Target = Solution<'p>;

    fn deref(&self) -> &Self::Target {
        self.solution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform() -> ProblemInstance {
        ProblemInstance::new(
            3,
            2,
            vec![vec![4, 4, 4], vec![4, 4, 4]],
            vec![vec![vec![0; 3]; 3]; 2],
        )
        .unwrap()
    }

    fn asymmetric() -> ProblemInstance {
        ProblemInstance::from_fn(
            5,
            2,
            |k, j| (3 + 2 * j + 5 * k) as u32,
            |k, i, j| ((i * 7 + j * 3 + k) % 5) as u32,
        )
        .unwrap()
    }

    #[test]
    fn test_insert_into_empty_machine() {
        let problem = ProblemInstance::from_fn(2, 2, |_, j| if j == 0 { 5 } else { 3 }, |_, _, _| 9)
            .unwrap();
        let mut solution = Solution::new(&problem);
        let _ = solution.push(1, 1);
        let before = solution.machine_makespan(1);

        let _ = solution.insert(0, 0, 0);
        assert_eq!(solution.machine_makespan(0), 5);
        assert_eq!(solution.machine_makespan(1), before);
        assert_eq!(solution.assignment(0), Some(0));
    }

    #[test]
    fn test_sum_is_total_processing_without_setups() {
        let problem = uniform();
        for split in [vec![vec![0, 1, 2], vec![]], vec![vec![0], vec![2, 1]]] {
            let solution = Solution::from_sequences(&problem, &split);
            assert_eq!(solution.sum_makespan(), 12);
        }
    }

    #[test]
    fn test_insert_positions_match_scratch_cost() {
        let problem = asymmetric();
        let solution = Solution::from_sequences(&problem, &[vec![0, 1, 2], vec![3]]);
        // front, middle, back
        for position in [0, 2, 3] {
            let mut probe = solution.clone();
            let delta = probe.insertion_delta(4, 0, position);
            let _ = probe.insert(4, 0, position);
            assert_eq!(probe.sequence(0)[position], 4);
            assert_eq!(
                probe.machine_makespan(0),
                problem.sequence_cost(0, probe.sequence(0))
            );
            assert_eq!(probe.machine_makespan(0) - solution.machine_makespan(0), delta);
        }
    }

    #[test]
    fn test_remove_bridges_neighbours() {
        let problem = asymmetric();
        let mut solution = Solution::from_sequences(&problem, &[vec![0, 1, 2, 3], vec![4]]);
        let _ = solution.remove(0, 1);
        assert_eq!(solution.sequence(0), &[0, 2, 3]);
        assert_eq!(solution.assignment(1), None);
        assert_eq!(
            solution.machine_makespan(0),
            problem.sequence_cost(0, &[0, 2, 3])
        );

        let _ = solution.remove(1, 0);
        assert_eq!(solution.machine_makespan(1), 0);
        assert_eq!(
            solution.sum_makespan(),
            problem.sequence_cost(0, &[0, 2, 3])
        );
    }

    #[test]
    fn test_replace_matches_scratch_cost() {
        let problem = asymmetric();
        for position in 0..3 {
            let mut solution = Solution::from_sequences(&problem, &[vec![0, 1, 2], vec![3, 4]]);
            let _ = solution.replace(4, 0, position);
            assert_eq!(
                solution.machine_makespan(0),
                problem.sequence_cost(0, solution.sequence(0))
            );
        }
        let mut single = Solution::from_sequences(&problem, &[vec![0], vec![1]]);
        let _ = single.replace(1, 0, 0);
        assert_eq!(single.machine_makespan(0), problem.processing(0, 1));
    }

    #[test]
    fn test_revert_restores_state() {
        let problem = asymmetric();
        let original = Solution::from_sequences(&problem, &[vec![0, 1, 2], vec![3, 4]]);
        let mut solution = original.clone();

        let e1 = solution.remove(0, 1);
        let e2 = solution.insert(1, 1, 1);
        let e3 = solution.replace(0, 1, 0);
        let e4 = solution.replace(3, 0, 0);
        for edit in [e4, e3, e2, e1] {
            solution.revert(edit);
        }

        assert_eq!(solution.sequences(), original.sequences());
        assert_eq!(solution.machine_makespans(), original.machine_makespans());
        assert_eq!(solution.sum_makespan(), original.sum_makespan());
        assert_eq!(solution.assignment, original.assignment);
    }

    #[test]
    fn test_mutation_marks_stale() {
        let problem = asymmetric();
        let mut solution = Solution::from_sequences(&problem, &[vec![0, 1], vec![2, 3, 4]]);
        assert!(solution.fresh().is_some());
        let _ = solution.remove(1, 0);
        assert!(!solution.is_fresh());
        assert!(solution.fresh().is_none());
        solution.refresh();
        assert!(solution.is_fresh());
    }

    #[test]
    fn test_refresh_breaks_ties_low() {
        let problem = uniform();
        let mut solution = Solution::from_sequences(&problem, &[vec![0], vec![1]]);
        let view = solution.refresh();
        assert_eq!(view.makespan_machine(), 0);
        assert_eq!(view.makespan(), 4);

        let _ = solution.push(2, 1);
        let view = solution.refresh();
        assert_eq!(view.makespan_machine(), 1);
        assert_eq!(view.quality(), Quality { makespan: 8, sum_makespan: 12 });
    }

    #[test]
    fn test_quality_ordering_is_lexicographic() {
        let a = Quality { makespan: 10, sum_makespan: 50 };
        let b = Quality { makespan: 10, sum_makespan: 40 };
        let c = Quality { makespan: 9, sum_makespan: 90 };
        assert!(b < a);
        assert!(c < b);
    }

    #[test]
    #[should_panic(expected = "invalid insert position")]
    fn test_insert_out_of_range_panics() {
        let problem = uniform();
        let mut solution = Solution::new(&problem);
        let _ = solution.insert(0, 0, 1);
    }

    #[test]
    #[should_panic(expected = "invalid job")]
    fn test_invalid_job_panics() {
        let problem = uniform();
        let mut solution = Solution::new(&problem);
        let _ = solution.push(7, 0);
    }

    #[test]
    fn test_display() {
        let problem = uniform();
        let solution = Solution::from_sequences(&problem, &[vec![2, 0], vec![1]]);
        assert_eq!(
            solution.to_string(),
            "Machine 0: [2, 0] (makespan: 8)\nMachine 1: [1] (makespan: 4)\n"
        );
    }
}
