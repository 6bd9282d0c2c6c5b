//! Immutable instance data.

use super::error::InstanceError;
use std::path::Path;
use std::str::FromStr;

/// An immutable UPMSP-SDST instance.
///
/// Holds `n` jobs and `m` machines, the processing time `p[k][j]` of job
/// `j` on machine `k`, and the setup time `s[k][i][j]` incurred on machine
/// `k` when job `i` immediately precedes job `j`.
///
/// Values are stored row-major in flat buffers; accessors widen them to
/// `i64` so cost deltas can be computed without casts at the call sites.
///
/// # Examples
///
/// ```
/// use u_upmsp::problem::ProblemInstance;
///
/// let problem = ProblemInstance::new(
///     2,
///     1,
///     vec![vec![3, 4]],
///     vec![vec![vec![0, 1], vec![2, 0]]],
/// )
/// .unwrap();
/// assert_eq!(problem.processing(0, 1), 4);
/// assert_eq!(problem.setup(0, 1, 0), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemInstance {
    n: usize,
    m: usize,
    processing: Vec<u32>,
    setup: Vec<u32>,
}

impl ProblemInstance {
    /// Builds an instance from nested tables, validating their shapes.
    ///
    /// `p` must be `m x n` and `s` must be `m x n x n`.
    pub fn new(
        n: usize,
        m: usize,
        p: Vec<Vec<u32>>,
        s: Vec<Vec<Vec<u32>>>,
    ) -> Result<Self, InstanceError> {
        if m == 0 {
            return Err(InstanceError::NoMachines);
        }
        if p.len() != m {
            return Err(InstanceError::ProcessingRows {
                expected: m,
                found: p.len(),
            });
        }
        for (machine, row) in p.iter().enumerate() {
            if row.len() != n {
                return Err(InstanceError::ProcessingColumns {
                    machine,
                    expected: n,
                    found: row.len(),
                });
            }
        }
        if s.len() != m {
            return Err(InstanceError::SetupMatrices {
                expected: m,
                found: s.len(),
            });
        }
        for (machine, matrix) in s.iter().enumerate() {
            if matrix.len() != n {
                return Err(InstanceError::SetupRows {
                    machine,
                    expected: n,
                    found: matrix.len(),
                });
            }
            for (row, entries) in matrix.iter().enumerate() {
                if entries.len() != n {
                    return Err(InstanceError::SetupShape {
                        machine,
                        row,
                        expected: n,
                        found: entries.len(),
                    });
                }
            }
        }

        Ok(Self {
            n,
            m,
            processing: p.into_iter().flatten().collect(),
            setup: s.into_iter().flatten().flatten().collect(),
        })
    }

    /// Builds an instance from generator functions.
    ///
    /// `p(k, j)` yields processing times and `s(k, i, j)` setup times.
    /// Handy for synthetic instances in tests and benchmarks.
    pub fn from_fn<P, S>(n: usize, m: usize, mut p: P, mut s: S) -> Result<Self, InstanceError>
    where
        P: FnMut(usize, usize) -> u32,
        S: FnMut(usize, usize, usize) -> u32,
    {
        let p = (0..m)
            .map(|k| (0..n).map(|j| p(k, j)).collect())
            .collect();
        let s = (0..m)
            .map(|k| {
                (0..n)
                    .map(|i| (0..n).map(|j| s(k, i, j)).collect())
                    .collect()
            })
            .collect();
        Self::new(n, m, p, s)
    }

    /// Parses an instance in the plain-text benchmark format: a header
    /// `n m _ _`, one line of `machine-id time` pairs per job, a section
    /// label, then a label and an `n x n` setup matrix per machine.
    pub fn parse(text: &str) -> Result<Self, InstanceError> {
        super::parse::parse_instance(text)
    }

    /// Reads and parses an instance file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Number of jobs.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of machines.
    #[inline]
    pub fn m(&self) -> usize {
        self.m
    }

    /// Processing time of `job` on `machine`.
    #[inline]
    pub fn processing(&self, machine: usize, job: usize) -> i64 {
        debug_assert!(machine < self.m && job < self.n);
        self.processing[machine * self.n + job] as i64
    }

    /// Setup time on `machine` when `from` immediately precedes `to`.
    #[inline]
    pub fn setup(&self, machine: usize, from: usize, to: usize) -> i64 {
        debug_assert!(machine < self.m && from < self.n && to < self.n);
        self.setup[(machine * self.n + from) * self.n + to] as i64
    }

    /// Completion time of `sequence` processed on `machine`, computed from scratch.
    pub fn sequence_cost(&self, machine: usize, sequence: &[usize]) -> i64 {
        match sequence.first() {
            None => 0,
            Some(&first) => {
                self.processing(machine, first)
                    + sequence
                        .windows(2)
                        .map(|w| self.setup(machine, w[0], w[1]) + self.processing(machine, w[1]))
                        .sum::<i64>()
            }
        }
    }

    /// Default wall-clock budget for one annealing run, in milliseconds.
    ///
    /// `n * (m / 2) * 50` with integer division, following the experimental
    /// protocol of Vallada & Ruiz (2011). Note that single-machine instances
    /// get a zero budget under this rule.
    pub fn default_time_limit_ms(&self) -> u64 {
        (self.n as u64) * (self.m as u64 / 2) * 50
    }
}

impl FromStr for ProblemInstance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
