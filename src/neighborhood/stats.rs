//! Neighbourhood landscape statistics.
//!
//! Every candidate of a neighbourhood is classified against the starting
//! solution on both objectives, giving nine classes (better/equal/worse on
//! the overall makespan times better/equal/worse on the sum of makespans).
//! Each class tracks how many candidates fell into it and the best, worst
//! and mean delta of each objective.

use super::Neighborhood;
use crate::solution::Quality;
use std::fmt;

/// Comparison of one objective against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Better,
    Equal,
    Worse,
}

impl Relation {
    /// Relation of `candidate` to `baseline` for a minimised objective.
    pub fn of(candidate: i64, baseline: i64) -> Self {
        match candidate.cmp(&baseline) {
            std::cmp::Ordering::Less => Relation::Better,
            std::cmp::Ordering::Equal => Relation::Equal,
            std::cmp::Ordering::Greater => Relation::Worse,
        }
    }

    fn index(self) -> usize {
        match self {
            Relation::Better => 0,
            Relation::Equal => 1,
            Relation::Worse => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Relation::Better => "better",
            Relation::Equal => "equal",
            Relation::Worse => "worse",
        }
    }
}

/// One of the nine candidate classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsClass {
    /// Relation on the overall makespan.
    pub makespan: Relation,
    /// Relation on the sum of machines' makespans.
    pub sum_makespan: Relation,
}

impl StatsClass {
    /// All classes, makespan relation major.
    pub const ALL: [StatsClass; 9] = {
        use Relation::*;
        [
            StatsClass { makespan: Better, sum_makespan: Better },
            StatsClass { makespan: Better, sum_makespan: Equal },
            StatsClass { makespan: Better, sum_makespan: Worse },
            StatsClass { makespan: Equal, sum_makespan: Better },
            StatsClass { makespan: Equal, sum_makespan: Equal },
            StatsClass { makespan: Equal, sum_makespan: Worse },
            StatsClass { makespan: Worse, sum_makespan: Better },
            StatsClass { makespan: Worse, sum_makespan: Equal },
            StatsClass { makespan: Worse, sum_makespan: Worse },
        ]
    };

    /// Classifies `candidate` against `baseline`.
    pub fn classify(candidate: Quality, baseline: Quality) -> Self {
        Self {
            makespan: Relation::of(candidate.makespan, baseline.makespan),
            sum_makespan: Relation::of(candidate.sum_makespan, baseline.sum_makespan),
        }
    }

    fn index(self) -> usize {
        self.makespan.index() * 3 + self.sum_makespan.index()
    }
}

/// Extremes and total of one objective's deltas within a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaSummary {
    /// Smallest (most improving) delta; 0 when the class is empty.
    pub best: i64,
    /// Largest delta; 0 when the class is empty.
    pub worst: i64,
    /// Sum of all deltas.
    pub total: i64,
}

impl DeltaSummary {
    fn record(&mut self, delta: i64, first: bool) {
        if first {
            self.best = delta;
            self.worst = delta;
        } else {
            self.best = self.best.min(delta);
            self.worst = self.worst.max(delta);
        }
        self.total += delta;
    }
}

/// Counters of one candidate class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassStats {
    /// Number of candidates in the class.
    pub count: u64,
    /// Deltas of the overall makespan.
    pub makespan: DeltaSummary,
    /// Deltas of the sum of makespans.
    pub sum_makespan: DeltaSummary,
}

impl ClassStats {
    /// Mean delta of the overall makespan; 0 when the class is empty.
    pub fn mean_makespan(&self) -> f64 {
        mean(self.makespan.total, self.count)
    }

    /// Mean delta of the sum of makespans; 0 when the class is empty.
    pub fn mean_sum_makespan(&self) -> f64 {
        mean(self.sum_makespan.total, self.count)
    }
}

fn mean(total: i64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Classification of a whole neighbourhood around one solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborhoodStats {
    neighborhood: Neighborhood,
    baseline: Quality,
    classes: [ClassStats; 9],
}

impl NeighborhoodStats {
    /// Empty statistics around `baseline`.
    pub fn new(neighborhood: Neighborhood, baseline: Quality) -> Self {
        Self {
            neighborhood,
            baseline,
            classes: [ClassStats::default(); 9],
        }
    }

    /// Records one candidate.
    pub fn register(&mut self, candidate: Quality) {
        let class = StatsClass::classify(candidate, self.baseline);
        let entry = &mut self.classes[class.index()];
        let first = entry.count == 0;
        entry.count += 1;
        entry
            .makespan
            .record(candidate.makespan - self.baseline.makespan, first);
        entry
            .sum_makespan
            .record(candidate.sum_makespan - self.baseline.sum_makespan, first);
    }

    /// The neighbourhood these statistics describe.
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Objective values of the starting solution.
    pub fn baseline(&self) -> Quality {
        self.baseline
    }

    /// Total number of candidates (the neighbourhood size).
    pub fn count(&self) -> u64 {
        self.classes.iter().map(|c| c.count).sum()
    }

    /// Counters of one class.
    pub fn class(&self, class: StatsClass) -> &ClassStats {
        &self.classes[class.index()]
    }

    /// Candidates whose overall makespan relates to the baseline as `relation`.
    pub fn count_makespan(&self, relation: Relation) -> u64 {
        StatsClass::ALL
            .iter()
            .filter(|c| c.makespan == relation)
            .map(|c| self.class(*c).count)
            .sum()
    }

    /// Candidates whose sum of makespans relates to the baseline as `relation`.
    pub fn count_sum_makespan(&self, relation: Relation) -> u64 {
        StatsClass::ALL
            .iter()
            .filter(|c| c.sum_makespan == relation)
            .map(|c| self.class(*c).count)
            .sum()
    }
}

impl fmt::Display for NeighborhoodStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.count();
        let digits = total.to_string().len();
        let line = "-".repeat(58 + digits);

        writeln!(f, "{line}")?;
        writeln!(f, " Statistics - {}", self.neighborhood.name())?;
        writeln!(f, "{line}")?;
        writeln!(f, " MAX(makespan[k]) | SUM(makespan[k]) | Number of Neighbors")?;
        writeln!(f, "{line}")?;
        for class in StatsClass::ALL {
            let count = self.class(class).count;
            let share = if total == 0 {
                0.0
            } else {
                100.0 * count as f64 / total as f64
            };
            writeln!(
                f,
                " {:<16} | {:<16} | {count:>digits$} ({share:9.5}%)",
                class.makespan.label(),
                class.sum_makespan.label(),
            )?;
        }
        writeln!(f, "{line}")?;
        writeln!(f, "Neighborhood size: {total}")?;
        write!(f, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(makespan: i64, sum_makespan: i64) -> Quality {
        Quality {
            makespan,
            sum_makespan,
        }
    }

    #[test]
    fn test_register_and_aggregate() {
        let mut stats = NeighborhoodStats::new(Neighborhood::Shift, q(10, 30));
        stats.register(q(8, 28));
        stats.register(q(9, 25));
        stats.register(q(10, 30));
        stats.register(q(12, 29));

        assert_eq!(stats.count(), 4);
        let bb = stats.class(StatsClass {
            makespan: Relation::Better,
            sum_makespan: Relation::Better,
        });
        assert_eq!(bb.count, 2);
        assert_eq!(bb.makespan.best, -2);
        assert_eq!(bb.makespan.worst, -1);
        assert!((bb.mean_makespan() + 1.5).abs() < 1e-12);
        assert_eq!(bb.sum_makespan.best, -5);
        assert_eq!(bb.sum_makespan.worst, -2);

        assert_eq!(stats.count_makespan(Relation::Better), 2);
        assert_eq!(stats.count_makespan(Relation::Equal), 1);
        assert_eq!(stats.count_makespan(Relation::Worse), 1);
        assert_eq!(stats.count_sum_makespan(Relation::Better), 3);
    }

    #[test]
    fn test_empty_class_means_zero() {
        let stats = NeighborhoodStats::new(Neighborhood::Swap, q(1, 1));
        let class = stats.class(StatsClass::ALL[8]);
        assert_eq!(class.count, 0);
        assert_eq!(class.mean_makespan(), 0.0);
    }

    #[test]
    fn test_class_order() {
        for (i, class) in StatsClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn test_display_lists_every_class() {
        let mut stats = NeighborhoodStats::new(Neighborhood::TwoShift, q(5, 5));
        stats.register(q(6, 4));
        let text = stats.to_string();
        assert!(text.contains("Statistics - Two-Shift"));
        assert!(text.contains("Neighborhood size: 1"));
        assert_eq!(text.lines().filter(|l| l.contains('%')).count(), 9);
    }
}
