//! Independent annealing runs executed concurrently.
//!
//! Each [`BatchUnit`] is one full run on a shared read-only instance. Units
//! run on a rayon pool; a summary line per finished unit is written to a
//! single sink under a mutex (write and flush happen while holding it, so
//! lines never interleave). A unit that panics or is misconfigured is
//! reported as an error for that unit only.

use crate::problem::ProblemInstance;
use crate::sa::{Annealer, AnnealerConfig};
use rayon::prelude::*;
use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// Error of one batch unit, or of the batch as a whole.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("run '{label}' has an invalid configuration: {reason}")]
    InvalidConfig { label: String, reason: String },

    #[error("run '{label}' panicked: {message}")]
    Panicked { label: String, message: String },

    #[error("failed to write summary: {0}")]
    Io(#[from] io::Error),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Options of the harness itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchConfig {
    /// Worker threads. `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

impl BatchConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// One run of the batch.
#[derive(Debug, Clone)]
pub struct BatchUnit {
    pub label: String,
    pub problem: Arc<ProblemInstance>,
    pub config: AnnealerConfig,
}

impl BatchUnit {
    pub fn new(
        label: impl Into<String>,
        problem: Arc<ProblemInstance>,
        config: AnnealerConfig,
    ) -> Self {
        Self {
            label: label.into(),
            problem,
            config,
        }
    }

    /// One unit per seed, labelled `<label>#<seed>`.
    pub fn replicas(
        label: &str,
        problem: &Arc<ProblemInstance>,
        config: &AnnealerConfig,
        seeds: impl IntoIterator<Item = u64>,
    ) -> Vec<Self> {
        seeds
            .into_iter()
            .map(|seed| {
                Self::new(
                    format!("{label}#{seed}"),
                    Arc::clone(problem),
                    config.clone().with_seed(seed),
                )
            })
            .collect()
    }
}

/// Outcome of one finished unit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchSummary {
    pub label: String,
    pub seed: Option<u64>,
    pub makespan: i64,
    pub sum_makespan: i64,
    pub iterations: u64,
    pub elapsed_ms: u64,
    /// Job order of every machine in the best schedule.
    pub sequences: Vec<Vec<usize>>,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} makespan={} sum={} iterations={} elapsed_ms={}",
            self.label, self.makespan, self.sum_makespan, self.iterations, self.elapsed_ms
        )
    }
}

/// Runs every unit and writes one summary line per success to `sink`.
///
/// Results come back in unit order.
pub fn run_batch<W>(
    units: &[BatchUnit],
    config: &BatchConfig,
    sink: &Mutex<W>,
) -> Result<Vec<Result<BatchSummary, BatchError>>, BatchError>
where
    W: Write + Send,
{
    info!(units = units.len(), threads = ?config.threads, "batch started");
    let run_all = || -> Vec<Result<BatchSummary, BatchError>> {
        units
            .par_iter()
            .map(|unit| {
                let outcome = run_unit(unit, sink);
                if let Err(err) = &outcome {
                    warn!(label = %unit.label, error = %err, "batch unit failed");
                }
                outcome
            })
            .collect()
    };

    let results = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(run_all),
        None => run_all(),
    };

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(units = units.len(), failed, "batch finished");
    Ok(results)
}

fn run_unit<W: Write>(unit: &BatchUnit, sink: &Mutex<W>) -> Result<BatchSummary, BatchError> {
    unit.config
        .validate()
        .map_err(|reason| BatchError::InvalidConfig {
            label: unit.label.clone(),
            reason,
        })?;

    let summary = catch_unwind(AssertUnwindSafe(|| {
        let result = Annealer::run(&unit.problem, &unit.config);
        BatchSummary {
            label: unit.label.clone(),
            seed: unit.config.seed,
            makespan: result.best_makespan,
            sum_makespan: result.best_sum_makespan,
            iterations: result.iterations,
            elapsed_ms: result.elapsed.as_millis() as u64,
            sequences: result.best.sequences().to_vec(),
        }
    }))
    .map_err(|payload| BatchError::Panicked {
        label: unit.label.clone(),
        message: panic_message(payload.as_ref()),
    })?;

    let mut out = sink.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(out, "{summary}")?;
    out.flush()?;
    Ok(summary)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
