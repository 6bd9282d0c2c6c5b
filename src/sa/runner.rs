//! Annealing loop.

use super::callback::IncumbentCallback;
use super::config::AnnealerConfig;
use crate::construct::random_solution;
use crate::problem::ProblemInstance;
use crate::solution::Solution;
use crate::timer::Stopwatch;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<'p> {
    /// The best schedule found, refreshed.
    pub best: Solution<'p>,

    /// Overall makespan of `best`.
    pub best_makespan: i64,

    /// Sum of machine makespans of `best`.
    pub best_sum_makespan: i64,

    /// Total number of iterations.
    pub iterations: u64,

    /// Number of accepted candidates (including improvements).
    pub accepted_moves: u64,

    /// Number of candidates that strictly lowered the sum of makespans.
    pub improving_moves: u64,

    /// Number of times the temperature was reset.
    pub reheats: u64,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Counted search time (callback time excluded).
    pub elapsed: Duration,

    /// Whether cancelled externally.
    pub cancelled: bool,
}

/// Executes the simulated annealing search.
///
/// Each iteration flips a coin between intensification (best neighbour)
/// and diversification (random neighbour), targets the makespan machine
/// or a uniform machine with equal probability, and picks one enabled
/// neighbourhood uniformly. Acceptance compares the *sum* of machine
/// makespans, while the incumbent is ranked by the overall makespan.
///
/// # Examples
///
/// ```
/// use u_upmsp::problem::ProblemInstance;
/// use u_upmsp::sa::{Annealer, AnnealerConfig};
///
/// let problem = ProblemInstance::from_fn(
///     8,
///     2,
///     |k, j| (2 + (j * 3 + k) % 5) as u32,
///     |_, i, j| ((i + j) % 3) as u32,
/// )
/// .unwrap();
/// let config = AnnealerConfig::default()
///     .with_iteration_limit(2_000)
///     .with_seed(42);
///
/// let result = Annealer::run(&problem, &config);
/// assert!(result.best.is_feasible());
/// assert_eq!(result.iterations, 2_000);
/// ```
pub struct Annealer;

impl Annealer {
    /// Runs the search.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`AnnealerConfig::validate`].
    pub fn run<'p>(problem: &'p ProblemInstance, config: &AnnealerConfig) -> AnnealResult<'p> {
        Self::run_with_cancel(problem, config, &mut (), None)
    }

    /// Runs the search, reporting incumbents to `callback`.
    pub fn run_with_callback<'p, C>(
        problem: &'p ProblemInstance,
        config: &AnnealerConfig,
        callback: &mut C,
    ) -> AnnealResult<'p>
    where
        C: IncumbentCallback + ?Sized,
    {
        Self::run_with_cancel(problem, config, callback, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The generator is seeded from `config.seed`, or from the OS when unset.
    pub fn run_with_cancel<'p, C>(
        problem: &'p ProblemInstance,
        config: &AnnealerConfig,
        callback: &mut C,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AnnealResult<'p>
    where
        C: IncumbentCallback + ?Sized,
    {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(problem, config, &mut rng, callback, cancel)
    }

    /// Runs the search drawing every random decision from `rng`.
    ///
    /// `config.seed` is ignored. Given the same generator state, instance,
    /// configuration and iteration limit, the run is reproducible.
    pub fn run_with_rng<'p, R, C>(
        problem: &'p ProblemInstance,
        config: &AnnealerConfig,
        rng: &mut R,
        callback: &mut C,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AnnealResult<'p>
    where
        R: Rng + ?Sized,
        C: IncumbentCallback + ?Sized,
    {
        config.validate().expect("invalid AnnealerConfig");

        let neighborhoods = config.enabled_neighborhoods();
        let time_limit = config.time_limit_for(problem);
        let iteration_limit = config.iteration_limit.unwrap_or(u64::MAX);
        let m = problem.m();

        info!(
            n = problem.n(),
            m,
            time_limit_ms = time_limit.as_millis() as u64,
            iteration_limit = ?config.iteration_limit,
            neighborhoods = neighborhoods.len(),
            "annealing started"
        );

        let mut current = random_solution(problem, rng);
        let mut best = current.clone();
        let mut best_makespan = best.refresh().makespan();
        callback.on_new_incumbent(&best, 0, 0);

        let mut temperature = config.initial_temperature;
        let mut iterations = 0u64;
        let mut in_temperature = 0u64;
        let mut accepted_moves = 0u64;
        let mut improving_moves = 0u64;
        let mut reheats = 0u64;
        let mut cancelled = false;

        let mut watch = Stopwatch::started();

        while watch.elapsed() < time_limit && iterations < iteration_limit {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            iterations += 1;
            in_temperature += 1;

            let intensify = rng.random_bool(0.5);
            let target = if rng.random_bool(0.5) {
                current.refresh().makespan_machine()
            } else {
                rng.random_range(0..m)
            };
            let neighborhood = neighborhoods[rng.random_range(0..neighborhoods.len())];

            let trial = if intensify {
                neighborhood.best_neighbor(&current, Some(target))
            } else {
                neighborhood.any_neighbor(&current, rng, Some(target))
            };

            let delta = trial.sum_makespan() - current.sum_makespan();
            if delta <= 0 {
                if delta < 0 {
                    improving_moves += 1;
                }
                accepted_moves += 1;
                current = trial;

                let makespan = current.refresh().makespan();
                if makespan < best_makespan {
                    best = current.clone();
                    best_makespan = makespan;
                    debug!(
                        iteration = iterations,
                        makespan,
                        sum_makespan = best.sum_makespan(),
                        neighborhood = neighborhood.key(),
                        "new incumbent"
                    );

                    watch.stop();
                    let elapsed_nanos = watch.elapsed().as_nanos() as u64;
                    callback.on_new_incumbent(&best, iterations, elapsed_nanos);
                    watch.start();
                }
            } else if rng.random::<f64>() < (-(delta as f64) / temperature).exp() {
                accepted_moves += 1;
                current = trial;
            }

            if in_temperature >= config.iterations_per_temperature {
                in_temperature = 0;
                temperature *= config.cooling_rate;
                if temperature < config.min_temperature {
                    temperature = config.initial_temperature;
                    reheats += 1;
                    trace!(iteration = iterations, temperature, "reheated");
                } else {
                    trace!(iteration = iterations, temperature, "cooled");
                }
            }
        }

        watch.stop();
        let best_sum_makespan = best.sum_makespan();
        best.refresh();

        info!(
            iterations,
            best_makespan,
            best_sum_makespan,
            reheats,
            elapsed_ms = watch.elapsed().as_millis() as u64,
            cancelled,
            "annealing finished"
        );

        AnnealResult {
            best,
            best_makespan,
            best_sum_makespan,
            iterations,
            accepted_moves,
            improving_moves,
            reheats,
            final_temperature: temperature,
            elapsed: watch.elapsed(),
            cancelled,
        }
    }
}
