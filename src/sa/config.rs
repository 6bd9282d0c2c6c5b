//! Annealer configuration.

use crate::neighborhood::Neighborhood;
use crate::problem::ProblemInstance;
use std::time::Duration;

/// Configuration for the simulated annealing search.
///
/// Temperature follows a geometric schedule: after every
/// `iterations_per_temperature` iterations it is multiplied by
/// `cooling_rate`, and once it falls below `min_temperature` it is reset to
/// `initial_temperature` (reheating).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_upmsp::neighborhood::Neighborhood;
/// use u_upmsp::sa::AnnealerConfig;
///
/// let config = AnnealerConfig::default()
///     .with_time_limit(Duration::from_secs(2))
///     .with_cooling_rate(0.9)
///     .with_iterations_per_temperature(10_000)
///     .disable(Neighborhood::Swap)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.enabled_neighborhoods().len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AnnealerConfig {
    /// Wall-clock budget. `None` derives it from the instance size (see
    /// [`ProblemInstance::default_time_limit_ms`]).
    pub time_limit: Option<Duration>,

    /// Maximum number of iterations. `None` = no limit.
    pub iteration_limit: Option<u64>,

    /// Iterations spent at each temperature level.
    pub iterations_per_temperature: u64,

    /// Starting (and reheating) temperature.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,

    /// Reheat threshold.
    pub min_temperature: f64,

    /// Random seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,

    /// Move families left out of the search.
    pub disabled: Vec<Neighborhood>,
}

impl Default for AnnealerConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            iteration_limit: None,
            iterations_per_temperature: 1_176_628,
            initial_temperature: 1.0,
            cooling_rate: 0.96,
            min_temperature: 1e-6,
            seed: None,
            disabled: Vec::new(),
        }
    }
}

impl AnnealerConfig {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_iteration_limit(mut self, n: u64) -> Self {
        self.iteration_limit = Some(n);
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: u64) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Leaves `neighborhood` out of the search.
    pub fn disable(mut self, neighborhood: Neighborhood) -> Self {
        if !self.disabled.contains(&neighborhood) {
            self.disabled.push(neighborhood);
        }
        self
    }

    /// Replaces the disabled set.
    pub fn with_disabled(mut self, disabled: impl IntoIterator<Item = Neighborhood>) -> Self {
        self.disabled = disabled.into_iter().collect();
        self
    }

    /// Enabled families, in canonical order.
    pub fn enabled_neighborhoods(&self) -> Vec<Neighborhood> {
        Neighborhood::ALL
            .into_iter()
            .filter(|nb| !self.disabled.contains(nb))
            .collect()
    }

    /// The time budget for `problem`.
    pub fn time_limit_for(&self, problem: &ProblemInstance) -> Duration {
        self.time_limit
            .unwrap_or_else(|| Duration::from_millis(problem.default_time_limit_ms()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            ));
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be at least 1".into());
        }
        if self.enabled_neighborhoods().is_empty() {
            return Err("at least one neighborhood must be enabled".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealerConfig::default();
        assert_eq!(config.iterations_per_temperature, 1_176_628);
        assert!((config.initial_temperature - 1.0).abs() < 1e-12);
        assert!((config.cooling_rate - 0.96).abs() < 1e-12);
        assert!((config.min_temperature - 1e-6).abs() < 1e-18);
        assert_eq!(config.enabled_neighborhoods(), Neighborhood::ALL.to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_time_limit() {
        let problem = ProblemInstance::from_fn(20, 5, |_, _| 1, |_, _, _| 0).unwrap();
        let config = AnnealerConfig::default();
        // 20 * (5 / 2) * 50
        assert_eq!(config.time_limit_for(&problem), Duration::from_millis(2000));

        let config = config.with_time_limit(Duration::from_millis(7));
        assert_eq!(config.time_limit_for(&problem), Duration::from_millis(7));
    }

    #[test]
    fn test_disable_keeps_order() {
        let config = AnnealerConfig::default()
            .disable(Neighborhood::Switch)
            .disable(Neighborhood::TwoShift)
            .disable(Neighborhood::Switch);
        assert_eq!(config.disabled.len(), 2);
        assert_eq!(
            config.enabled_neighborhoods(),
            vec![
                Neighborhood::Shift,
                Neighborhood::TaskMove,
                Neighborhood::Swap,
                Neighborhood::DirectSwap,
            ]
        );
    }

    #[test]
    fn test_validate_all_disabled() {
        let config = AnnealerConfig::default().with_disabled(Neighborhood::ALL);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_temperature() {
        assert!(AnnealerConfig::default()
            .with_initial_temperature(-1.0)
            .validate()
            .is_err());
        assert!(AnnealerConfig::default()
            .with_initial_temperature(f64::INFINITY)
            .validate()
            .is_err());
        assert!(AnnealerConfig::default()
            .with_min_temperature(2.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_cooling() {
        for rate in [0.0, 1.0, 1.5] {
            let config = AnnealerConfig::default().with_cooling_rate(rate);
            assert!(config.validate().is_err(), "{rate}");
        }
    }

    #[test]
    fn test_validate_zero_iterations_per_temperature() {
        let config = AnnealerConfig::default().with_iterations_per_temperature(0);
        assert!(config.validate().is_err());
    }
}
