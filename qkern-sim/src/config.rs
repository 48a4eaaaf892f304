//! Simulator configuration

use crate::error::{Result, SimulatorError};
use qkern_state::DEFAULT_PARALLEL_THRESHOLD;
use std::str::FromStr;

/// Environment variable overriding [`SimulatorConfig::seed`]
pub const ENV_SEED: &str = "QKERN_SEED";
/// Environment variable overriding [`SimulatorConfig::shots`]
pub const ENV_SHOTS: &str = "QKERN_SHOTS";
/// Environment variable overriding [`SimulatorConfig::parallel_shot_threshold`]
pub const ENV_PARALLEL_SHOTS: &str = "QKERN_PARALLEL_SHOTS";

/// Configuration for the simulator
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Number of shots used when a call does not give one
    ///
    /// Default: 1000
    pub shots: usize,

    /// Random number generator seed for reproducibility
    ///
    /// If None, every call draws fresh entropy. With a seed, results are
    /// identical whether shots run sequentially or on the rayon pool.
    ///
    /// Default: None
    pub seed: Option<u64>,

    /// Minimum shot count for distributing shots over the rayon pool
    ///
    /// Default: 256
    pub parallel_shot_threshold: usize,

    /// Minimum qubit count for running gate kernels on the rayon pool
    ///
    /// Default: 14
    pub state_parallel_threshold: usize,

    /// Check the state norm after every unitary step
    ///
    /// Default: true
    pub verify_normalization: bool,

    /// Allowed deviation of the state norm `‖ψ‖` from 1
    ///
    /// Default: 1e-9
    pub norm_tolerance: f64,

    /// Allowed imaginary part of an expectation value
    ///
    /// Default: 1e-9
    pub hermitian_tolerance: f64,

    /// Attach timing and resource statistics to sample results
    ///
    /// Default: false
    pub collect_statistics: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            shots: 1000,
            seed: None,
            parallel_shot_threshold: 256,
            state_parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            verify_normalization: true,
            norm_tolerance: 1e-9,
            hermitian_tolerance: 1e-9,
            collect_statistics: false,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration optimized for speed
    ///
    /// - No per-gate norm check
    /// - Shots go parallel early
    pub fn fast() -> Self {
        Self {
            verify_normalization: false,
            parallel_shot_threshold: 64,
            ..Default::default()
        }
    }

    /// Create a configuration optimized for accuracy
    ///
    /// - More shots
    /// - Tighter tolerances
    /// - Statistics collection enabled
    pub fn accurate() -> Self {
        Self {
            shots: 10_000,
            norm_tolerance: 1e-11,
            collect_statistics: true,
            ..Default::default()
        }
    }

    /// Create a configuration for debugging
    ///
    /// Deterministic seed, sequential shots and statistics collection.
    pub fn debug() -> Self {
        Self {
            seed: Some(42),
            parallel_shot_threshold: usize::MAX,
            collect_statistics: true,
            ..Default::default()
        }
    }

    /// Default configuration with `QKERN_*` environment overrides applied
    ///
    /// # Errors
    /// `InvalidConfig` if a variable is set but does not parse
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (`QKERN_SEED`, `QKERN_SHOTS`,
    /// `QKERN_PARALLEL_SHOTS`)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = parse_var(&lookup, ENV_SEED)? {
            self.seed = Some(seed);
        }
        if let Some(shots) = parse_var(&lookup, ENV_SHOTS)? {
            self.shots = shots;
        }
        if let Some(threshold) = parse_var(&lookup, ENV_PARALLEL_SHOTS)? {
            self.parallel_shot_threshold = threshold;
        }
        self.validate()?;
        Ok(self)
    }

    /// Set the number of shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set the random seed for deterministic execution
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the shot count from which sampling goes parallel
    pub fn with_parallel_shot_threshold(mut self, threshold: usize) -> Self {
        self.parallel_shot_threshold = threshold;
        self
    }

    /// Set the qubit count from which gate kernels go parallel
    pub fn with_state_parallel_threshold(mut self, threshold: usize) -> Self {
        self.state_parallel_threshold = threshold;
        self
    }

    /// Enable or disable the per-gate norm check
    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verify_normalization = enabled;
        self
    }

    /// Set the norm tolerance
    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    /// Set the tolerance on imaginary expectation parts
    pub fn with_hermitian_tolerance(mut self, tolerance: f64) -> Self {
        self.hermitian_tolerance = tolerance;
        self
    }

    /// Enable statistics collection
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.collect_statistics = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.shots == 0 {
            return Err(SimulatorError::InvalidConfig("shots must be > 0".to_string()));
        }

        for (name, value) in [
            ("norm_tolerance", self.norm_tolerance),
            ("hermitian_tolerance", self.hermitian_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulatorError::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            SimulatorError::InvalidConfig(format!("{key} has an unparsable value {raw:?}"))
        }),
    }
}
