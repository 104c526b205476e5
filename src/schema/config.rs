//! Run configuration types for paramless evolution.

use serde::{Deserialize, Serialize};

/// Default absolute tolerance for score comparisons.
pub const DEFAULT_ATOL: f64 = 1e-8;

/// Default cap on rejection-sampling attempts for bounded mutation.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Default generation budget.
pub const DEFAULT_GENERATIONS: u64 = 100_000;

fn default_generations() -> u64 {
    DEFAULT_GENERATIONS
}

fn default_atol() -> f64 {
    DEFAULT_ATOL
}

fn default_max_attempts() -> u64 {
    DEFAULT_MAX_ATTEMPTS
}

/// Top-level configuration for a single evolutionary run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Mutation generator and its parameters.
    pub mutation: MutationConfig,
    /// How residents and mutants are scored.
    pub objective: ObjectiveConfig,
    /// Optional codomain bounds enforced by rejection sampling.
    #[serde(default)]
    pub bounds: Bounds,
    /// Generation budget.
    #[serde(default = "default_generations")]
    pub generations: u64,
    /// Minimum score improvement required for an invasion.
    /// Set to 0.0 to accept any strict improvement.
    #[serde(default = "default_atol")]
    pub atol: f64,
    /// Random seed for reproducibility. Drawn from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Record the compact history of resident replacements.
    #[serde(default)]
    pub record_history: bool,
    /// Maximum number of mutation attempts before a bounded mutation
    /// is declared infeasible.
    #[serde(default = "default_max_attempts")]
    pub max_mutation_attempts: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mutation: MutationConfig::default(),
            objective: ObjectiveConfig::default(),
            bounds: Bounds::default(),
            generations: DEFAULT_GENERATIONS,
            atol: DEFAULT_ATOL,
            seed: None,
            record_history: false,
            max_mutation_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Mutation generator selection.
///
/// Each variant carries exactly the parameters its generator needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MutationConfig {
    /// Push a single position up or down by epsilon.
    Point { epsilon: f64 },
    /// Move epsilon from one position to another, conserving the total.
    PointPair { epsilon: f64 },
    /// Add or subtract a Gaussian bump centred on a random domain point.
    Gaussian {
        epsilon: f64,
        /// Upper limit of the per-call random bump width.
        width: f64,
    },
    /// Add one Gaussian bump and subtract another, conserving the total.
    GaussianPair {
        epsilon: f64,
        /// Upper limit of the per-call random bump width.
        width: f64,
    },
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self::Point { epsilon: 0.01 }
    }
}

impl MutationConfig {
    /// Perturbation magnitude.
    pub fn epsilon(&self) -> f64 {
        match *self {
            Self::Point { epsilon }
            | Self::PointPair { epsilon }
            | Self::Gaussian { epsilon, .. }
            | Self::GaussianPair { epsilon, .. } => epsilon,
        }
    }

    /// Whether the generator evaluates bumps over the domain.
    pub fn needs_domain(&self) -> bool {
        matches!(self, Self::Gaussian { .. } | Self::GaussianPair { .. })
    }

    /// Whether the generator preserves the vector's total.
    pub fn conserves_total(&self) -> bool {
        matches!(self, Self::PointPair { .. } | Self::GaussianPair { .. })
    }
}

/// Scoring rule for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectiveConfig {
    /// Fitness = 1 / L1 distance to the target. Higher is better.
    InverseDistance,
    /// L1 distance to the target. Lower is better.
    Distance {
        /// Stop once the resident is strictly closer than this.
        #[serde(default)]
        threshold: Option<f64>,
    },
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self::Distance { threshold: None }
    }
}

/// Optional lower and upper limits on every entry of a trait vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

impl Bounds {
    /// Bounds with both sides set.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// No constraint on either side.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True when neither side constrains anything.
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

impl RunConfig {
    /// Validate run configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mutation.validate()?;
        self.bounds.validate()?;

        if !self.atol.is_finite() || self.atol < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.atol));
        }
        if self.max_mutation_attempts == 0 {
            return Err(ConfigError::InvalidAttemptLimit);
        }
        if let ObjectiveConfig::Distance {
            threshold: Some(threshold),
        } = self.objective
        {
            if threshold.is_nan() {
                return Err(ConfigError::InvalidThreshold(threshold));
            }
        }
        Ok(())
    }
}

impl MutationConfig {
    /// Validate generator parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let epsilon = self.epsilon();
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(epsilon));
        }
        if let Self::Gaussian { width, .. } | Self::GaussianPair { width, .. } = *self {
            if !width.is_finite() || width <= 0.0 {
                return Err(ConfigError::InvalidWidth(width));
            }
        }
        Ok(())
    }
}

impl Bounds {
    /// Validate that the bounds describe a non-empty interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(lower), Some(upper)) = (self.lower, self.upper) {
            if lower > upper {
                return Err(ConfigError::InvalidBounds { lower, upper });
            }
        }
        if self.lower.is_some_and(f64::is_nan) || self.upper.is_some_and(f64::is_nan) {
            return Err(ConfigError::NanBound);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Mutation epsilon must be positive and finite, got {0}")]
    InvalidEpsilon(f64),
    #[error("Gaussian width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("Lower bound ({lower}) exceeds upper bound ({upper})")]
    InvalidBounds { lower: f64, upper: f64 },
    #[error("Bounds must not be NaN")]
    NanBound,
    #[error("Tolerance must be non-negative and finite, got {0}")]
    InvalidTolerance(f64),
    #[error("Target threshold must not be NaN, got {0}")]
    InvalidThreshold(f64),
    #[error("Mutation attempt limit must be positive")]
    InvalidAttemptLimit,
    #[error("Gaussian mutation requires a domain")]
    MissingDomain,
    #[error("Objective requires a target vector")]
    MissingTarget,
    #[error("Trait vector must not be empty")]
    EmptyVector,
    #[error("Domain must have at least one point and a finite range")]
    InvalidDomain,
    #[error("{what} has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
