//! Fitness and distance evaluators.
//!
//! Two shapes are kept apart on purpose: a [`DistanceEvaluator`] scores one
//! vector against a target (lower is better), a [`FitnessEvaluator`] scores a
//! resident and a mutant together (higher is better). [`Objective`] wraps
//! either for the engine.

use crate::schema::{ConfigError, ObjectiveConfig};

/// Sum of position-wise absolute differences.
pub fn one_norm_distance(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| (a - b).abs()).sum()
}

/// Distance between two equal-length vectors. Lower is better.
pub trait DistanceEvaluator {
    fn distance(&self, vector: &[f64], target: &[f64]) -> f64;
}

/// L1 (Manhattan) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct L1Distance;

impl DistanceEvaluator for L1Distance {
    fn distance(&self, vector: &[f64], target: &[f64]) -> f64 {
        one_norm_distance(vector, target)
    }
}

impl<F> DistanceEvaluator for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    fn distance(&self, vector: &[f64], target: &[f64]) -> f64 {
        self(vector, target)
    }
}

/// Scores a resident and a mutant as `(fitness_resident, fitness_mutant)`.
/// Higher is better.
///
/// Any context the scores depend on (a target, model constants, the domain)
/// lives in the evaluator itself.
pub trait FitnessEvaluator {
    fn fitness(&self, resident: &[f64], mutant: &[f64]) -> (f64, f64);

    /// Distance of `vector` from the evaluator's target, if it has one.
    fn distance_to_target(&self, _vector: &[f64]) -> Option<f64> {
        None
    }

    /// Length of the evaluator's target, if it has one.
    fn target_len(&self) -> Option<usize> {
        None
    }
}

impl<F> FitnessEvaluator for F
where
    F: Fn(&[f64], &[f64]) -> (f64, f64),
{
    fn fitness(&self, resident: &[f64], mutant: &[f64]) -> (f64, f64) {
        self(resident, mutant)
    }
}

/// Fitness as the reciprocal of the distance to a target.
///
/// An exact match scores `+inf`, which the engine treats as reaching the target.
#[derive(Debug, Clone)]
pub struct InverseDistanceFitness<D = L1Distance> {
    target: Vec<f64>,
    metric: D,
}

impl InverseDistanceFitness {
    /// Reciprocal L1 distance to `target`.
    pub fn new(target: Vec<f64>) -> Self {
        Self {
            target,
            metric: L1Distance,
        }
    }
}

impl<D: DistanceEvaluator> InverseDistanceFitness<D> {
    /// Reciprocal of a custom distance to `target`.
    pub fn with_metric(target: Vec<f64>, metric: D) -> Self {
        Self { target, metric }
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }
}

impl<D: DistanceEvaluator> FitnessEvaluator for InverseDistanceFitness<D> {
    fn fitness(&self, resident: &[f64], mutant: &[f64]) -> (f64, f64) {
        let fitness_resident = 1.0 / self.metric.distance(resident, &self.target);
        let fitness_mutant = 1.0 / self.metric.distance(mutant, &self.target);
        (fitness_resident, fitness_mutant)
    }

    fn distance_to_target(&self, vector: &[f64]) -> Option<f64> {
        Some(self.metric.distance(vector, &self.target))
    }

    fn target_len(&self) -> Option<usize> {
        Some(self.target.len())
    }
}

/// Whether a mutant with `mutant` fitness displaces a resident with `resident`
/// fitness: strictly fitter, by more than `atol`.
#[inline]
pub fn fitness_invades(resident: f64, mutant: f64, atol: f64) -> bool {
    mutant > resident && (mutant - resident).abs() > atol
}

/// Whether a mutant at distance `mutant` displaces a resident at distance
/// `resident`: strictly closer, by more than `atol`.
#[inline]
pub fn distance_invades(resident: f64, mutant: f64, atol: f64) -> bool {
    mutant < resident && (resident - mutant).abs() > atol
}

/// Scoring rule driving a run.
pub enum Objective {
    /// Pairwise fitness, higher is better.
    Fitness(Box<dyn FitnessEvaluator>),
    /// Distance to a target, lower is better.
    Distance {
        metric: Box<dyn DistanceEvaluator>,
        target: Vec<f64>,
        /// Terminate once the resident's distance falls strictly below this.
        threshold: Option<f64>,
    },
}

impl Objective {
    /// Pairwise fitness objective.
    pub fn fitness<E: FitnessEvaluator + 'static>(evaluator: E) -> Self {
        Self::Fitness(Box::new(evaluator))
    }

    /// Distance-to-target objective without a stopping threshold.
    pub fn distance<D: DistanceEvaluator + 'static>(metric: D, target: Vec<f64>) -> Self {
        Self::Distance {
            metric: Box::new(metric),
            target,
            threshold: None,
        }
    }

    /// Set the stopping threshold of a distance objective.
    ///
    /// Fitness objectives are returned unchanged.
    pub fn with_threshold(self, threshold: f64) -> Self {
        match self {
            Self::Distance { metric, target, .. } => Self::Distance {
                metric,
                target,
                threshold: Some(threshold),
            },
            fitness => fitness,
        }
    }

    /// Build one of the standard objectives against `target`.
    pub fn from_config(config: &ObjectiveConfig, target: Option<&[f64]>) -> Result<Self, ConfigError> {
        let target = target.ok_or(ConfigError::MissingTarget)?.to_vec();
        Ok(match *config {
            ObjectiveConfig::InverseDistance => Self::fitness(InverseDistanceFitness::new(target)),
            ObjectiveConfig::Distance { threshold } => Self::Distance {
                metric: Box::new(L1Distance),
                target,
                threshold,
            },
        })
    }

    /// Length of the target vector, for objectives that have one.
    pub fn target_len(&self) -> Option<usize> {
        match self {
            Self::Fitness(evaluator) => evaluator.target_len(),
            Self::Distance { target, .. } => Some(target.len()),
        }
    }

    /// Distance of `vector` from the objective's target, if it has one.
    pub fn distance_to_target(&self, vector: &[f64]) -> Option<f64> {
        match self {
            Self::Fitness(evaluator) => evaluator.distance_to_target(vector),
            Self::Distance { metric, target, .. } => Some(metric.distance(vector, target)),
        }
    }
}

impl std::fmt::Debug for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fitness(_) => f.write_str("Objective::Fitness"),
            Self::Distance {
                target, threshold, ..
            } => f
                .debug_struct("Objective::Distance")
                .field("target_len", &target.len())
                .field("threshold", threshold)
                .finish(),
        }
    }
}
