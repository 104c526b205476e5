//! Resident/mutant competition loop.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::history::{CompactHistory, HistoryError, HistoryRecorder};
use crate::schema::{ConfigError, DEFAULT_ATOL, DEFAULT_GENERATIONS, ResolvedProblem, RunConfig};

use super::fitness::{Objective, distance_invades, fitness_invades};
use super::mutation::{Bounded, EvolutionRng, Mutation, MutationError, MutationStrategy};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Generation budget exhausted.
    MaxGenerations,
    /// Distance threshold met, or an exact match scored infinite fitness.
    TargetReached,
    /// Results were collected before the run terminated.
    Interrupted,
}

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Terminated(StopReason),
}

/// Snapshot passed to progress callbacks.
#[derive(Debug, Clone)]
pub struct EvolutionProgress {
    /// Current generation.
    pub generation: u64,
    /// Generation budget.
    pub max_generations: u64,
    /// Invasions so far.
    pub invasions: u64,
    /// Resident's distance to the target, when the objective has one.
    pub distance: Option<f64>,
}

/// Summary statistics of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations executed.
    pub generations: u64,
    /// Number of resident replacements.
    pub invasions: u64,
    /// Generation of the last invasion (0 if none).
    pub last_invasion: u64,
    /// Seed the run was started with.
    pub seed: u64,
    /// Initial resident's distance to the target.
    pub initial_distance: Option<f64>,
    /// Final resident's distance to the target.
    pub final_distance: Option<f64>,
    pub stop_reason: StopReason,
    pub elapsed_seconds: f64,
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Final resident.
    pub resident: Vec<f64>,
    /// Compact history, if recording was enabled.
    pub history: Option<CompactHistory>,
    pub stats: EvolutionStats,
}

impl EvolutionResult {
    /// Whether a target-seeking run reached its target.
    pub fn finished(&self) -> bool {
        self.stats.stop_reason == StopReason::TargetReached
    }
}

/// Runs one evolutionary trajectory: mutate, compete, replace.
///
/// An engine performs a single run and owns its random source.
pub struct EvolutionEngine<M> {
    mutation: M,
    objective: Objective,
    rng: EvolutionRng,
    seed: u64,
    atol: f64,
    max_generations: u64,
    resident: Vec<f64>,
    /// Cached resident distance for distance objectives.
    resident_distance: Option<f64>,
    initial_distance: Option<f64>,
    generation: u64,
    invasions: u64,
    last_invasion: u64,
    history: Option<HistoryRecorder>,
    state: EngineState,
    started: Instant,
}

impl<M: MutationStrategy> EvolutionEngine<M> {
    /// Create an engine starting from `initial`.
    pub fn new(
        initial: Vec<f64>,
        mutation: M,
        objective: Objective,
        seed: u64,
    ) -> Result<Self, EvolutionError> {
        if initial.is_empty() {
            return Err(ConfigError::EmptyVector.into());
        }
        if let Some(len) = objective.target_len() {
            if len != initial.len() {
                return Err(EvolutionError::DimensionMismatch {
                    expected: initial.len(),
                    found: len,
                });
            }
        }

        let initial_distance = objective.distance_to_target(&initial);
        if initial_distance.is_some_and(f64::is_nan) {
            return Err(EvolutionError::NonFiniteScore { generation: 0 });
        }
        let (resident_distance, state) = match &objective {
            Objective::Distance { threshold, .. } => {
                let reached = initial_distance
                    .zip(*threshold)
                    .is_some_and(|(d, t)| d < t);
                let state = if reached {
                    EngineState::Terminated(StopReason::TargetReached)
                } else {
                    EngineState::Running
                };
                (initial_distance, state)
            }
            Objective::Fitness(_) => {
                let state = if initial_distance == Some(0.0) {
                    EngineState::Terminated(StopReason::TargetReached)
                } else {
                    EngineState::Running
                };
                (None, state)
            }
        };

        Ok(Self {
            mutation,
            objective,
            rng: EvolutionRng::new(seed),
            seed,
            atol: DEFAULT_ATOL,
            max_generations: DEFAULT_GENERATIONS,
            resident: initial,
            resident_distance,
            initial_distance,
            generation: 0,
            invasions: 0,
            last_invasion: 0,
            history: None,
            state,
            started: Instant::now(),
        })
    }

    /// Set the invasion tolerance. 0.0 accepts any strict improvement.
    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }

    /// Set the generation budget.
    pub fn with_generations(mut self, generations: u64) -> Self {
        self.max_generations = generations;
        self
    }

    /// Enable or disable compact history recording.
    pub fn with_history(mut self, record: bool) -> Self {
        self.history = record.then(HistoryRecorder::new);
        self
    }

    /// Current resident.
    pub fn resident(&self) -> &[f64] {
        &self.resident
    }

    /// Generations executed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn invasions(&self) -> u64 {
        self.invasions
    }

    pub fn max_generations(&self) -> u64 {
        self.max_generations
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Resident's distance to the target, when the objective has one.
    pub fn resident_distance(&self) -> Option<f64> {
        match self.objective {
            Objective::Distance { .. } => self.resident_distance,
            Objective::Fitness(_) => self.objective.distance_to_target(&self.resident),
        }
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> EvolutionProgress {
        EvolutionProgress {
            generation: self.generation,
            max_generations: self.max_generations,
            invasions: self.invasions,
            distance: self.resident_distance(),
        }
    }

    /// Check if the run should stop.
    pub fn should_stop(&self) -> Option<StopReason> {
        match self.state {
            EngineState::Terminated(reason) => Some(reason),
            EngineState::Running if self.generation >= self.max_generations => {
                Some(StopReason::MaxGenerations)
            }
            EngineState::Running => None,
        }
    }

    /// Run one generation: propose a mutant, score it against the resident
    /// and replace the resident if the mutant invades.
    ///
    /// Returns whether an invasion occurred.
    pub fn evolution_step(&mut self) -> Result<bool, EvolutionError> {
        if let Some(reason) = self.should_stop() {
            self.state = EngineState::Terminated(reason);
            return Err(EvolutionError::Terminated(reason));
        }

        let mutant = self.mutation.mutate(&self.resident, &mut self.rng)?;
        if mutant.len() != self.resident.len() {
            return Err(EvolutionError::DimensionMismatch {
                expected: self.resident.len(),
                found: mutant.len(),
            });
        }
        let generation = self.generation + 1;
        self.generation = generation;

        let (invaded, reached) = match &self.objective {
            Objective::Fitness(evaluator) => {
                let (fitness_resident, fitness_mutant) = evaluator.fitness(&self.resident, &mutant);
                if fitness_resident.is_nan() || fitness_mutant.is_nan() {
                    return Err(EvolutionError::NonFiniteScore { generation });
                }
                if fitness_resident == f64::INFINITY {
                    (false, true)
                } else if fitness_mutant == f64::INFINITY {
                    (true, true)
                } else {
                    (
                        fitness_invades(fitness_resident, fitness_mutant, self.atol),
                        false,
                    )
                }
            }
            Objective::Distance {
                metric,
                target,
                threshold,
            } => {
                let distance_mutant = metric.distance(&mutant, target);
                if distance_mutant.is_nan() {
                    return Err(EvolutionError::NonFiniteScore { generation });
                }
                let distance_resident = self.resident_distance.unwrap_or(f64::INFINITY);
                let invaded = distance_invades(distance_resident, distance_mutant, self.atol);
                let current = if invaded {
                    distance_mutant
                } else {
                    distance_resident
                };
                self.resident_distance = Some(current);
                (invaded, threshold.is_some_and(|t| current < t))
            }
        };

        if invaded {
            let displaced = std::mem::replace(&mut self.resident, mutant);
            if let Some(recorder) = &mut self.history {
                recorder.record_invasion(generation, displaced)?;
            }
            self.invasions += 1;
            self.last_invasion = generation;
            log::trace!("generation {}: invasion #{}", generation, self.invasions);
        }

        if reached {
            self.state = EngineState::Terminated(StopReason::TargetReached);
        } else if generation >= self.max_generations {
            self.state = EngineState::Terminated(StopReason::MaxGenerations);
        }

        Ok(invaded)
    }

    /// Run evolution, reporting progress after every invasion.
    pub fn run_with_callback<F>(mut self, mut callback: F) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&EvolutionProgress),
    {
        log::debug!(
            "starting run: {} traits, {} generations, seed {}",
            self.resident.len(),
            self.max_generations,
            self.seed
        );

        while self.should_stop().is_none() {
            if self.evolution_step()? {
                callback(&self.progress());
            }
        }

        Ok(self.finish())
    }

    /// Run evolution (blocking).
    pub fn run(self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }

    /// Collect the result. A run that has not terminated reports
    /// [`StopReason::Interrupted`].
    pub fn finish(self) -> EvolutionResult {
        let stop_reason = match self.should_stop() {
            Some(reason) => reason,
            None => StopReason::Interrupted,
        };
        let final_distance = self.resident_distance();
        let target_seeking = match &self.objective {
            Objective::Distance { threshold, .. } => threshold.is_some(),
            Objective::Fitness(_) => self.initial_distance.is_some(),
        };

        if target_seeking && stop_reason != StopReason::TargetReached {
            log::warn!(
                "target not reached after {} generations (distance {:?})",
                self.generation,
                final_distance
            );
        }
        log::debug!(
            "run finished: {:?} after {} generations, {} invasions",
            stop_reason,
            self.generation,
            self.invasions
        );

        EvolutionResult {
            resident: self.resident,
            history: self.history.map(HistoryRecorder::finish),
            stats: EvolutionStats {
                generations: self.generation,
                invasions: self.invasions,
                last_invasion: self.last_invasion,
                seed: self.seed,
                initial_distance: self.initial_distance,
                final_distance,
                stop_reason,
                elapsed_seconds: self.started.elapsed().as_secs_f64(),
            },
        }
    }
}

impl EvolutionEngine<Bounded<Mutation>> {
    /// Build an engine from a run configuration and a resolved problem.
    pub fn from_config(problem: &ResolvedProblem, config: &RunConfig) -> Result<Self, EvolutionError> {
        config.validate()?;
        check_len("domain", problem.initial.len(), problem.domain.len())?;
        if let Some(target) = &problem.target {
            check_len("target", problem.initial.len(), target.len())?;
        }

        let mutation = Mutation::new(config.mutation, Some(&problem.domain))?
            .bounded(config.bounds)
            .with_max_attempts(config.max_mutation_attempts);
        let objective = Objective::from_config(&config.objective, problem.target.as_deref())?;

        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = EvolutionRng::random().next_seed();
                log::info!("no seed configured, using {}", seed);
                seed
            }
        };

        Ok(Self::new(problem.initial.clone(), mutation, objective, seed)?
            .with_atol(config.atol)
            .with_generations(config.generations)
            .with_history(config.record_history))
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), ConfigError> {
    if expected == found {
        Ok(())
    } else {
        Err(ConfigError::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}

/// Evolve `initial` for up to `generations` generations.
///
/// Mutation parameters (epsilon, domain, bounds) travel inside `mutation`;
/// the default tolerance applies.
pub fn evolve<M: MutationStrategy>(
    initial: Vec<f64>,
    mutation: M,
    objective: Objective,
    generations: u64,
    seed: u64,
    record_history: bool,
) -> Result<EvolutionResult, EvolutionError> {
    EvolutionEngine::new(initial, mutation, objective, seed)?
        .with_generations(generations)
        .with_history(record_history)
        .run()
}

/// Evolution failures.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Mutation failed: {0}")]
    Mutation(#[from] MutationError),
    #[error("History recording failed: {0}")]
    History(#[from] HistoryError),
    #[error("Score is NaN at generation {generation}")]
    NonFiniteScore { generation: u64 },
    #[error("Vector has {found} entries, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Run already terminated ({0:?})")]
    Terminated(StopReason),
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::compute::{FitnessEvaluator, InverseDistanceFitness, L1Distance, one_norm_distance};
    use crate::schema::{Bounds, MutationConfig, ObjectiveConfig, Problem, linspace};

    fn point(epsilon: f64) -> Mutation {
        Mutation::new(MutationConfig::Point { epsilon }, None).unwrap()
    }

    fn squares(domain: &[f64]) -> Vec<f64> {
        domain.iter().map(|x| x * x).collect()
    }

    #[test]
    fn test_distance_run_improves() {
        let x = linspace(0.01, 1.0, 100);
        let target = squares(&x);
        let initial = vec![0.0; 100];
        let start = one_norm_distance(&initial, &target);

        let result = evolve(
            initial,
            point(0.01),
            Objective::distance(L1Distance, target.clone()),
            5_000,
            42,
            false,
        )
        .unwrap();

        let end = one_norm_distance(&result.resident, &target);
        assert!(end < start);
        assert_eq!(result.stats.final_distance, Some(end));
        assert_eq!(result.stats.generations, 5_000);
        assert_eq!(result.stats.stop_reason, StopReason::MaxGenerations);
    }

    #[test]
    fn test_distance_never_increases() {
        let x = linspace(0.0, 1.0, 20);
        let mut engine = EvolutionEngine::new(
            vec![0.0; 20],
            point(0.05),
            Objective::distance(L1Distance, squares(&x)),
            3,
        )
        .unwrap()
        .with_generations(2_000);

        let mut previous = engine.resident_distance().unwrap();
        while engine.should_stop().is_none() {
            engine.evolution_step().unwrap();
            let current = engine.resident_distance().unwrap();
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_determinism() {
        let x = linspace(0.01, 1.0, 50);
        let run = || {
            let mutation = Mutation::new(
                MutationConfig::Gaussian {
                    epsilon: 0.05,
                    width: 0.01,
                },
                Some(x.as_slice()),
            )
            .unwrap();
            evolve(
                vec![0.0; 50],
                mutation,
                Objective::fitness(InverseDistanceFitness::new(squares(&x))),
                2_000,
                99,
                true,
            )
            .unwrap()
        };

        let a = run();
        let b = run();
        assert_eq!(a.resident, b.resident);
        assert_eq!(a.history, b.history);
        assert!(a.stats.invasions > 0);
    }

    #[test]
    fn test_history_alive_sum() {
        let x = linspace(0.01, 1.0, 30);
        let result = evolve(
            vec![0.0; 30],
            point(0.02),
            Objective::distance(L1Distance, squares(&x)),
            3_000,
            5,
            true,
        )
        .unwrap();

        let history = result.history.unwrap();
        assert_eq!(history.len() as u64, result.stats.invasions);
        assert_eq!(history.total_generations(), result.stats.last_invasion);
        assert!(history.iter().all(|e| e.alive > 0));
        // The first displaced resident is the initial vector.
        assert!(history.entries()[0].resident.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_history_disabled() {
        let result = evolve(
            vec![0.0; 5],
            point(0.1),
            Objective::distance(L1Distance, vec![1.0; 5]),
            100,
            0,
            false,
        )
        .unwrap();
        assert!(result.history.is_none());
    }

    #[test]
    fn test_tolerance_blocks_noise_invasions() {
        // Every mutant is "fitter" by less than the tolerance.
        let noise = |_: &[f64], _: &[f64]| -> (f64, f64) { (1.0, 1.0 + 1e-9) };

        let result = evolve(
            vec![0.0; 4],
            point(0.1),
            Objective::fitness(noise),
            500,
            1,
            false,
        )
        .unwrap();
        assert_eq!(result.stats.invasions, 0);
        assert_eq!(result.resident, vec![0.0; 4]);

        let result = EvolutionEngine::new(vec![0.0; 4], point(0.1), Objective::fitness(noise), 1)
            .unwrap()
            .with_atol(0.0)
            .with_generations(500)
            .run()
            .unwrap();
        assert_eq!(result.stats.invasions, 500);
    }

    #[test]
    fn test_reported_invasions_exceed_tolerance() {
        let scores: Rc<RefCell<Vec<(f64, f64)>>> = Rc::default();
        let log = Rc::clone(&scores);
        let target = vec![0.3; 10];
        let inner = InverseDistanceFitness::new(target);
        let recording = move |resident: &[f64], mutant: &[f64]| -> (f64, f64) {
            let pair = inner.fitness(resident, mutant);
            log.borrow_mut().push(pair);
            pair
        };

        let mut engine =
            EvolutionEngine::new(vec![0.0; 10], point(0.01), Objective::fitness(recording), 8)
                .unwrap()
                .with_generations(2_000);
        while engine.should_stop().is_none() {
            let invaded = engine.evolution_step().unwrap();
            let (resident, mutant) = *scores.borrow().last().unwrap();
            if invaded {
                assert!(mutant > resident);
                assert!((mutant - resident).abs() > DEFAULT_ATOL);
            }
        }
    }

    #[test]
    fn test_exact_match_terminates() {
        let result = evolve(
            vec![0.0],
            point(0.2),
            Objective::fitness(InverseDistanceFitness::new(vec![0.2])),
            1_000,
            4,
            true,
        )
        .unwrap();

        assert!(result.finished());
        assert_eq!(result.resident, vec![0.2]);
        assert_eq!(result.stats.final_distance, Some(0.0));
        assert!(result.stats.generations < 1_000);
        assert_eq!(result.history.unwrap().len(), 1);
    }

    #[test]
    fn test_threshold_terminates() {
        let x = linspace(0.0, 1.0, 10);
        let target = squares(&x);
        let initial_distance = one_norm_distance(&[0.0; 10], &target);

        let result = EvolutionEngine::new(
            vec![0.0; 10],
            point(0.05),
            Objective::distance(L1Distance, target).with_threshold(initial_distance * 0.5),
            11,
        )
        .unwrap()
        .with_generations(1_000_000)
        .run()
        .unwrap();

        assert!(result.finished());
        assert!(result.stats.final_distance.unwrap() < initial_distance * 0.5);
        assert!(result.stats.generations < 1_000_000);
    }

    #[test]
    fn test_threshold_not_reached_is_not_an_error() {
        let result = EvolutionEngine::new(
            vec![0.0; 10],
            point(0.05),
            Objective::distance(L1Distance, vec![1.0; 10]).with_threshold(1e-12),
            2,
        )
        .unwrap()
        .with_generations(50)
        .run()
        .unwrap();

        assert!(!result.finished());
        assert_eq!(result.stats.stop_reason, StopReason::MaxGenerations);
        assert!(result.stats.final_distance.unwrap() > 0.0);
    }

    #[test]
    fn test_already_at_target() {
        let mut engine = EvolutionEngine::new(
            vec![1.0; 3],
            point(0.1),
            Objective::distance(L1Distance, vec![1.0; 3]).with_threshold(0.5),
            0,
        )
        .unwrap();

        assert_eq!(engine.should_stop(), Some(StopReason::TargetReached));
        assert!(matches!(
            engine.evolution_step(),
            Err(EvolutionError::Terminated(StopReason::TargetReached))
        ));

        let result = engine.finish();
        assert!(result.finished());
        assert_eq!(result.stats.generations, 0);
    }

    #[test]
    fn test_step_after_budget() {
        let mut engine = EvolutionEngine::new(
            vec![0.0; 3],
            point(0.1),
            Objective::distance(L1Distance, vec![1.0; 3]),
            0,
        )
        .unwrap()
        .with_generations(2);

        engine.evolution_step().unwrap();
        engine.evolution_step().unwrap();
        assert_eq!(engine.state(), EngineState::Terminated(StopReason::MaxGenerations));
        assert!(matches!(
            engine.evolution_step(),
            Err(EvolutionError::Terminated(StopReason::MaxGenerations))
        ));
    }

    #[test]
    fn test_interrupted_finish() {
        let mut engine = EvolutionEngine::new(
            vec![0.0; 3],
            point(0.1),
            Objective::distance(L1Distance, vec![1.0; 3]),
            0,
        )
        .unwrap()
        .with_generations(10);
        engine.evolution_step().unwrap();

        let result = engine.finish();
        assert_eq!(result.stats.stop_reason, StopReason::Interrupted);
        assert_eq!(result.stats.generations, 1);
    }

    #[test]
    fn test_nan_score_is_fatal() {
        let broken = |_: &[f64], _: &[f64]| -> (f64, f64) { (f64::NAN, 1.0) };
        let err = evolve(
            vec![0.0; 3],
            point(0.1),
            Objective::fitness(broken),
            10,
            0,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, EvolutionError::NonFiniteScore { generation: 1 }));
    }

    #[test]
    fn test_infeasible_bounds_abort_run() {
        let mutation = point(1.0)
            .bounded(Bounds::new(0.0, 0.5))
            .with_max_attempts(50);
        let err = evolve(
            vec![0.0; 10],
            mutation,
            Objective::distance(L1Distance, vec![0.25; 10]),
            10,
            0,
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Mutation(MutationError::Infeasible { attempts: 50, .. })
        ));
    }

    #[test]
    fn test_dimension_checks() {
        let err = EvolutionEngine::new(
            vec![0.0; 3],
            point(0.1),
            Objective::distance(L1Distance, vec![1.0; 4]),
            0,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            EvolutionError::DimensionMismatch {
                expected: 3,
                found: 4,
            }
        ));

        let grow = |resident: &[f64], _: &mut EvolutionRng| -> Vec<f64> {
            let mut v = resident.to_vec();
            v.push(0.0);
            v
        };
        let mut engine = EvolutionEngine::new(
            vec![0.0; 3],
            grow,
            Objective::distance(L1Distance, vec![1.0; 3]),
            0,
        )
        .unwrap();
        assert!(matches!(
            engine.evolution_step(),
            Err(EvolutionError::DimensionMismatch { .. })
        ));

        assert!(matches!(
            EvolutionEngine::new(vec![], point(0.1), Objective::distance(L1Distance, vec![]), 0),
            Err(EvolutionError::Config(ConfigError::EmptyVector))
        ));
    }

    #[test]
    fn test_fitness_target_length_checked() {
        let err = EvolutionEngine::new(
            vec![0.0; 3],
            point(0.1),
            Objective::fitness(InverseDistanceFitness::new(vec![1.0; 5])),
            0,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            EvolutionError::DimensionMismatch {
                expected: 3,
                found: 5,
            }
        ));

        // Closures carry no target and are not length-checked.
        let flat = |_: &[f64], _: &[f64]| -> (f64, f64) { (0.0, 0.0) };
        assert!(EvolutionEngine::new(vec![0.0; 3], point(0.1), Objective::fitness(flat), 0).is_ok());
    }

    #[test]
    fn test_nan_initial_distance_is_fatal() {
        let err = EvolutionEngine::new(
            vec![0.0, f64::NAN],
            point(0.1),
            Objective::distance(L1Distance, vec![1.0; 2]),
            0,
        )
        .err()
        .unwrap();
        assert!(matches!(err, EvolutionError::NonFiniteScore { generation: 0 }));

        let err = EvolutionEngine::new(
            vec![0.0; 2],
            point(0.1),
            Objective::fitness(InverseDistanceFitness::new(vec![1.0, f64::NAN])),
            0,
        )
        .err()
        .unwrap();
        assert!(matches!(err, EvolutionError::NonFiniteScore { generation: 0 }));
    }

    #[test]
    fn test_callback_sees_every_invasion() {
        let x = linspace(0.0, 1.0, 10);
        let mut seen = 0u64;
        let result = EvolutionEngine::new(
            vec![0.0; 10],
            point(0.05),
            Objective::distance(L1Distance, squares(&x)),
            6,
        )
        .unwrap()
        .with_generations(500)
        .run_with_callback(|progress| {
            seen += 1;
            assert_eq!(progress.invasions, seen);
            assert!(progress.distance.is_some());
        })
        .unwrap();
        assert_eq!(seen, result.stats.invasions);
    }

    #[test]
    fn test_from_config() {
        let problem = Problem::default().resolve().unwrap();
        let config = RunConfig {
            mutation: MutationConfig::GaussianPair {
                epsilon: 0.05,
                width: 0.01,
            },
            objective: ObjectiveConfig::InverseDistance,
            generations: 1_000,
            seed: Some(17),
            record_history: true,
            ..Default::default()
        };

        let engine = EvolutionEngine::from_config(&problem, &config).unwrap();
        assert_eq!(engine.seed(), 17);
        assert_eq!(engine.max_generations(), 1_000);

        let result = engine.run().unwrap();
        assert_eq!(result.stats.generations, 1_000);
        assert!(result.history.is_some());
    }

    #[test]
    fn test_from_config_requires_target() {
        let mut problem = Problem::default().resolve().unwrap();
        problem.target = None;
        let err = EvolutionEngine::from_config(&problem, &RunConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, EvolutionError::Config(ConfigError::MissingTarget)));
    }

    #[test]
    fn test_from_config_bounds() {
        let problem = Problem::default().resolve().unwrap();
        let config = RunConfig {
            mutation: MutationConfig::Point { epsilon: 0.2 },
            bounds: Bounds::new(0.0, 0.5),
            generations: 2_000,
            seed: Some(3),
            ..Default::default()
        };
        let result = EvolutionEngine::from_config(&problem, &config)
            .unwrap()
            .run()
            .unwrap();
        assert!(config.bounds.contains(&result.resident));
    }
}
