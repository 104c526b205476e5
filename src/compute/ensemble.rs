//! Independent replicate runs in parallel.

use rayon::prelude::*;

use crate::schema::{ResolvedProblem, RunConfig};

use super::engine::{EvolutionEngine, EvolutionError, EvolutionResult};

/// Run one replicate per seed, each on its own engine and random source.
///
/// Results are returned in seed order and are identical to running the same
/// seeds one after another.
pub fn run_ensemble(
    problem: &ResolvedProblem,
    config: &RunConfig,
    seeds: &[u64],
) -> Vec<Result<EvolutionResult, EvolutionError>> {
    log::debug!("running {} replicates", seeds.len());

    seeds
        .par_iter()
        .map(|&seed| {
            let config = RunConfig {
                seed: Some(seed),
                ..config.clone()
            };
            EvolutionEngine::from_config(problem, &config)?.run()
        })
        .collect()
}

/// Seeds `base, base + 1, ...` for `count` replicates.
pub fn replicate_seeds(base: u64, count: usize) -> Vec<u64> {
    (0..count as u64).map(|i| base.wrapping_add(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MutationConfig, Problem};

    fn config() -> RunConfig {
        RunConfig {
            mutation: MutationConfig::Point { epsilon: 0.02 },
            generations: 1_000,
            record_history: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_matches_serial_runs() {
        let problem = Problem::default().resolve().unwrap();
        let config = config();
        let seeds = replicate_seeds(10, 4);

        let parallel = run_ensemble(&problem, &config, &seeds);
        assert_eq!(parallel.len(), 4);

        for (seed, result) in seeds.iter().zip(parallel) {
            let result = result.unwrap();
            let serial = EvolutionEngine::from_config(
                &problem,
                &RunConfig {
                    seed: Some(*seed),
                    ..config.clone()
                },
            )
            .unwrap()
            .run()
            .unwrap();

            assert_eq!(result.stats.seed, *seed);
            assert_eq!(result.resident, serial.resident);
            assert_eq!(result.history, serial.history);
        }
    }

    #[test]
    fn test_errors_are_per_replicate() {
        let mut problem = Problem::default().resolve().unwrap();
        problem.target = None;
        let results = run_ensemble(&problem, &config(), &[1, 2]);
        assert!(results.iter().all(|r| r.is_err()));
    }

    #[test]
    fn test_replicate_seeds() {
        assert_eq!(replicate_seeds(5, 3), vec![5, 6, 7]);
        assert!(replicate_seeds(0, 0).is_empty());
    }
}
