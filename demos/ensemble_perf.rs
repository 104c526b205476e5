//! Quick ensemble performance test

use paramless::{
    compute::{replicate_seeds, run_ensemble},
    schema::{Bounds, MutationConfig, ObjectiveConfig, Problem, RunConfig},
};
use std::time::Instant;

fn main() {
    println!("=== Single Run Performance Test ===\n");

    let problem = Problem::default().resolve().unwrap();

    // Test different mutation generators
    let mutations = [
        MutationConfig::Point { epsilon: 0.01 },
        MutationConfig::PointPair { epsilon: 0.01 },
        MutationConfig::Gaussian {
            epsilon: 0.01,
            width: 0.05,
        },
        MutationConfig::GaussianPair {
            epsilon: 0.01,
            width: 0.05,
        },
    ];

    for mutation in mutations {
        println!("Mutation: {:?}", mutation);

        let config = RunConfig {
            mutation,
            objective: ObjectiveConfig::Distance { threshold: None },
            bounds: Bounds::new(0.0, 1.0),
            generations: 20_000,
            record_history: true,
            ..Default::default()
        };

        let start = Instant::now();
        let result = run_ensemble(&problem, &config, &[42]).remove(0).unwrap();
        let elapsed = start.elapsed();

        let gens_per_sec = result.stats.generations as f64 / elapsed.as_secs_f64();

        println!("  Generations:    {}", result.stats.generations);
        println!("  Invasions:      {}", result.stats.invasions);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Gens/sec:       {:.1}", gens_per_sec);
        println!(
            "  Distance:       {:.4} -> {:.4}",
            result.stats.initial_distance.unwrap_or(f64::NAN),
            result.stats.final_distance.unwrap_or(f64::NAN)
        );
        println!();
    }

    println!("=== Scalability Test (point mutation, 20k generations) ===\n");

    // Test different replicate counts
    for replicates in [1, 4, 16, 64] {
        let config = RunConfig {
            mutation: MutationConfig::Point { epsilon: 0.01 },
            generations: 20_000,
            ..Default::default()
        };

        let start = Instant::now();
        let results = run_ensemble(&problem, &config, &replicate_seeds(0, replicates));
        let elapsed = start.elapsed();

        let total_gens: u64 = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|r| r.stats.generations)
            .sum();
        let gens_per_sec = total_gens as f64 / elapsed.as_secs_f64();

        println!(
            "Replicates {}: {} generations in {:.2}s ({:.1} gens/sec)",
            replicates,
            total_gens,
            elapsed.as_secs_f64(),
            gens_per_sec
        );
    }
}
