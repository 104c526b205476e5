//! Paramless CLI - Run an evolutionary trajectory from JSON configuration.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::de::DeserializeOwned;

use paramless::{
    compute::{EvolutionEngine, EvolutionError},
    schema::{Problem, RunConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Evolve a resident trait vector from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to run configuration file");
        eprintln!("  generations  Generation budget (default: from config)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let mut config: RunConfig = load_json(&config_path, "config");
    if let Some(generations) = args.get(2).and_then(|s| s.parse().ok()) {
        config.generations = generations;
    }

    // Load or create problem
    let problem_path = config_path.with_extension("problem.json");
    let problem: Problem = if problem_path.exists() {
        load_json(&problem_path, "problem")
    } else {
        Problem::default()
    };
    let problem = problem.resolve().unwrap_or_else(|e| {
        eprintln!("Invalid problem: {}", e);
        std::process::exit(1);
    });

    println!("Paramless Evolution");
    println!("===================");
    println!("Traits: {}", problem.initial.len());
    println!("Mutation: {:?}", config.mutation);
    println!("Objective: {:?}", config.objective);
    println!("Bounds: [{:?}, {:?}]", config.bounds.lower, config.bounds.upper);
    println!("atol: {}", config.atol);
    println!("Generations: {}", config.generations);
    println!();

    if let Err(e) = run(&config_path, &problem, &config) {
        eprintln!("Evolution failed: {}", e);
        std::process::exit(1);
    }
}

fn run(
    config_path: &Path,
    problem: &paramless::schema::ResolvedProblem,
    config: &RunConfig,
) -> Result<(), EvolutionError> {
    let mut engine = EvolutionEngine::from_config(problem, config)?;
    let generations = engine.max_generations();

    println!("Seed: {}", engine.seed());
    if let Some(distance) = engine.resident_distance() {
        println!("Initial distance: {:.6}", distance);
    }
    println!();

    println!("Running evolution...");
    let start = Instant::now();

    while engine.should_stop().is_none() {
        engine.evolution_step()?;

        // Print progress every 10%
        let generation = engine.generation();
        if generation % (generations / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            let per_sec = generation as f32 / elapsed;
            match engine.resident_distance() {
                Some(distance) => println!(
                    "  Generation {}/{}: invasions={}, distance={:.6}, {:.0} gen/s",
                    generation,
                    generations,
                    engine.invasions(),
                    distance,
                    per_sec
                ),
                None => println!(
                    "  Generation {}/{}: invasions={}, {:.0} gen/s",
                    generation,
                    generations,
                    engine.invasions(),
                    per_sec
                ),
            }
        }
    }

    let result = engine.finish();
    let elapsed = start.elapsed();

    println!();
    println!("Final state:");
    println!("  Stop reason: {:?}", result.stats.stop_reason);
    println!("  Generations: {}", result.stats.generations);
    println!("  Invasions: {}", result.stats.invasions);
    if let Some(distance) = result.stats.final_distance {
        println!("  Distance: {:.6}", distance);
    }
    let total: f64 = result.resident.iter().sum();
    println!("  Resident sum: {:.6}", total);
    println!();
    println!(
        "Time: {:.2}s ({:.0} gen/s)",
        elapsed.as_secs_f32(),
        result.stats.generations as f32 / elapsed.as_secs_f32()
    );

    if let Some(history) = &result.history {
        let history_path = config_path.with_extension("history.json");
        let written = File::create(&history_path)
            .and_then(|file| history.write_json(BufWriter::new(file)));
        match written {
            Ok(()) => println!(
                "History: {} entries written to {}",
                history.len(),
                history_path.display()
            ),
            Err(e) => eprintln!("Error writing history: {}", e),
        }
    }

    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> T {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {} file: {}", what, e);
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", what, e);
        std::process::exit(1);
    })
}

fn print_example_config() {
    let config = RunConfig {
        seed: Some(42),
        record_history: true,
        ..Default::default()
    };
    let problem = Problem::default();

    let rendered = serde_json::to_string_pretty(&config)
        .and_then(|c| serde_json::to_string_pretty(&problem).map(|p| (c, p)));
    match rendered {
        Ok((config, problem)) => {
            println!("Example configuration (config.json):");
            println!("{}", config);
            println!();
            println!("Example problem (config.problem.json):");
            println!("{}", problem);
        }
        Err(e) => eprintln!("Error rendering example: {}", e),
    }
}
