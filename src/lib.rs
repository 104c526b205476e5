//! Paramless evolution - adaptive dynamics of a single resident trait vector.
//!
//! A resident vector is repeatedly challenged by a randomly mutated copy of
//! itself. The mutant replaces the resident when it scores better by more
//! than a small tolerance. Runs optionally keep a run-length encoded history
//! of every displaced resident, which can be expanded into per-generation
//! snapshots afterwards.
//!
//! # Architecture
//!
//! - `schema`: Run configuration and problem definitions (domain, initial
//!   and target vectors)
//! - `compute`: Mutation generators, bounds, evaluators and the evolution loop
//! - `history`: Compact history recording, expansion and downsampling
//!
//! # Example
//!
//! ```rust,no_run
//! use paramless::{
//!     compute::{L1Distance, Mutation, Objective, evolve},
//!     schema::{Bounds, MutationConfig, linspace},
//! };
//!
//! let domain = linspace(0.01, 1.0, 100);
//! let target: Vec<f64> = domain.iter().map(|x| x * x).collect();
//!
//! let mutation = Mutation::new(MutationConfig::Point { epsilon: 0.01 }, None)
//!     .unwrap()
//!     .bounded(Bounds::new(0.0, 1.0));
//! let objective = Objective::distance(L1Distance, target);
//!
//! let result = evolve(vec![0.0; 100], mutation, objective, 100_000, 42, true).unwrap();
//! println!("Final distance: {:?}", result.stats.final_distance);
//! ```

pub mod compute;
pub mod history;
pub mod schema;

// Re-export commonly used types
pub use compute::{EvolutionEngine, EvolutionError, EvolutionResult, Objective, evolve};
pub use history::{CompactHistory, DenseHistory};
pub use schema::{Problem, RunConfig};
