//! Compute module - Mutation, scoring and the evolution loop.

mod bounds;
mod engine;
mod ensemble;
mod fitness;
mod mutation;

pub use bounds::*;
pub use engine::*;
pub use ensemble::*;
pub use fitness::*;
pub use mutation::*;
