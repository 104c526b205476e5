//! Schema module - Configuration and problem types for paramless evolution.

mod config;
mod problem;

pub use config::*;
pub use problem::*;
