//! Problem description: the domain, the starting resident and the target.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Everything a run needs besides its [`RunConfig`](super::RunConfig).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    /// Sample points of the trait surface.
    pub domain: Domain,
    /// Initial resident, evaluated on the domain.
    pub initial: Profile,
    /// Target surface for distance-based objectives.
    #[serde(default)]
    pub target: Option<Profile>,
}

impl Default for Problem {
    fn default() -> Self {
        Self {
            domain: Domain::Linspace {
                start: 0.01,
                end: 1.0,
                points: 100,
            },
            initial: Profile::Constant { value: 0.0 },
            target: Some(Profile::Power {
                exponent: 2.0,
                scale: 1.0,
            }),
        }
    }
}

/// Ordered sample points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Domain {
    /// Evenly spaced points, both ends included.
    Linspace { start: f64, end: f64, points: usize },
    /// Explicit coordinates.
    Points { values: Vec<f64> },
}

/// A trait surface defined over the domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Profile {
    /// Same value everywhere.
    Constant { value: f64 },
    /// `scale * x^exponent` at every domain point `x`.
    Power { exponent: f64, scale: f64 },
    /// Explicit values, one per domain point.
    Values { values: Vec<f64> },
}

/// Concrete vectors resolved from a [`Problem`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProblem {
    pub domain: Vec<f64>,
    pub initial: Vec<f64>,
    pub target: Option<Vec<f64>>,
}

impl Domain {
    /// Generate the sample coordinates.
    pub fn generate(&self) -> Result<Vec<f64>, ConfigError> {
        let values = match self {
            Domain::Linspace { start, end, points } => {
                if *points == 0 || !start.is_finite() || !end.is_finite() {
                    return Err(ConfigError::InvalidDomain);
                }
                linspace(*start, *end, *points)
            }
            Domain::Points { values } => values.clone(),
        };
        if values.is_empty() {
            return Err(ConfigError::EmptyVector);
        }
        Ok(values)
    }
}

impl Profile {
    /// Evaluate the profile on the given domain.
    pub fn generate(&self, domain: &[f64], what: &'static str) -> Result<Vec<f64>, ConfigError> {
        match self {
            Profile::Constant { value } => Ok(vec![*value; domain.len()]),
            Profile::Power { exponent, scale } => {
                Ok(domain.iter().map(|x| scale * x.powf(*exponent)).collect())
            }
            Profile::Values { values } => {
                if values.len() != domain.len() {
                    return Err(ConfigError::LengthMismatch {
                        what,
                        expected: domain.len(),
                        found: values.len(),
                    });
                }
                Ok(values.clone())
            }
        }
    }
}

impl Problem {
    /// Resolve domain, initial resident and target into vectors of equal length.
    pub fn resolve(&self) -> Result<ResolvedProblem, ConfigError> {
        let domain = self.domain.generate()?;
        let initial = self.initial.generate(&domain, "initial")?;
        let target = self
            .target
            .as_ref()
            .map(|t| t.generate(&domain, "target"))
            .transpose()?;

        Ok(ResolvedProblem {
            domain,
            initial,
            target,
        })
    }
}

/// `points` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            let mut values: Vec<f64> = (0..points).map(|i| start + step * i as f64).collect();
            values[points - 1] = end;
            values
        }
    }
}
