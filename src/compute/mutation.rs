//! Mutation generators for trait vectors.
//!
//! Every generator copies the resident and perturbs the copy; the resident
//! itself is never touched. Randomness comes from an [`EvolutionRng`] owned
//! by the caller, so a run is reproducible from its seed.

use rand::prelude::*;
use rand_distr::Open01;

use crate::schema::{Bounds, ConfigError, DEFAULT_MAX_ATTEMPTS, MutationConfig};

/// Seeded random source for a single run.
pub struct EvolutionRng {
    rng: StdRng,
}

impl EvolutionRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Uniform index in `0..len`.
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Fair coin; true means "upwards".
    fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Uniform in the open interval (0, 1).
    fn open_unit(&mut self) -> f64 {
        self.rng.sample(Open01)
    }

    /// Push one uniformly chosen position up or down by `epsilon`.
    ///
    /// Panics if `vector` is empty.
    pub fn point_mutation(&mut self, vector: &[f64], epsilon: f64) -> Vec<f64> {
        let mut mutant = vector.to_vec();
        let position = self.index(vector.len());
        if self.coin() {
            mutant[position] += epsilon;
        } else {
            mutant[position] -= epsilon;
        }
        mutant
    }

    /// Move `epsilon` from one random position to another.
    ///
    /// The two positions are drawn independently and may coincide, in which
    /// case the mutant equals the resident. The amount moved never drives
    /// the donor position below zero.
    pub fn point_pair_mutation(&mut self, vector: &[f64], epsilon: f64) -> Vec<f64> {
        let mut mutant = vector.to_vec();
        let up = self.index(vector.len());
        let down = self.index(vector.len());
        if up == down {
            return mutant;
        }

        let delta = if mutant[down] - epsilon < 0.0 {
            mutant[down]
        } else {
            epsilon
        };
        mutant[up] += delta;
        mutant[down] -= delta;
        mutant
    }

    /// Add or subtract a Gaussian bump centred on a random domain point.
    ///
    /// The bump width is re-drawn on every call as `U(0, 1) * width`.
    ///
    /// Panics if `vector` is empty or `domain` is shorter than `vector`.
    pub fn gaussian_mutation(
        &mut self,
        vector: &[f64],
        epsilon: f64,
        domain: &[f64],
        width: f64,
    ) -> Vec<f64> {
        let loc = domain[self.index(vector.len())];
        let sign = if self.coin() { 1.0 } else { -1.0 };
        let width = self.open_unit() * width;

        vector
            .iter()
            .zip(domain)
            .map(|(&v, &x)| v + sign * gaussian_bump(x, epsilon, loc, width))
            .collect()
    }

    /// Add a Gaussian bump at one random domain point and subtract one at another.
    ///
    /// Both bumps share a re-drawn width. If `min(vector) - epsilon` would go
    /// negative the magnitude is clamped to `min(vector)`. The heavier of the
    /// two bumps is scaled so both carry the same mass over the domain, which
    /// keeps the vector's total unchanged.
    ///
    /// Panics if `vector` is empty or `domain` is shorter than `vector`.
    pub fn gaussian_pair_mutation(
        &mut self,
        vector: &[f64],
        epsilon: f64,
        domain: &[f64],
        width: f64,
    ) -> Vec<f64> {
        let up_index = self.index(vector.len());
        let down_index = self.index(vector.len());
        let width = self.open_unit() * width;
        if up_index == down_index {
            return vector.to_vec();
        }

        let minimum = vector.iter().copied().fold(f64::INFINITY, f64::min);
        let epsilon = if minimum - epsilon < 0.0 {
            minimum
        } else {
            epsilon
        };

        let (loc_up, loc_down) = (domain[up_index], domain[down_index]);
        let bump_up: Vec<f64> = domain
            .iter()
            .map(|&x| gaussian_bump(x, epsilon, loc_up, width))
            .collect();
        let bump_down: Vec<f64> = domain
            .iter()
            .map(|&x| gaussian_bump(x, epsilon, loc_down, width))
            .collect();

        let mass_up: f64 = bump_up.iter().sum();
        let mass_down: f64 = bump_down.iter().sum();
        let (scale_up, scale_down) = if mass_up.abs() > mass_down.abs() {
            (mass_down / mass_up, 1.0)
        } else if mass_down.abs() > mass_up.abs() {
            (1.0, mass_up / mass_down)
        } else {
            (1.0, 1.0)
        };

        vector
            .iter()
            .zip(bump_up.iter().zip(&bump_down))
            .map(|(&v, (&u, &d))| v + scale_up * u - scale_down * d)
            .collect()
    }
}

impl RngCore for EvolutionRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Gaussian bump: `epsilon * exp(-(x - loc)^2 / width)`.
#[inline]
pub fn gaussian_bump(x: f64, epsilon: f64, loc: f64, width: f64) -> f64 {
    let diff = x - loc;
    epsilon * (-diff * diff / width).exp()
}

/// Produces a candidate mutant from a resident.
///
/// Closures of the form `Fn(&[f64], &mut EvolutionRng) -> Vec<f64>` are
/// strategies too.
pub trait MutationStrategy {
    fn mutate(&self, resident: &[f64], rng: &mut EvolutionRng) -> Result<Vec<f64>, MutationError>;
}

impl<F> MutationStrategy for F
where
    F: Fn(&[f64], &mut EvolutionRng) -> Vec<f64>,
{
    fn mutate(&self, resident: &[f64], rng: &mut EvolutionRng) -> Result<Vec<f64>, MutationError> {
        Ok(self(resident, rng))
    }
}

/// One of the built-in generators, with its parameters and domain.
#[derive(Debug, Clone)]
pub struct Mutation {
    config: MutationConfig,
    domain: Vec<f64>,
}

impl Mutation {
    /// Build a generator. Gaussian variants require a domain.
    pub fn new(config: MutationConfig, domain: Option<&[f64]>) -> Result<Self, ConfigError> {
        config.validate()?;
        let domain = match domain {
            Some(d) if d.is_empty() => return Err(ConfigError::EmptyVector),
            Some(d) => d.to_vec(),
            None if config.needs_domain() => return Err(ConfigError::MissingDomain),
            None => Vec::new(),
        };
        Ok(Self { config, domain })
    }

    /// Generator configuration.
    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Domain the gaussian variants evaluate bumps on (empty for point variants
    /// built without one).
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// Wrap in rejection sampling against `bounds`.
    pub fn bounded(self, bounds: Bounds) -> Bounded<Self> {
        Bounded::new(self, bounds)
    }
}

impl MutationStrategy for Mutation {
    fn mutate(&self, resident: &[f64], rng: &mut EvolutionRng) -> Result<Vec<f64>, MutationError> {
        if self.config.needs_domain() && self.domain.len() != resident.len() {
            return Err(MutationError::DomainMismatch {
                domain: self.domain.len(),
                resident: resident.len(),
            });
        }

        let mutant = match self.config {
            MutationConfig::Point { epsilon } => rng.point_mutation(resident, epsilon),
            MutationConfig::PointPair { epsilon } => rng.point_pair_mutation(resident, epsilon),
            MutationConfig::Gaussian { epsilon, width } => {
                rng.gaussian_mutation(resident, epsilon, &self.domain, width)
            }
            MutationConfig::GaussianPair { epsilon, width } => {
                rng.gaussian_pair_mutation(resident, epsilon, &self.domain, width)
            }
        };
        Ok(mutant)
    }
}

/// Rejection-sampling wrapper: regenerates until the mutant is within bounds.
#[derive(Debug, Clone)]
pub struct Bounded<M> {
    inner: M,
    bounds: Bounds,
    max_attempts: u64,
}

impl<M> Bounded<M> {
    /// Wrap `inner` with the default attempt limit.
    pub fn new(inner: M, bounds: Bounds) -> Self {
        Self {
            inner,
            bounds,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the attempt limit (at least one attempt is always made).
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: MutationStrategy> MutationStrategy for Bounded<M> {
    fn mutate(&self, resident: &[f64], rng: &mut EvolutionRng) -> Result<Vec<f64>, MutationError> {
        for _ in 0..self.max_attempts {
            let mutant = self.inner.mutate(resident, rng)?;
            if self.bounds.contains(&mutant) {
                return Ok(mutant);
            }
        }
        Err(MutationError::Infeasible {
            attempts: self.max_attempts,
            lower: self.bounds.lower,
            upper: self.bounds.upper,
        })
    }
}

/// Mutation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MutationError {
    #[error("No mutant within bounds [{lower:?}, {upper:?}] after {attempts} attempts")]
    Infeasible {
        attempts: u64,
        lower: Option<f64>,
        upper: Option<f64>,
    },
    #[error("Domain has {domain} points but the resident has {resident} entries")]
    DomainMismatch { domain: usize, resident: usize },
}
