use rand::{SeedableRng, distr::Distribution, rngs::StdRng};
use rand_distr::Poisson;

use crate::error::SirdError;

/// Turns an expected transition count (rate × Δt) into an actual count for
/// one step.
///
/// Deterministic mode passes the expectation through unchanged, so counts may
/// be fractional. Stochastic mode draws from Poisson(expected) and always
/// returns a whole number (as `f64`).
pub enum RateSampler {
    Deterministic,
    Stochastic(StdRng),
}

impl RateSampler {
    pub fn deterministic() -> Self {
        Self::Deterministic
    }

    /// Stochastic sampler with an explicit seed. Identical seeds and an
    /// identical sequence of draws reproduce a run exactly.
    pub fn seeded(seed: u64) -> Self {
        Self::Stochastic(StdRng::seed_from_u64(seed))
    }

    /// Draw one transition count with the given expected value.
    ///
    /// An expected value of zero yields zero in both modes; a negative or
    /// non-finite expectation is a precondition violation.
    pub fn draw(&mut self, expected: f64) -> Result<f64, SirdError> {
        if !expected.is_finite() || expected < 0.0 {
            return Err(SirdError::InvalidRate(expected));
        }
        match self {
            Self::Deterministic => Ok(expected),
            Self::Stochastic(rng) => {
                if expected > 0.0 {
                    // Poisson requires a non-zero rate
                    Ok(Poisson::new(expected).unwrap().sample(rng))
                } else {
                    Ok(0.0)
                }
            }
        }
    }
}
