use nalgebra::DVector;

use crate::error::SirdError;
use crate::parameters::{ModelParameters, ParameterSet};
use crate::sampler::RateSampler;

/// Component indices within one population block.
pub const SUSCEPTIBLE: usize = 0;
pub const INFECTED: usize = 1;
pub const RECOVERED: usize = 2;
pub const DEAD: usize = 3;
/// Cumulative-infection column of the tracked single-population layout.
pub const CUMULATIVE: usize = 4;

/// Components per population block in the coupled layout.
pub const BLOCK: usize = 4;

/// Per-step state increments for one model variant.
///
/// The caller picks the variant explicitly and pairs it with the matching
/// [`ModelParameters`] side; there is no implicit dispatch on state length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionModel {
    /// One population, state [S, I, R, D], optionally extended with a
    /// cumulative-infection column for incidence tracking.
    Single { track_cumulative: bool },
    /// Two populations with cross-infection, state = two 4-blocks.
    Coupled,
}

impl TransitionModel {
    /// Expected state vector length for this variant.
    pub fn state_dim(&self) -> usize {
        match self {
            Self::Single { track_cumulative } => {
                if *track_cumulative {
                    CUMULATIVE + 1
                } else {
                    BLOCK
                }
            }
            Self::Coupled => 2 * BLOCK,
        }
    }

    /// Compute the increment vector for one timestep.
    ///
    /// Draw order is fixed (own transitions of each block in layout order,
    /// then the two cross-infection terms) so that seeded stochastic runs are
    /// reproducible.
    pub fn increments(
        &self,
        state: &DVector<f64>,
        params: &ModelParameters,
        dt: f64,
        sampler: &mut RateSampler,
    ) -> Result<DVector<f64>, SirdError> {
        if state.len() != self.state_dim() {
            return Err(SirdError::DimensionMismatch {
                expected: self.state_dim(),
                actual: state.len(),
            });
        }
        match (self, params) {
            (Self::Single { track_cumulative }, ModelParameters::Single(par)) => {
                let own = block_increments(&state.as_slice()[..BLOCK], par, dt, sampler)?;
                let take = if *track_cumulative {
                    CUMULATIVE + 1
                } else {
                    BLOCK
                };
                Ok(DVector::from_row_slice(&own[..take]))
            }
            (Self::Coupled, ModelParameters::Coupled(par)) => {
                let first = &state.as_slice()[..BLOCK];
                let second = &state.as_slice()[BLOCK..];
                let own_1 = block_increments(first, &par.first, dt, sampler)?;
                let own_2 = block_increments(second, &par.second, dt, sampler)?;

                // Cross-infection pressure is normalized by the combined
                // population; rate_a_to_b pairs infectors a with infectees b.
                let n_total = par.first.population + par.second.population;
                let cross_to_first = sampler.draw(
                    par.mixing.rate_2_to_1 * first[SUSCEPTIBLE] * second[INFECTED] / n_total * dt,
                )?;
                let cross_to_second = sampler.draw(
                    par.mixing.rate_1_to_2 * second[SUSCEPTIBLE] * first[INFECTED] / n_total * dt,
                )?;

                let mut inc = DVector::zeros(2 * BLOCK);
                inc.as_mut_slice()[..BLOCK].copy_from_slice(&own_1[..BLOCK]);
                inc.as_mut_slice()[BLOCK..].copy_from_slice(&own_2[..BLOCK]);
                inc[SUSCEPTIBLE] -= cross_to_first;
                inc[INFECTED] += cross_to_first;
                inc[BLOCK + SUSCEPTIBLE] -= cross_to_second;
                inc[BLOCK + INFECTED] += cross_to_second;
                Ok(inc)
            }
            (model, params) => Err(SirdError::DimensionMismatch {
                expected: model.state_dim(),
                actual: match params {
                    ModelParameters::Single(_) => BLOCK,
                    ModelParameters::Coupled(_) => 2 * BLOCK,
                },
            }),
        }
    }
}

/// Own transitions of one [S, I, R, D] block, returned as
/// [ΔS, ΔI, ΔR, ΔD, ΔCumulative].
///
/// The four counts are drawn independently given the current state (no joint
/// multinomial correction), so for large Δt more individuals can leave I in
/// one step than are present. This matches the source model; the integrator's
/// non-negativity clamp is the safety net.
fn block_increments(
    state: &[f64],
    par: &ParameterSet,
    dt: f64,
    sampler: &mut RateSampler,
) -> Result<[f64; 5], SirdError> {
    let s = state[SUSCEPTIBLE];
    let i = state[INFECTED];
    let r = state[RECOVERED];

    let n_infected = sampler.draw(par.infection_rate * i * s / par.population * dt)?;
    let n_immunity_lost = sampler.draw(par.immunity_loss_rate * r * dt)?;
    let n_recovered = sampler.draw(par.recovery_rate * (1.0 - par.death_fraction) * i * dt)?;
    let n_dead = sampler.draw(par.recovery_rate * par.death_fraction * i * dt)?;

    Ok([
        -n_infected + n_immunity_lost,
        n_infected - n_recovered - n_dead,
        n_recovered - n_immunity_lost,
        n_dead,
        n_infected,
    ])
}
