use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::SirdError;
use crate::feedback::FeedbackPolicy;
use crate::parameters::ModelParameters;
use crate::sampler::RateSampler;
use crate::trajectory::Trajectory;
use crate::transition::TransitionModel;

/// Validated simulation horizon. Row `n` of a trajectory corresponds to
/// time `t_start + n * dt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    t_start: f64,
    t_end: f64,
    dt: f64,
}

impl TimeGrid {
    pub fn new(t_start: f64, t_end: f64, dt: f64) -> Result<Self, SirdError> {
        let valid =
            t_start.is_finite() && t_end.is_finite() && dt.is_finite() && dt > 0.0 && t_end >= t_start;
        if !valid {
            return Err(SirdError::InvalidTimeRange { t_start, t_end, dt });
        }
        Ok(Self { t_start, t_end, dt })
    }

    /// Number of time points including the initial condition:
    /// ⌊(t_end − t_start) / dt⌋ + 1.
    pub fn num_points(&self) -> usize {
        ((self.t_end - self.t_start) / self.dt).floor() as usize + 1
    }

    pub fn time(&self, step: usize) -> f64 {
        self.t_start + step as f64 * self.dt
    }

    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }
}

/// Forward-Euler time-stepping driver.
///
/// Owns the random source; two integrators built with the same seed and fed
/// the same run produce bit-identical trajectories.
pub struct Integrator {
    sampler: RateSampler,
}

impl Integrator {
    pub fn new(sampler: RateSampler) -> Self {
        Self { sampler }
    }

    pub fn deterministic() -> Self {
        Self::new(RateSampler::deterministic())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RateSampler::seeded(seed))
    }

    /// Run the time loop and return the filled trajectory.
    ///
    /// Per step: the feedback policy runs first (the only writer of `params`
    /// mid-run), then the transition model, then
    /// `row[n+1] = max(row[n] + increment, 0)` componentwise. The clamp is a
    /// safety net against stochastic overshoot, applied per component; under
    /// clamping the compartment total is not exactly conserved. The whole run
    /// aborts on the first error.
    pub fn integrate(
        &mut self,
        model: TransitionModel,
        policy: &mut dyn FeedbackPolicy,
        grid: TimeGrid,
        initial_state: &[f64],
        params: &mut ModelParameters,
    ) -> Result<Trajectory, SirdError> {
        if initial_state.len() != model.state_dim() {
            return Err(SirdError::DimensionMismatch {
                expected: model.state_dim(),
                actual: initial_state.len(),
            });
        }

        let rows = grid.num_points();
        let mut trajectory =
            Trajectory::zeros(rows, model.state_dim(), grid.t_start(), grid.dt());
        let mut state = DVector::from_row_slice(initial_state);
        trajectory.data.row_mut(0).tr_copy_from(&state);

        for step in 0..rows - 1 {
            policy.before_step(params, step, trajectory.data.rows(0, step + 1))?;
            let increment = model.increments(&state, params, grid.dt(), &mut self.sampler)?;
            state = (state + increment).map(|x| x.max(0.0));
            trajectory.data.row_mut(step + 1).tr_copy_from(&state);
        }
        Ok(trajectory)
    }
}
