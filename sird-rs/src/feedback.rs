use nalgebra::DMatrixView;

use crate::error::SirdError;
use crate::incidence::{IncidenceWindow, point_incidence};
use crate::parameters::ModelParameters;
use crate::transition::CUMULATIVE;

/// Per-step hook that may adjust parameters from the trajectory so far.
///
/// Invoked once per step, before the transition model, and is the only
/// writer of parameters during a run. `prefix` holds the filled rows
/// 0..=step of the trajectory.
pub trait FeedbackPolicy {
    fn before_step(
        &mut self,
        params: &mut ModelParameters,
        step: usize,
        prefix: DMatrixView<'_, f64>,
    ) -> Result<(), SirdError>;
}

/// Identity policy: parameters stay as constructed.
pub struct NoFeedback;

impl FeedbackPolicy for NoFeedback {
    fn before_step(
        &mut self,
        _params: &mut ModelParameters,
        _step: usize,
        _prefix: DMatrixView<'_, f64>,
    ) -> Result<(), SirdError> {
        Ok(())
    }
}

/// Switches the recovery rate when delayed rolling incidence crosses a
/// threshold.
///
/// After `delay_steps` have elapsed, the incidence of the cumulative column
/// is evaluated at step (current − delay). Above `high_threshold` the
/// recovery rate is set to baseline × `recovery_factor`; below
/// `low_threshold` it is reset to baseline; between the two nothing changes
/// (hysteresis dead band). The baseline is the recovery rate seen on the
/// first invocation.
///
/// Requires the tracked single-population layout (5 columns).
pub struct IncidenceThresholdPolicy {
    pub delay_steps: usize,
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub recovery_factor: f64,
    pub window: IncidenceWindow,
    baseline: Option<f64>,
}

impl IncidenceThresholdPolicy {
    pub fn new(
        delay_steps: usize,
        low_threshold: f64,
        high_threshold: f64,
        recovery_factor: f64,
        window: IncidenceWindow,
    ) -> Self {
        Self {
            delay_steps,
            low_threshold,
            high_threshold,
            recovery_factor,
            window,
            baseline: None,
        }
    }
}

impl FeedbackPolicy for IncidenceThresholdPolicy {
    fn before_step(
        &mut self,
        params: &mut ModelParameters,
        step: usize,
        prefix: DMatrixView<'_, f64>,
    ) -> Result<(), SirdError> {
        if prefix.ncols() != CUMULATIVE + 1 {
            return Err(SirdError::DimensionMismatch {
                expected: CUMULATIVE + 1,
                actual: prefix.ncols(),
            });
        }
        let ModelParameters::Single(par) = params else {
            return Err(SirdError::DimensionMismatch {
                expected: CUMULATIVE + 1,
                actual: 2 * crate::transition::BLOCK,
            });
        };

        let baseline = *self.baseline.get_or_insert(par.recovery_rate);
        if step <= self.delay_steps {
            return Ok(());
        }

        let lagged_step = step - self.delay_steps;
        let cumulative: Vec<f64> = prefix.column(CUMULATIVE).iter().copied().collect();
        let incidence = point_incidence(&cumulative, lagged_step, &self.window);

        if incidence > self.high_threshold {
            par.recovery_rate = baseline * self.recovery_factor;
        } else if incidence < self.low_threshold {
            par.recovery_rate = baseline;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use nalgebra::DMatrix;

    use super::*;
    use crate::parameters::ParameterSet;

    fn params() -> ModelParameters {
        ModelParameters::Single(ParameterSet {
            infection_rate: 0.14,
            recovery_rate: 0.07,
            immunity_loss_rate: 0.0,
            death_fraction: 0.0,
            population: 1000.0,
            initial_infected: 10.0,
        })
    }

    fn recovery_rate(params: &ModelParameters) -> f64 {
        match params {
            ModelParameters::Single(p) => p.recovery_rate,
            ModelParameters::Coupled(_) => unreachable!(),
        }
    }

    fn policy() -> IncidenceThresholdPolicy {
        // 1-step window on a population of 1000: incidence = ΔnI * 100
        IncidenceThresholdPolicy::new(
            1,
            100.0,
            500.0,
            2.0,
            IncidenceWindow {
                ndays: 1.0,
                dt: 1.0,
                population: 1000.0,
                scale: 100_000.0,
            },
        )
    }

    fn prefix_with_cumulative(values: &[f64]) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(values.len(), 5);
        for (i, &v) in values.iter().enumerate() {
            m[(i, CUMULATIVE)] = v;
        }
        m
    }

    #[test]
    fn test_no_feedback_is_identity() {
        let mut params = params();
        let before = params.clone();
        let prefix = DMatrix::zeros(1, 4);
        NoFeedback
            .before_step(&mut params, 0, prefix.rows(0, 1))
            .unwrap();
        assert_eq!(params, before);
    }

    #[test]
    fn test_quiet_before_delay() {
        let mut params = params();
        let mut policy = policy();
        let m = prefix_with_cumulative(&[0.0, 1000.0]);
        policy.before_step(&mut params, 1, m.rows(0, 2)).unwrap();
        assert_eq!(recovery_rate(&params), 0.07);
    }

    #[test]
    fn test_hysteresis() {
        let mut params = params();
        let mut policy = policy();

        // Lagged 1-step jump of 10 -> incidence 1000 > high threshold.
        let m = prefix_with_cumulative(&[0.0, 10.0, 12.0]);
        policy.before_step(&mut params, 2, m.rows(0, 3)).unwrap();
        assert_eq!(recovery_rate(&params), 0.14);

        // Jump of 3 -> incidence 300, inside the dead band: unchanged.
        let m = prefix_with_cumulative(&[0.0, 10.0, 13.0, 14.0]);
        policy.before_step(&mut params, 3, m.rows(0, 4)).unwrap();
        assert_eq!(recovery_rate(&params), 0.14);

        // Jump of 0.5 -> incidence 50 < low threshold: reset to baseline.
        let m = prefix_with_cumulative(&[0.0, 10.0, 13.0, 13.5, 13.6]);
        policy.before_step(&mut params, 4, m.rows(0, 5)).unwrap();
        assert_eq!(recovery_rate(&params), 0.07);
    }

    #[test]
    fn test_requires_tracked_layout() {
        let mut params = params();
        let mut policy = policy();
        let m = DMatrix::zeros(2, 4);
        assert_eq!(
            policy.before_step(&mut params, 1, m.rows(0, 2)).unwrap_err(),
            SirdError::DimensionMismatch {
                expected: 5,
                actual: 4
            }
        );
    }
}
