use std::collections::HashMap;

use serde::Deserialize;
use sird::{
    CoupledParameters, FeedbackPolicy, IncidenceThresholdPolicy, IncidenceWindow,
    MixingParameters, ModelParameters, NoFeedback, ParameterSet, SirdError, TimeGrid,
    TransitionModel,
};

/// One simulation run, as read from stdin JSON.
///
/// Parameter maps use the engine's string keys ("rate of infection",
/// "rate of recovery", ...); a `second_population` block switches to the
/// coupled two-population model.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Seed for stochastic mode; omit for a deterministic run.
    #[serde(default)]
    pub seed: Option<u64>,
    pub t_start: f64,
    pub t_end: f64,
    pub dt: f64,
    pub population: HashMap<String, f64>,
    #[serde(default)]
    pub second_population: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub mixing: Option<HashMap<String, f64>>,
    /// Append a cumulative-infection column (implied by `feedback`).
    #[serde(default)]
    pub track_cumulative: bool,
    #[serde(default)]
    pub feedback: Option<FeedbackConfig>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackConfig {
    pub delay_steps: usize,
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub recovery_factor: f64,
    #[serde(default = "default_ndays")]
    pub ndays: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_ndays() -> f64 {
    7.0
}

fn default_scale() -> f64 {
    100_000.0
}

impl Scenario {
    pub fn grid(&self) -> Result<TimeGrid, SirdError> {
        TimeGrid::new(self.t_start, self.t_end, self.dt)
    }

    /// Resolve the model variant, its parameters and the initial state.
    pub fn build(&self) -> Result<(TransitionModel, ModelParameters, Vec<f64>), SirdError> {
        let first = ParameterSet::from_map(&self.population)?;
        match &self.second_population {
            Some(second_map) => {
                let second = ParameterSet::from_map(second_map)?;
                let mixing = match &self.mixing {
                    Some(map) => MixingParameters::from_map(map)?,
                    None => MixingParameters::none(),
                };
                let params = CoupledParameters {
                    first,
                    second,
                    mixing,
                };
                let initial_state = params.initial_state();
                Ok((
                    TransitionModel::Coupled,
                    ModelParameters::Coupled(params),
                    initial_state,
                ))
            }
            None => {
                let track_cumulative = self.track_cumulative || self.feedback.is_some();
                let mut initial_state = first.initial_state();
                if track_cumulative {
                    initial_state.push(first.initial_infected);
                }
                Ok((
                    TransitionModel::Single { track_cumulative },
                    ModelParameters::Single(first),
                    initial_state,
                ))
            }
        }
    }

    pub fn policy(&self, population: f64) -> Box<dyn FeedbackPolicy> {
        match &self.feedback {
            Some(feedback) => Box::new(IncidenceThresholdPolicy::new(
                feedback.delay_steps,
                feedback.low_threshold,
                feedback.high_threshold,
                feedback.recovery_factor,
                IncidenceWindow {
                    ndays: feedback.ndays,
                    dt: self.dt,
                    population,
                    scale: feedback.scale,
                },
            )),
            None => Box::new(NoFeedback),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn population_block() -> serde_json::Value {
        json!({
            "rate of infection": 0.14,
            "rate of recovery": 0.07,
            "rate of immunity loss": 0.0,
            "rate of death of infected": 0.0,
            "total population": 1000.0,
            "initial number of infected": 10.0
        })
    }

    #[test]
    fn test_single_population_scenario() {
        let scenario: Scenario = serde_json::from_value(json!({
            "t_start": 0.0,
            "t_end": 5.0,
            "dt": 1.0,
            "population": population_block()
        }))
        .unwrap();
        assert_eq!(scenario.seed, None);
        assert_eq!(scenario.grid().unwrap().num_points(), 6);
        let (model, _params, initial_state) = scenario.build().unwrap();
        assert_eq!(
            model,
            TransitionModel::Single {
                track_cumulative: false
            }
        );
        assert_eq!(initial_state, vec![990.0, 10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_feedback_implies_tracking() {
        let scenario: Scenario = serde_json::from_value(json!({
            "seed": 42,
            "t_start": 0.0,
            "t_end": 5.0,
            "dt": 1.0,
            "population": population_block(),
            "feedback": {
                "delay_steps": 3,
                "low_threshold": 35.0,
                "high_threshold": 50.0,
                "recovery_factor": 1.5
            }
        }))
        .unwrap();
        let (model, _params, initial_state) = scenario.build().unwrap();
        assert_eq!(
            model,
            TransitionModel::Single {
                track_cumulative: true
            }
        );
        assert_eq!(initial_state, vec![990.0, 10.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_two_population_scenario() {
        let scenario: Scenario = serde_json::from_value(json!({
            "t_start": 0.0,
            "t_end": 5.0,
            "dt": 1.0,
            "population": population_block(),
            "second_population": population_block(),
            "mixing": {
                "rate of infection 1 -> 2": 0.02,
                "rate of infection 2 -> 1": 0.01
            }
        }))
        .unwrap();
        let (model, params, initial_state) = scenario.build().unwrap();
        assert_eq!(model, TransitionModel::Coupled);
        assert_eq!(initial_state.len(), 8);
        let ModelParameters::Coupled(coupled) = params else {
            panic!("expected coupled parameters");
        };
        assert_eq!(coupled.mixing.rate_1_to_2, 0.02);
        assert_eq!(coupled.mixing.rate_2_to_1, 0.01);
    }

    #[test]
    fn test_missing_parameter_key_surfaces() {
        let scenario: Scenario = serde_json::from_value(json!({
            "t_start": 0.0,
            "t_end": 5.0,
            "dt": 1.0,
            "population": { "rate of infection": 0.14 }
        }))
        .unwrap();
        assert!(matches!(
            scenario.build().unwrap_err(),
            SirdError::MissingParameter(_)
        ));
    }
}
