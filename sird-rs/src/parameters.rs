use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SirdError;

/// Map keys accepted by [`ParameterSet::from_map`].
pub const KEY_INFECTION_RATE: &str = "rate of infection";
pub const KEY_RECOVERY_RATE: &str = "rate of recovery";
pub const KEY_IMMUNITY_LOSS_RATE: &str = "rate of immunity loss";
pub const KEY_DEATH_RATE: &str = "rate of death of infected";
pub const KEY_POPULATION: &str = "total population";
pub const KEY_INITIAL_INFECTED: &str = "initial number of infected";

/// Map keys accepted by [`MixingParameters::from_map`].
pub const KEY_MIXING_1_TO_2: &str = "rate of infection 1 -> 2";
pub const KEY_MIXING_2_TO_1: &str = "rate of infection 2 -> 1";

/// Rates and sizes for one population.
///
/// Validated once at construction; the per-step hot loop reads plain numeric
/// fields instead of looking up string keys. The feedback policy is the only
/// writer of these fields during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Transmission rate β.
    pub infection_rate: f64,
    /// Recovery rate γ.
    pub recovery_rate: f64,
    /// Immunity loss rate δ (R -> S).
    pub immunity_loss_rate: f64,
    /// Fraction ρ of those leaving I who die instead of recovering.
    pub death_fraction: f64,
    /// Total population N.
    pub population: f64,
    /// Initial number of infected individuals I₀.
    pub initial_infected: f64,
}

impl ParameterSet {
    /// Build from a string-keyed map, the exchange format used by parameter
    /// loaders. Fails with [`SirdError::MissingParameter`] on the first
    /// absent key.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, SirdError> {
        Ok(Self {
            infection_rate: require(map, KEY_INFECTION_RATE)?,
            recovery_rate: require(map, KEY_RECOVERY_RATE)?,
            immunity_loss_rate: require(map, KEY_IMMUNITY_LOSS_RATE)?,
            death_fraction: require(map, KEY_DEATH_RATE)?,
            population: require(map, KEY_POPULATION)?,
            initial_infected: require(map, KEY_INITIAL_INFECTED)?,
        })
    }

    /// Default initial state [S, I, R, D] = [N - I₀, I₀, 0, 0].
    pub fn initial_state(&self) -> Vec<f64> {
        vec![
            self.population - self.initial_infected,
            self.initial_infected,
            0.0,
            0.0,
        ]
    }
}

/// Cross-infection rates linking two populations.
///
/// Convention: `rate_a_to_b` is indexed by infectors first, infectees second.
/// New infections appearing in population b's block are driven by
/// `rate_a_to_b * S_b * I_a / (N₁ + N₂)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixingParameters {
    /// β₁→₂: pop-1 infected infecting pop-2 susceptibles.
    pub rate_1_to_2: f64,
    /// β₂→₁: pop-2 infected infecting pop-1 susceptibles.
    pub rate_2_to_1: f64,
}

impl MixingParameters {
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, SirdError> {
        Ok(Self {
            rate_1_to_2: require(map, KEY_MIXING_1_TO_2)?,
            rate_2_to_1: require(map, KEY_MIXING_2_TO_1)?,
        })
    }

    /// No cross-infection in either direction.
    pub fn none() -> Self {
        Self {
            rate_1_to_2: 0.0,
            rate_2_to_1: 0.0,
        }
    }
}

/// Parameters for two coupled populations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupledParameters {
    pub first: ParameterSet,
    pub second: ParameterSet,
    pub mixing: MixingParameters,
}

impl CoupledParameters {
    /// Default initial state: both populations' blocks concatenated.
    pub fn initial_state(&self) -> Vec<f64> {
        let mut state = self.first.initial_state();
        state.extend(self.second.initial_state());
        state
    }
}

/// Parameters matching one of the two transition-model variants. The caller
/// selects the variant explicitly by constructing the matching side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelParameters {
    Single(ParameterSet),
    Coupled(CoupledParameters),
}

fn require(map: &HashMap<String, f64>, key: &str) -> Result<f64, SirdError> {
    map.get(key)
        .copied()
        .ok_or_else(|| SirdError::MissingParameter(key.to_string()))
}
