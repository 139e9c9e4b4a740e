//! Rolling-window incidence derived from a cumulative-infection series.

use serde::{Deserialize, Serialize};

/// Window and normalization settings for incidence computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidenceWindow {
    /// Window length in days.
    pub ndays: f64,
    /// Timestep of the series the window is applied to.
    pub dt: f64,
    /// Population the incidence is normalized against.
    pub population: f64,
    /// Normalization scale; 100 000 gives the per-100k convention.
    pub scale: f64,
}

impl IncidenceWindow {
    /// Conventional 7-day incidence per 100 000.
    pub fn per_100k(population: f64, dt: f64) -> Self {
        Self {
            ndays: 7.0,
            dt,
            population,
            scale: 100_000.0,
        }
    }

    /// Window length in steps of the series.
    pub fn steps(&self) -> usize {
        (self.ndays / self.dt).round() as usize
    }
}

/// Incidence at one step of a cumulative-infection series.
///
/// The window start is clamped to the beginning of the series, so near t=0
/// the window shrinks instead of erroring.
pub fn point_incidence(cumulative: &[f64], step: usize, window: &IncidenceWindow) -> f64 {
    let start = step.saturating_sub(window.steps());
    (cumulative[step] - cumulative[start]) * window.scale / window.population
}

/// Incidence over a whole cumulative-infection series.
///
/// Quirk kept from the source model: the first `window.steps()` entries are
/// the raw cumulative counts, copied verbatim — neither differenced nor
/// scaled. Only entries from `window.steps()` onward are true windowed
/// incidence. [`point_incidence`] instead shrinks its window near the start,
/// so the two agree only from `window.steps()` onward.
pub fn series_incidence(cumulative: &[f64], window: &IncidenceWindow) -> Vec<f64> {
    let w = window.steps();
    cumulative
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if i < w {
                value
            } else {
                (value - cumulative[i - w]) * window.scale / window.population
            }
        })
        .collect()
}
