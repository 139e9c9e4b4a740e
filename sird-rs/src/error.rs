use thiserror::Error;

/// Precondition failures surfaced by the engine.
///
/// Every variant is detected before or at the start of a step; the integrator
/// aborts the whole run on the first one. Negative excursions produced by a
/// step itself are not errors — they are clamped to zero by the integrator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SirdError {
    /// A negative or non-finite expected transition count reached the sampler.
    #[error("invalid rate: expected transition count {0} must be finite and non-negative")]
    InvalidRate(f64),

    /// Non-positive timestep or an end time before the start time.
    #[error("invalid time range: t_start={t_start}, t_end={t_end}, dt={dt}")]
    InvalidTimeRange { t_start: f64, t_end: f64, dt: f64 },

    /// A required key was absent from a parameter map.
    #[error("missing parameter {0:?}")]
    MissingParameter(String),

    /// State vector length does not match the layout of the chosen model.
    #[error("dimension mismatch: expected {expected} state components, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
