//! Discrete-time SIRD compartmental epidemic simulation.
//!
//! The engine steps one population (or two populations coupled by
//! cross-infection) forward in time with either deterministic forward-Euler
//! increments or Poisson-noise stochastic increments, optionally adjusting
//! parameters mid-run through a feedback policy, and derives rolling-window
//! incidence from the finished trajectory. Parameter loading, plotting and
//! any interactive surface live outside this crate; they consume the
//! trajectory matrix the integrator returns.

pub mod error;
pub mod feedback;
pub mod incidence;
pub mod integrator;
pub mod parameters;
pub mod sampler;
pub mod trajectory;
pub mod transition;

pub use error::SirdError;
pub use feedback::{FeedbackPolicy, IncidenceThresholdPolicy, NoFeedback};
pub use incidence::{IncidenceWindow, point_incidence, series_incidence};
pub use integrator::{Integrator, TimeGrid};
pub use parameters::{CoupledParameters, MixingParameters, ModelParameters, ParameterSet};
pub use sampler::RateSampler;
pub use trajectory::Trajectory;
pub use transition::TransitionModel;
