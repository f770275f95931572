//! Forecast engine.

mod additive;
pub mod stats;

pub use additive::{AdditiveModel, Prediction};
