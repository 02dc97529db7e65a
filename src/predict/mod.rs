//! Prediction and inference
//!
//! Map a patient record to a displayable recurrence outcome.

pub mod inference;

pub use inference::{format_prediction, PredictionOutcome, Predictor};
