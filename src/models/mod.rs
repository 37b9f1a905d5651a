//! ML model loading and inference components

pub mod inference;
pub mod loader;

pub use inference::{Forecaster, OnnxRegressor, PredictionResult, Regressor};
pub use loader::ModelLoader;
