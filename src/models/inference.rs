//! Regression inference for GST liability forecasting

use crate::error::AppError;
use crate::feature_extractor::align;
use crate::models::loader::LoadedModel;
use crate::types::forecast::{ColumnSchema, FeatureMap};
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A fitted regression model: one aligned feature row in, one value out.
pub trait Regressor: Send + Sync {
    /// Predict a single value for a feature vector aligned to the model's schema
    fn predict(&self, features: &[f32]) -> Result<f64>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Regressor backed by an ONNX Runtime session
pub struct OnnxRegressor {
    name: String,
    /// Session runs need exclusive access
    model: Mutex<LoadedModel>,
}

impl OnnxRegressor {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
        }
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &[f32]) -> Result<f64> {
        use ort::value::Tensor;

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let input_name = model.input_name.clone();
        let output_name = model.output_name.clone();

        let outputs = model
            .session
            .run(ort::inputs![input_name.as_str() => input_tensor])?;

        let output = outputs
            .get(output_name.as_str())
            .with_context(|| format!("Model produced no output named '{}'", output_name))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .context("Model output is not a float tensor")?;

        let value = data
            .first()
            .copied()
            .context("Model returned an empty prediction")?;

        debug!(model = %self.name, value = value, "Regression inference complete");
        Ok(value as f64)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Result of one liability prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    /// Predicted liability, rounded to 2 decimal places (ties to even)
    pub liability: f64,
}

impl PredictionResult {
    pub fn new(raw: f64) -> Self {
        Self {
            liability: (raw * 100.0).round_ties_even() / 100.0,
        }
    }

    /// Rupee amount with thousands separators, e.g. `₹1,234.50`
    pub fn formatted(&self) -> String {
        format_rupees(self.liability)
    }
}

/// Format an amount as `₹` plus thousands-grouped digits and 2 decimals
pub fn format_rupees(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("₹{}{}.{}", sign, grouped, cents)
}

/// A model paired with the column schema it was fitted on.
///
/// Built once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct Forecaster {
    model: Arc<dyn Regressor>,
    schema: Arc<ColumnSchema>,
}

impl Forecaster {
    pub fn new(model: Arc<dyn Regressor>, schema: Arc<ColumnSchema>) -> Self {
        Self { model, schema }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Align `features` to the schema and run the model
    pub fn forecast(&self, features: &FeatureMap) -> Result<PredictionResult, AppError> {
        let vector = align(features, &self.schema)?;

        let raw = self
            .model
            .predict(&vector)
            .map_err(|e| AppError::Prediction(format!("{:#}", e)))?;

        if !raw.is_finite() {
            return Err(AppError::Prediction(format!(
                "model returned a non-finite value ({})",
                raw
            )));
        }

        Ok(PredictionResult::new(raw))
    }
}
