//! Application state shared across handlers

use std::sync::Arc;

use crate::feature_extractor::FeatureExtractor;
use crate::fraud_filter::FraudFilter;
use crate::metrics::ServiceMetrics;
use crate::models::inference::Forecaster;
use crate::uploads::UploadStore;

/// Everything a request needs, built once at startup and never mutated.
///
/// Only the metrics counters change after construction.
pub struct AppState {
    /// Model and schema behind /predict
    pub predict: Forecaster,
    /// Model and schema behind /forecasting
    pub forecasting: Forecaster,
    pub features: FeatureExtractor,
    pub fraud_filter: FraudFilter,
    pub uploads: UploadStore,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(
        predict: Forecaster,
        forecasting: Forecaster,
        uploads: UploadStore,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            predict,
            forecasting,
            features: FeatureExtractor::new(),
            fraud_filter: FraudFilter::new(),
            uploads,
            metrics,
        }
    }
}
