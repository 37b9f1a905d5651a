//! GST Forecast Service Library
//!
//! Serves a pre-trained GST liability regression model behind a small web
//! front end, and filters uploaded invoice files for fraudulent rows.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod fraud_filter;
pub mod metrics;
pub mod models;
pub mod server;
pub mod types;
pub mod uploads;

pub use config::AppConfig;
pub use error::AppError;
pub use feature_extractor::{align, FeatureExtractor};
pub use fraud_filter::FraudFilter;
pub use models::inference::{Forecaster, Regressor};
pub use server::{create_router, AppState};
pub use types::{forecast::ColumnSchema, transaction::FraudReport};
