//! GST Forecast Service - Main Entry Point
//!
//! Loads the regression model and column schema, then serves the
//! prediction, forecasting and fraud filter pages over HTTP.

use anyhow::{Context, Result};
use gst_forecast_service::{
    config::{AppConfig, LoggingConfig},
    feature_extractor::{forecasting_coverage, FORECASTING_NUMERIC_FIELDS},
    metrics::{MetricsReporter, ServiceMetrics},
    models::loader::ModelLoader,
    server::{run_server, AppState},
    uploads::UploadStore,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;

    info!("Starting GST Forecast Service");
    info!(
        bind_addr = %config.server.bind_addr,
        uploads_dir = %config.uploads.dir,
        "Configuration loaded successfully"
    );

    // Both artifacts must load before any traffic is served
    let loader = ModelLoader::with_threads(config.models.onnx_threads)?;
    let predict = loader
        .load_forecaster(
            &config.models.model_path,
            &config.models.columns_path,
            "gst_forecast",
        )
        .context("Failed to load the prediction model artifacts")?;
    info!(
        columns = predict.schema().len(),
        model = %predict.model_name(),
        "Prediction model ready"
    );

    let forecasting = match config.models.forecasting_artifacts() {
        Some((model_path, columns_path)) => loader
            .load_forecaster(&model_path, &columns_path, "gst_forecasting")
            .context("Failed to load the forecasting model artifacts")?,
        None => predict.clone(),
    };
    info!(
        columns = forecasting.schema().len(),
        model = %forecasting.model_name(),
        "Forecasting model ready"
    );
    if forecasting_coverage(forecasting.schema()) == 0 {
        warn!(
            fields = ?FORECASTING_NUMERIC_FIELDS,
            "Forecasting schema has none of the /forecasting form fields; every forecast will run on an all-zero vector"
        );
    }

    // Start metrics reporter
    let metrics = Arc::new(ServiceMetrics::new());
    let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
    tokio::spawn(reporter.start());

    let state = Arc::new(AppState::new(
        predict,
        forecasting,
        UploadStore::new(&config.uploads.dir),
        metrics.clone(),
    ));

    run_server(&config.server, state).await?;

    // Print final summary
    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }

    Ok(())
}
