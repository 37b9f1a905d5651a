//! HTTP request handlers
//!
//! Every page handler answers 200. Failures are rendered inline as
//! `Error: ...` in place of the result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::FormRejection, Form, Multipart, State,
    },
    response::Html,
    Json,
};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::inference::PredictionResult;
use crate::types::transaction::FraudReport;

use super::state::AppState;
use super::views::{self, FraudView};

type FormFields = std::result::Result<Form<HashMap<String, String>>, FormRejection>;

// ============================================================================
// Prediction Handlers
// ============================================================================

pub async fn index() -> Html<String> {
    views::index_page(None)
}

/// One-hot variant: snake_case fields, industry expanded to indicators
pub async fn predict(State(state): State<Arc<AppState>>, form: FormFields) -> Html<String> {
    let started = Instant::now();
    let outcome = form_fields(form)
        .and_then(|fields| state.features.predict_features(&fields))
        .and_then(|features| state.predict.forecast(&features));

    let message = prediction_message(&state, "predict", started, outcome);
    views::index_page(Some(&message))
}

pub async fn forecasting_form() -> Html<String> {
    views::forecasting_page(None)
}

/// CamelCase variant: industry passed through as a raw category
pub async fn forecasting(State(state): State<Arc<AppState>>, form: FormFields) -> Html<String> {
    let started = Instant::now();
    let outcome = form_fields(form)
        .and_then(|fields| state.features.forecasting_features(&fields))
        .and_then(|features| state.forecasting.forecast(&features));

    let message = prediction_message(&state, "forecasting", started, outcome);
    views::forecasting_page(Some(&message))
}

fn form_fields(form: FormFields) -> Result<HashMap<String, String>> {
    form.map(|Form(fields)| fields)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn prediction_message(
    state: &AppState,
    endpoint: &str,
    started: Instant,
    outcome: Result<PredictionResult>,
) -> String {
    let elapsed = started.elapsed();
    state
        .metrics
        .record_prediction(endpoint, elapsed, outcome.is_ok());

    match outcome {
        Ok(prediction) => {
            info!(
                endpoint = %endpoint,
                liability = prediction.liability,
                latency_us = elapsed.as_micros(),
                "Prediction served"
            );
            prediction.formatted()
        }
        Err(e) => {
            warn!(endpoint = %endpoint, code = e.code(), error = %e, "Prediction request failed");
            e.display_message()
        }
    }
}

// ============================================================================
// Fraud Handlers
// ============================================================================

pub async fn fraudulent_form() -> Html<String> {
    views::fraudulent_page(None)
}

/// Filter an uploaded CSV/XLSX down to rows flagged fraudulent
pub async fn fraudulent(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Html<String> {
    let started = Instant::now();
    let outcome = match multipart {
        Ok(multipart) => detect_fraud(&state, multipart).await,
        Err(_) => Err(AppError::NoFileSelected),
    };

    let elapsed = started.elapsed();
    state
        .metrics
        .record_upload(elapsed, outcome.as_ref().ok().map(|report| report.count));

    match outcome {
        Ok(report) => {
            info!(
                flagged = report.count,
                latency_us = elapsed.as_micros(),
                "Fraud filter completed"
            );
            views::fraudulent_page(Some(FraudView::Report(&report)))
        }
        Err(e) => {
            warn!(code = e.code(), error = %e, "Fraud filter request failed");
            views::fraudulent_page(Some(FraudView::Error(e.display_message())))
        }
    }
}

async fn detect_fraud(state: &AppState, mut multipart: Multipart) -> Result<FraudReport> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) = upload
        .filter(|(name, _)| !name.is_empty())
        .ok_or(AppError::NoFileSelected)?;

    let stored = state.uploads.persist(&file_name, &data).await?;
    info!(
        file_name = %file_name,
        stored = %stored.display(),
        bytes = data.len(),
        "Received upload"
    );

    state.fraud_filter.process(&file_name, &data)
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "predict_model": state.predict.model_name(),
        "predict_columns": state.predict.schema().len(),
        "forecasting_model": state.forecasting.model_name(),
        "forecasting_columns": state.forecasting.schema().len(),
    }))
}
