//! Model artifact loader

use crate::models::inference::{Forecaster, OnnxRegressor};
use crate::types::forecast::ColumnSchema;
use anyhow::{bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loaded ONNX model with metadata
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for the predicted value
    pub output_name: String,
}

/// Loader for the regression model and its column schema
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        // Initialize ONNX Runtime
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a single ONNX model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();
        check_artifact(path, "model")?;

        info!(
            model = %name,
            path = %path.display(),
            threads = self.onnx_threads,
            "Loading ONNX model"
        );

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            output_name,
        })
    }

    /// Load the ordered column list the model was fitted with.
    ///
    /// The artifact is a JSON array of strings.
    pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<ColumnSchema> {
        let path = path.as_ref();
        check_artifact(path, "column schema")?;

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read column schema {}", path.display()))?;
        let columns: Vec<String> = serde_json::from_slice(&bytes).with_context(|| {
            format!(
                "Column schema {} is corrupted; expected a JSON array of column names",
                path.display()
            )
        })?;

        let schema = ColumnSchema::new(columns)
            .with_context(|| format!("Invalid column schema {}", path.display()))?;

        info!(path = %path.display(), columns = schema.len(), "Column schema loaded");
        Ok(schema)
    }

    /// Load a model and its schema into a ready-to-serve handle.
    ///
    /// Both artifacts must load; a partially loaded pair is an error.
    pub fn load_forecaster<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        model_path: P,
        columns_path: Q,
        name: &str,
    ) -> Result<Forecaster> {
        let schema = Self::load_schema(columns_path)?;
        let model = self.load_model(model_path, name)?;

        Ok(Forecaster::new(
            Arc::new(OnnxRegressor::new(model)),
            Arc::new(schema),
        ))
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}

/// Fail with a descriptive error if an artifact is absent or empty
fn check_artifact(path: &Path, kind: &str) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("The {} file {} was not found", kind, path.display()))?;

    if !metadata.is_file() {
        bail!("The {} path {} is not a file", kind, path.display());
    }
    if metadata.len() == 0 {
        bail!(
            "The {} file {} is empty or corrupted. Please export the model again.",
            kind,
            path.display()
        );
    }

    Ok(())
}
