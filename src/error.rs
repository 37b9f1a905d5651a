//! Request-level error types
//!
//! Every variant is a user-facing failure that the handlers render inline
//! instead of a result. Startup failures use `anyhow` instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing form field '{0}'")]
    MissingField(String),

    #[error("could not convert '{value}' in field '{field}' to a number")]
    InvalidNumber { field: String, value: String },

    #[error("column '{0}' expects a numeric value but received a category")]
    CategoricalColumn(String),

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("No file selected")]
    NoFileSelected,

    #[error("Unsupported file format '{0}'. Please upload a .csv or .xlsx file")]
    UnsupportedFormat(String),

    #[error("The uploaded file contains no rows")]
    EmptyUpload,

    #[error("Missing required column: '{0}'")]
    MissingColumn(String),

    #[error("Could not parse uploaded file: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Stable machine-readable code for logs and tests
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingField(_) => "missing_field",
            AppError::InvalidNumber { .. } => "invalid_number",
            AppError::CategoricalColumn(_) => "categorical_column",
            AppError::Prediction(_) => "prediction_failed",
            AppError::NoFileSelected => "no_file_selected",
            AppError::UnsupportedFormat(_) => "unsupported_format",
            AppError::EmptyUpload => "empty_upload",
            AppError::MissingColumn(_) => "missing_column",
            AppError::Parse(_) => "parse_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::Io(_) => "io_error",
        }
    }

    /// Message shown in place of a result
    pub fn display_message(&self) -> String {
        format!("Error: {}", self)
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Parse(e.to_string())
    }
}

impl From<calamine::XlsxError> for AppError {
    fn from(e: calamine::XlsxError) -> Self {
        AppError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
