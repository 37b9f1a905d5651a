//! Type definitions for the GST forecast service

pub mod forecast;
pub mod transaction;

pub use forecast::{ColumnSchema, FeatureMap, FeatureValue, Industry};
pub use transaction::{CellValue, FlaggedInvoice, FraudReport, Table};
