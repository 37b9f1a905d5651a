//! Feature map and column schema types for GST liability forecasting

use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};

/// Industries offered by the prediction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Industry {
    Manufacturing,
    ItServices,
    Pharmaceuticals,
    Education,
    Retail,
}

impl Industry {
    /// All industries, in the order their indicator columns are emitted
    pub const ALL: [Industry; 5] = [
        Industry::Manufacturing,
        Industry::ItServices,
        Industry::Pharmaceuticals,
        Industry::Education,
        Industry::Retail,
    ];

    /// Label as submitted by the form and used during model fitting
    pub fn label(&self) -> &'static str {
        match self {
            Industry::Manufacturing => "Manufacturing",
            Industry::ItServices => "IT Services",
            Industry::Pharmaceuticals => "Pharmaceuticals",
            Industry::Education => "Education",
            Industry::Retail => "Retail",
        }
    }

    /// Exact (case-sensitive) label lookup
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|industry| industry.label() == label)
    }

    /// Name of the one-hot indicator column, e.g. `industry_type_Retail`
    pub fn column_name(&self) -> String {
        format!("industry_type_{}", self.label())
    }
}

/// A single named feature value before alignment
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    /// Raw category text; a numeric model cannot consume it
    Categorical(String),
}

/// Named features assembled from one request.
///
/// Insertion order is irrelevant: the column schema decides the final order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMap {
    values: HashMap<String, FeatureValue>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a map from a vector already aligned to `schema`
    #[cfg(test)]
    pub fn from_aligned(schema: &ColumnSchema, vector: &[f32]) -> Self {
        let values = schema
            .columns()
            .iter()
            .zip(vector)
            .map(|(name, &v)| (name.clone(), FeatureValue::Numeric(v as f64)))
            .collect();
        Self { values }
    }

    pub fn insert_numeric(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), FeatureValue::Numeric(value));
    }

    pub fn insert_categorical(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(name.into(), FeatureValue::Categorical(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered column names captured when the model was fitted
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    /// Build a schema, rejecting empty lists and duplicate names
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            bail!("column schema is empty");
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                bail!("column schema lists '{}' more than once", column);
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}
