//! Feature extraction for GST liability model inference.
//!
//! Turns submitted form fields into a [`FeatureMap`] and aligns it to the
//! column order the model was fitted with.

use crate::error::{AppError, Result};
use crate::types::forecast::{ColumnSchema, FeatureMap, FeatureValue, Industry};
use std::collections::HashMap;

/// Numeric fields of the /predict form, in submission order
pub const PREDICT_NUMERIC_FIELDS: [&str; 9] = [
    "sales_amount",
    "purchase_amount",
    "tax_slab",
    "inflation_rate",
    "profit_margin",
    "capital_expenditure",
    "revenue_growth",
    "interest_rate",
    "gdp_growth_rate",
];

/// Categorical field of the /predict form
pub const PREDICT_INDUSTRY_FIELD: &str = "industry_type";

/// Numeric fields of the /forecasting form, in submission order
pub const FORECASTING_NUMERIC_FIELDS: [&str; 9] = [
    "SalesAmount",
    "PurchaseAmount",
    "TaxSlab",
    "InflationRate",
    "ProfitMargin",
    "CapitalExpenditure",
    "RevenueGrowth",
    "InterestRate",
    "GDPGrowthRate",
];

/// Categorical field of the /forecasting form, passed through as raw text
pub const FORECASTING_INDUSTRY_FIELD: &str = "IndustryType";

/// Builds feature maps from submitted form fields.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// One indicator per known industry, in [`Industry::ALL`] order.
    ///
    /// An unrecognized label yields all zeros.
    pub fn one_hot_industry(&self, label: &str) -> Vec<(String, f64)> {
        let selected = Industry::from_label(label);
        Industry::ALL
            .iter()
            .map(|industry| {
                let hot = if Some(*industry) == selected { 1.0 } else { 0.0 };
                (industry.column_name(), hot)
            })
            .collect()
    }

    /// Features for the /predict variant: nine scalars plus one-hot industry.
    pub fn predict_features(&self, form: &HashMap<String, String>) -> Result<FeatureMap> {
        let mut features = FeatureMap::new();

        for field in PREDICT_NUMERIC_FIELDS {
            features.insert_numeric(field, parse_number(form, field)?);
        }

        let industry = required(form, PREDICT_INDUSTRY_FIELD)?;
        for (column, value) in self.one_hot_industry(industry) {
            features.insert_numeric(column, value);
        }

        Ok(features)
    }

    /// Features for the /forecasting variant.
    ///
    /// Uses CamelCase names and keeps the industry as a raw category rather
    /// than one-hot encoding it. Against a one-hot schema every name here is
    /// dropped during alignment.
    pub fn forecasting_features(&self, form: &HashMap<String, String>) -> Result<FeatureMap> {
        let mut features = FeatureMap::new();

        for field in FORECASTING_NUMERIC_FIELDS {
            features.insert_numeric(field, parse_number(form, field)?);
        }

        let industry = required(form, FORECASTING_INDUSTRY_FIELD)?;
        features.insert_categorical(FORECASTING_INDUSTRY_FIELD, industry);

        Ok(features)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Reindex `features` against `schema`.
///
/// Each schema column takes the matching feature value, or 0 when absent.
/// Features the schema does not name are dropped. A categorical value in a
/// schema column is rejected.
pub fn align(features: &FeatureMap, schema: &ColumnSchema) -> Result<Vec<f32>> {
    schema
        .columns()
        .iter()
        .map(|column| match features.get(column) {
            Some(FeatureValue::Numeric(v)) => Ok(*v as f32),
            Some(FeatureValue::Categorical(_)) => Err(AppError::CategoricalColumn(column.clone())),
            None => Ok(0.0),
        })
        .collect()
}

/// How many /forecasting numeric fields have a column in `schema`.
///
/// Zero means every forecasting request aligns to an all-zero vector.
pub fn forecasting_coverage(schema: &ColumnSchema) -> usize {
    FORECASTING_NUMERIC_FIELDS
        .iter()
        .filter(|field| schema.contains(field))
        .count()
}

fn required<'a>(form: &'a HashMap<String, String>, field: &str) -> Result<&'a str> {
    form.get(field)
        .map(String::as_str)
        .ok_or_else(|| AppError::MissingField(field.to_string()))
}

fn parse_number(form: &HashMap<String, String>, field: &str) -> Result<f64> {
    let raw = required(form, field)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AppError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retail_form() -> HashMap<String, String> {
        [
            ("sales_amount", "1000"),
            ("purchase_amount", "500"),
            ("tax_slab", "18"),
            ("inflation_rate", "5"),
            ("profit_margin", "10"),
            ("capital_expenditure", "200"),
            ("revenue_growth", "7"),
            ("interest_rate", "6"),
            ("gdp_growth_rate", "4"),
            ("industry_type", "Retail"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn one_hot_schema() -> ColumnSchema {
        let mut columns: Vec<String> =
            PREDICT_NUMERIC_FIELDS.iter().map(|s| s.to_string()).collect();
        columns.extend(Industry::ALL.iter().map(|i| i.column_name()));
        ColumnSchema::new(columns).unwrap()
    }

    #[test]
    fn test_one_hot_single_active() {
        let extractor = FeatureExtractor::new();
        for industry in Industry::ALL {
            let encoded = extractor.one_hot_industry(industry.label());
            assert_eq!(encoded.len(), 5);
            assert_eq!(encoded.iter().filter(|(_, v)| *v == 1.0).count(), 1);
            let hot = encoded.iter().find(|(_, v)| *v == 1.0).unwrap();
            assert_eq!(hot.0, industry.column_name());
        }
    }

    #[test]
    fn test_one_hot_unknown_is_all_zero() {
        let extractor = FeatureExtractor::new();
        let encoded = extractor.one_hot_industry("Agriculture");
        assert_eq!(encoded.len(), 5);
        assert!(encoded.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_retail_scenario_alignment() {
        let extractor = FeatureExtractor::new();
        let features = extractor.predict_features(&retail_form()).unwrap();
        let vector = align(&features, &one_hot_schema()).unwrap();

        assert_eq!(
            vector,
            vec![1000.0, 500.0, 18.0, 5.0, 10.0, 200.0, 7.0, 6.0, 4.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_align_follows_schema_order_and_drops_extras() {
        let mut features = FeatureMap::new();
        features.insert_numeric("b", 2.0);
        features.insert_numeric("a", 1.0);
        features.insert_numeric("unused", 9.0);

        let schema = ColumnSchema::new(vec!["a".into(), "missing".into(), "b".into()]).unwrap();
        let vector = align(&features, &schema).unwrap();
        assert_eq!(vector, vec![1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_align_is_idempotent() {
        let extractor = FeatureExtractor::new();
        let schema = one_hot_schema();
        let features = extractor.predict_features(&retail_form()).unwrap();

        let first = align(&features, &schema).unwrap();
        let second = align(&FeatureMap::from_aligned(&schema, &first), &schema).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let extractor = FeatureExtractor::new();

        let mut form = retail_form();
        form.remove("tax_slab");
        let err = extractor.predict_features(&form).unwrap_err();
        assert_eq!(err.code(), "missing_field");

        let mut form = retail_form();
        form.insert("sales_amount".to_string(), "lots".to_string());
        let err = extractor.predict_features(&form).unwrap_err();
        assert_eq!(err.code(), "invalid_number");
        assert!(err.to_string().contains("sales_amount"));

        let mut form = retail_form();
        form.remove("industry_type");
        assert_eq!(extractor.predict_features(&form).unwrap_err().code(), "missing_field");
    }

    #[test]
    fn test_forecasting_variant_against_one_hot_schema_is_all_zero() {
        // The CamelCase names share nothing with the one-hot schema, so
        // every feature is dropped. Kept explicit rather than unified.
        let extractor = FeatureExtractor::new();
        let form: HashMap<String, String> = FORECASTING_NUMERIC_FIELDS
            .iter()
            .map(|f| (f.to_string(), "10".to_string()))
            .chain(std::iter::once((FORECASTING_INDUSTRY_FIELD.to_string(), "Retail".to_string())))
            .collect();

        let features = extractor.forecasting_features(&form).unwrap();
        assert_eq!(
            features.get(FORECASTING_INDUSTRY_FIELD),
            Some(&FeatureValue::Categorical("Retail".to_string()))
        );

        let vector = align(&features, &one_hot_schema()).unwrap();
        assert_eq!(vector.len(), 14);
        assert!(vector.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_forecasting_variant_categorical_column_rejected() {
        let extractor = FeatureExtractor::new();
        let form: HashMap<String, String> = FORECASTING_NUMERIC_FIELDS
            .iter()
            .map(|f| (f.to_string(), "1".to_string()))
            .chain(std::iter::once((FORECASTING_INDUSTRY_FIELD.to_string(), "Retail".to_string())))
            .collect();

        let mut columns: Vec<String> =
            FORECASTING_NUMERIC_FIELDS.iter().map(|s| s.to_string()).collect();
        columns.push(FORECASTING_INDUSTRY_FIELD.to_string());
        let schema = ColumnSchema::new(columns).unwrap();

        let features = extractor.forecasting_features(&form).unwrap();
        let err = align(&features, &schema).unwrap_err();
        assert_eq!(err.code(), "categorical_column");
    }

    #[test]
    fn test_forecasting_coverage() {
        assert_eq!(forecasting_coverage(&one_hot_schema()), 0);

        let mut columns: Vec<String> =
            FORECASTING_NUMERIC_FIELDS.iter().map(|s| s.to_string()).collect();
        columns.push("industry_type_Retail".to_string());
        let schema = ColumnSchema::new(columns).unwrap();
        assert_eq!(forecasting_coverage(&schema), 9);
    }
}
