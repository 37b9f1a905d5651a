//! Transaction table structures for uploaded invoice files

use serde::Serialize;
use std::fmt;

/// A single parsed cell from an uploaded CSV or spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Infer a typed value from raw CSV text
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }
        match trimmed {
            "True" | "TRUE" | "true" => CellValue::Bool(true),
            "False" | "FALSE" | "false" => CellValue::Bool(false),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Whether this cell marks a row as fraudulent (equals 1)
    pub fn is_flagged(&self) -> bool {
        match self {
            CellValue::Int(i) => *i == 1,
            CellValue::Float(f) => *f == 1.0,
            CellValue::Bool(b) => *b,
            CellValue::Empty | CellValue::Text(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Rows of an uploaded file, keyed by the header row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Position of a header, matched exactly
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `column` of `row`; short rows read as empty
    pub fn cell<'a>(&self, row: &'a [CellValue], column: usize) -> &'a CellValue {
        row.get(column).unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A table with no data rows (or no columns) counts as empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.headers.is_empty()
    }
}

/// Projection of a flagged row returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedInvoice {
    #[serde(rename = "InvoiceID")]
    pub invoice_id: CellValue,

    #[serde(rename = "InvoiceAmount")]
    pub invoice_amount: CellValue,

    #[serde(rename = "InvoiceText")]
    pub invoice_text: CellValue,
}

/// Result of filtering an upload for fraudulent rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FraudReport {
    pub invoices: Vec<FlaggedInvoice>,
    pub count: usize,
}

impl FraudReport {
    pub fn new(invoices: Vec<FlaggedInvoice>) -> Self {
        let count = invoices.len();
        Self { invoices, count }
    }
}
