//! Fraud filtering for uploaded invoice files.
//!
//! Parses a CSV or XLSX upload into a [`Table`], keeps the rows whose
//! `Fraudulent` cell equals 1 and projects them to the invoice columns.

use crate::error::{AppError, Result};
use crate::types::transaction::{CellValue, FlaggedInvoice, FraudReport, Table};
use crate::uploads::extension;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

/// Column holding the 0/1 fraud indicator
pub const FRAUD_COLUMN: &str = "Fraudulent";

/// Columns returned for each flagged row, in output order
pub const REPORT_COLUMNS: [&str; 3] = ["InvoiceID", "InvoiceAmount", "InvoiceText"];

/// Parser selected from the upload's file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Xlsx,
}

impl UploadFormat {
    pub fn from_filename(name: &str) -> Result<Self> {
        match extension(name).as_deref() {
            Some("csv") => Ok(UploadFormat::Csv),
            Some("xlsx") => Ok(UploadFormat::Xlsx),
            Some(other) => Err(AppError::UnsupportedFormat(format!(".{}", other))),
            None => Err(AppError::UnsupportedFormat(name.to_string())),
        }
    }
}

/// Filters uploaded transaction tables down to fraudulent invoices.
pub struct FraudFilter;

impl FraudFilter {
    pub fn new() -> Self {
        Self
    }

    /// Parse `bytes` according to `file_name` and filter the result
    pub fn process(&self, file_name: &str, bytes: &[u8]) -> Result<FraudReport> {
        let format = UploadFormat::from_filename(file_name)?;
        let table = self.parse(format, bytes)?;
        self.filter(&table)
    }

    /// Parse an upload into a table
    pub fn parse(&self, format: UploadFormat, bytes: &[u8]) -> Result<Table> {
        let table = match format {
            UploadFormat::Csv => parse_csv(bytes)?,
            UploadFormat::Xlsx => parse_xlsx(bytes)?,
        };

        debug!(
            format = ?format,
            rows = table.row_count(),
            columns = table.headers.len(),
            "Upload parsed"
        );
        Ok(table)
    }

    /// Keep the rows flagged fraudulent, projected to [`REPORT_COLUMNS`].
    ///
    /// An empty table is an error; a table with no flagged rows is not.
    pub fn filter(&self, table: &Table) -> Result<FraudReport> {
        if table.is_empty() {
            return Err(AppError::EmptyUpload);
        }

        let fraud_idx = require_column(table, FRAUD_COLUMN)?;
        let [id_idx, amount_idx, text_idx] = [
            require_column(table, REPORT_COLUMNS[0])?,
            require_column(table, REPORT_COLUMNS[1])?,
            require_column(table, REPORT_COLUMNS[2])?,
        ];

        let invoices: Vec<FlaggedInvoice> = table
            .rows
            .iter()
            .filter(|row| table.cell(row, fraud_idx).is_flagged())
            .map(|row| FlaggedInvoice {
                invoice_id: table.cell(row, id_idx).clone(),
                invoice_amount: table.cell(row, amount_idx).clone(),
                invoice_text: table.cell(row, text_idx).clone(),
            })
            .collect();

        Ok(FraudReport::new(invoices))
    }
}

impl Default for FraudFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn require_column(table: &Table, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| AppError::MissingColumn(name.to_string()))
}

fn parse_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(Table { headers, rows })
}

fn parse_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Table::default()),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => return Ok(Table::default()),
    };

    let rows = rows
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| row.iter().map(cell_from_xlsx).collect())
        .collect();

    Ok(Table { headers, rows })
}

fn cell_from_xlsx(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        // Spreadsheets store whole numbers as floats
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            CellValue::Int(*f as i64)
        }
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(csv: &str) -> Result<FraudReport> {
        FraudFilter::new().process("transactions.csv", csv.as_bytes())
    }

    #[test]
    fn test_flags_fraudulent_rows() {
        let report = run(
            "InvoiceID,Fraudulent,InvoiceAmount,InvoiceText\n\
             1,1,100,a\n\
             2,0,250,b\n",
        )
        .unwrap();

        assert_eq!(report.count, 1);
        assert_eq!(
            report.invoices,
            vec![FlaggedInvoice {
                invoice_id: CellValue::Int(1),
                invoice_amount: CellValue::Int(100),
                invoice_text: CellValue::Text("a".to_string()),
            }]
        );
    }

    #[test]
    fn test_preserves_row_order() {
        let report = run(
            "InvoiceID,InvoiceAmount,InvoiceText,Fraudulent\n\
             7,10.5,x,1\n\
             3,20,y,0\n\
             5,30,z,1.0\n",
        )
        .unwrap();

        let ids: Vec<_> = report.invoices.iter().map(|i| i.invoice_id.clone()).collect();
        assert_eq!(ids, vec![CellValue::Int(7), CellValue::Int(5)]);
        assert_eq!(report.invoices[0].invoice_amount, CellValue::Float(10.5));
    }

    #[test]
    fn test_no_flagged_rows_is_empty_report() {
        let report = run(
            "InvoiceID,Fraudulent,InvoiceAmount,InvoiceText\n\
             1,0,100,a\n\
             2,0,250,b\n",
        )
        .unwrap();

        assert_eq!(report.count, 0);
        assert!(report.invoices.is_empty());
    }

    #[test]
    fn test_missing_fraud_column() {
        let err = run("InvoiceID,InvoiceAmount,InvoiceText\n1,100,a\n").unwrap_err();
        assert_eq!(err.code(), "missing_column");
        assert!(err.to_string().contains(FRAUD_COLUMN));
    }

    #[test]
    fn test_missing_projection_column() {
        let err = run("InvoiceID,Fraudulent,InvoiceAmount\n1,1,100\n").unwrap_err();
        assert_eq!(err.code(), "missing_column");
        assert!(err.to_string().contains("InvoiceText"));
    }

    #[test]
    fn test_header_only_is_empty_upload() {
        let err = run("InvoiceID,Fraudulent,InvoiceAmount,InvoiceText\n").unwrap_err();
        assert_eq!(err.code(), "empty_upload");

        let err = run("").unwrap_err();
        assert_eq!(err.code(), "empty_upload");
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let report =
            run("\u{feff}Fraudulent,InvoiceID,InvoiceAmount,InvoiceText\n1,9,1,q\n").unwrap();
        assert_eq!(report.count, 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = FraudFilter::new()
            .process("notes.txt", b"Fraudulent\n1\n")
            .unwrap_err();
        assert_eq!(err.code(), "unsupported_format");
        assert!(err.to_string().contains(".txt"));

        let err = FraudFilter::new().process("noextension", b"").unwrap_err();
        assert_eq!(err.code(), "unsupported_format");
    }

    #[test]
    fn test_extension_dispatch_is_case_insensitive() {
        assert_eq!(UploadFormat::from_filename("A.CSV").unwrap(), UploadFormat::Csv);
        assert_eq!(UploadFormat::from_filename("b.Xlsx").unwrap(), UploadFormat::Xlsx);
    }

    fn invoice_workbook() -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["InvoiceID", "Fraudulent", "InvoiceAmount", "InvoiceText"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_number(1, 1, 1.0).unwrap();
        sheet.write_number(1, 2, 100.0).unwrap();
        sheet.write_string(1, 3, "a").unwrap();
        sheet.write_number(2, 0, 2.0).unwrap();
        sheet.write_number(2, 1, 0.0).unwrap();
        sheet.write_number(2, 2, 250.5).unwrap();
        sheet.write_string(2, 3, "b").unwrap();

        // Only the first worksheet is read
        let other = workbook.add_worksheet();
        other.write_string(0, 0, "Fraudulent").unwrap();
        other.write_number(1, 0, 1.0).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_xlsx_first_sheet_is_filtered() {
        let report = FraudFilter::new()
            .process("book.xlsx", &invoice_workbook())
            .unwrap();

        assert_eq!(report.count, 1);
        assert_eq!(
            report.invoices,
            vec![FlaggedInvoice {
                invoice_id: CellValue::Int(1),
                invoice_amount: CellValue::Int(100),
                invoice_text: CellValue::Text("a".to_string()),
            }]
        );
    }

    #[test]
    fn test_corrupt_xlsx_is_parse_error() {
        let err = FraudFilter::new()
            .process("book.xlsx", b"definitely not a zip archive")
            .unwrap_err();
        assert_eq!(err.code(), "parse_error");
    }

    #[test]
    fn test_xlsx_cell_conversion() {
        assert_eq!(cell_from_xlsx(&Data::Float(1.0)), CellValue::Int(1));
        assert_eq!(cell_from_xlsx(&Data::Float(99.5)), CellValue::Float(99.5));
        assert_eq!(cell_from_xlsx(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_from_xlsx(&Data::String("Laptop".to_string())),
            CellValue::Text("Laptop".to_string())
        );
    }
}
