//! Re-encodes a result payload as a downloadable JSON or spreadsheet file.

use std::collections::HashSet;

use common::search_const::EXPORT_SHEET_NAME;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::{Result, SearchError};

/// Longest string a spreadsheet cell accepts.
const MAX_CELL_CHARS: usize = 32_767;
const SCALAR_COLUMN: &str = "value";

pub enum ExportFormat {
    Json,
    Excel,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

/// The payload's `results` list, which must exist and be non-empty.
pub fn payload_results(payload: &serde_json::Value) -> Result<&Vec<serde_json::Value>> {
    match payload.get("results") {
        Some(serde_json::Value::Array(results)) if !results.is_empty() => Ok(results),
        _ => Err(SearchError::Validation("no results to convert".to_string())),
    }
}

pub fn export(payload: &serde_json::Value, format: &ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => export_json(payload),
        ExportFormat::Excel => export_excel(payload),
    }
}

/// The whole payload, pretty-printed.
pub fn export_json(payload: &serde_json::Value) -> Result<Vec<u8>> {
    payload_results(payload)?;
    serde_json::to_vec_pretty(payload).map_err(|e| SearchError::Export(e.to_string()))
}

/// Column headers: keys of every object row in first-seen order.
pub fn table_columns(results: &[serde_json::Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in results {
        match row {
            serde_json::Value::Object(obj) => {
                for key in obj.keys() {
                    if seen.insert(key.clone()) {
                        columns.push(key.clone());
                    }
                }
            }
            _ => {
                if seen.insert(SCALAR_COLUMN.to_string()) {
                    columns.push(SCALAR_COLUMN.to_string());
                }
            }
        }
    }
    columns
}

fn cell_value<'a>(row: &'a serde_json::Value, column: &str) -> Option<&'a serde_json::Value> {
    match row {
        serde_json::Value::Object(obj) => obj.get(column),
        scalar if column == SCALAR_COLUMN => Some(scalar),
        _ => None,
    }
}

fn truncate_cell(text: &str) -> String {
    text.chars().take(MAX_CELL_CHARS).collect()
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &serde_json::Value,
) -> std::result::Result<(), XlsxError> {
    match value {
        serde_json::Value::Null => {}
        serde_json::Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => {
                worksheet.write_number(row, col, f)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string())?;
            }
        },
        serde_json::Value::String(s) => {
            worksheet.write_string(row, col, truncate_cell(s))?;
        }
        nested => {
            worksheet.write_string(row, col, truncate_cell(&nested.to_string()))?;
        }
    }
    Ok(())
}

fn build_workbook(results: &[serde_json::Value]) -> std::result::Result<Vec<u8>, XlsxError> {
    let columns = table_columns(results);
    let header_format = Format::new().set_bold();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, column) in columns.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.write_string_with_format(0, col, column.as_str(), &header_format)?;
    }
    for (row_index, row) in results.iter().enumerate() {
        let row_number = u32::try_from(row_index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, column) in columns.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
            if let Some(value) = cell_value(row, column) {
                write_cell(worksheet, row_number, col, value)?;
            }
        }
    }
    workbook.save_to_buffer()
}

/// One sheet, a bold header row, one row per result.
pub fn export_excel(payload: &serde_json::Value) -> Result<Vec<u8>> {
    let results = payload_results(payload)?;
    build_workbook(results).map_err(|e| SearchError::Export(e.to_string()))
}
