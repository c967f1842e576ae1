//! Tabular export of loaded records to XLSX.
//!
//! Each record is serialized to JSON and flattened: nested objects become
//! dotted column names (`patient.name`), arrays are written as their JSON
//! text, nulls leave the cell empty. The header row is the union of keys in
//! first-seen order.

use rust_xlsxwriter::Workbook;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use emed_core::models::attendance::Attendance;

use crate::error::ExportError;
use crate::file::{ExportedFile, XLSX_CONTENT_TYPE};

pub const SHEET_NAME: &str = "data";

const MAX_COLUMNS: usize = 16_384;

/// `<entity>_export_<unix millis>.xlsx`
pub fn export_file_name(entity: &str, now: jiff::Timestamp) -> String {
    format!("{entity}_export_{}.xlsx", now.as_millisecond())
}

/// A flattened table: ordered column names and one value per column per row.
#[derive(Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

pub fn flatten_rows<T: Serialize>(records: &[T]) -> Result<Table, ExportError> {
    let mut flat_records = Vec::with_capacity(records.len());
    let mut columns: Vec<String> = Vec::new();

    for record in records {
        let mut flat = Vec::new();
        flatten_value(String::new(), serde_json::to_value(record)?, &mut flat);
        for (key, _) in &flat {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        flat_records.push(flat);
    }

    let rows = flat_records
        .into_iter()
        .map(|flat| {
            let mut map: Map<String, Value> = flat.into_iter().collect();
            columns
                .iter()
                .map(|c| map.remove(c).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(Table { columns, rows })
}

fn flatten_value(prefix: String, value: Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                let name = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_value(name, nested, out);
            }
        }
        Value::Array(_) => {
            let text = value.to_string();
            out.push((prefix, Value::String(text)));
        }
        other => out.push((prefix, other)),
    }
}

pub fn table_to_xlsx(table: &Table) -> Result<Vec<u8>, ExportError> {
    if table.columns.len() > MAX_COLUMNS {
        return Err(ExportError::TooManyColumns(table.columns.len()));
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, name) in table.columns.iter().enumerate() {
            sheet.write_string(0, col as u16, name.as_str())?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col, value) in row.iter().enumerate() {
                let col = col as u16;
                match value {
                    Value::Null => {}
                    Value::Bool(b) => {
                        sheet.write_boolean(row_num, col, *b)?;
                    }
                    Value::Number(n) => match n.as_f64() {
                        Some(f) => {
                            sheet.write_number(row_num, col, f)?;
                        }
                        None => {
                            sheet.write_string(row_num, col, n.to_string())?;
                        }
                    },
                    Value::String(s) => {
                        sheet.write_string(row_num, col, s.as_str())?;
                    }
                    other => {
                        sheet.write_string(row_num, col, other.to_string())?;
                    }
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Spreadsheet of the given attendances, exactly as loaded. No network.
pub fn attendances_to_xlsx(
    attendances: &[Attendance],
    now: jiff::Timestamp,
) -> Result<ExportedFile, ExportError> {
    let table = flatten_rows(attendances)?;
    let bytes = table_to_xlsx(&table)?;
    info!(
        rows = table.rows.len(),
        columns = table.columns.len(),
        "attendance spreadsheet generated"
    );

    Ok(ExportedFile {
        file_name: export_file_name("attendances", now),
        content_type: XLSX_CONTENT_TYPE,
        bytes,
    })
}
