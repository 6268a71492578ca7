//! Export helpers for converted records.
//!
//! These delegate to `csv`, `serde_json` and `rust_xlsxwriter`. Column order
//! is the union of record keys in first-seen order, which matches the field
//! order of the response because records preserve insertion order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

use crate::SascarResult;

/// Supported export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Comma separated values.
    Csv,
    /// Pretty-printed JSON.
    Json,
    /// Excel workbook.
    Xlsx,
}

impl Format {
    /// The file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Xlsx => "xlsx",
        }
    }
}

/// Writes records to `<stem>.<extension>` and returns the written path.
pub fn export(records: &[Value], stem: &str, format: Format) -> SascarResult<PathBuf> {
    let path = PathBuf::from(format!("{}.{}", stem, format.extension()));
    match format {
        Format::Csv => to_csv(records, &path)?,
        Format::Json => to_json(records, &path)?,
        Format::Xlsx => to_xlsx(records, &path)?,
    }
    Ok(path)
}

/// Writes records as a pretty-printed JSON array.
pub fn to_json(records: &[Value], path: impl AsRef<Path>) -> SascarResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Writes records as CSV with a header row.
pub fn to_csv(records: &[Value], path: impl AsRef<Path>) -> SascarResult<()> {
    let columns = columns(records);
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(&columns)?;
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(cell_text).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes records as a single-sheet Excel workbook.
pub fn to_xlsx(records: &[Value], path: impl AsRef<Path>) -> SascarResult<()> {
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), records)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

/// Writes multiple named record sets as one Excel workbook, one worksheet
/// per set.
pub fn to_xlsx_multi(sheets: &[(&str, &[Value])], path: impl AsRef<Path>) -> SascarResult<()> {
    let mut workbook = Workbook::new();
    for (name, records) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_sheet(worksheet, records)?;
    }
    workbook.save(path.as_ref())?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, records: &[Value]) -> SascarResult<()> {
    let columns = columns(records);

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name.as_str())?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, column) in columns.iter().enumerate() {
            match record.get(column) {
                Some(Value::Number(number)) => match exact_number(number) {
                    Some(float) => {
                        worksheet.write_number((row + 1) as u32, col as u16, float)?;
                    }
                    None => {
                        worksheet.write_string((row + 1) as u32, col as u16, number.to_string())?;
                    }
                },
                Some(value) if !value.is_null() => {
                    worksheet.write_string((row + 1) as u32, col as u16, cell_text(value))?;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// The double that represents the number exactly, if one exists.
///
/// Excel stores numbers as doubles, so integers past 2^53 (long packet and
/// ticket ids) would lose digits and are written as text instead.
fn exact_number(number: &serde_json::Number) -> Option<f64> {
    const EXCEL_EXACT_INTEGER: u64 = 1 << 53;

    if let Some(integer) = number.as_i64() {
        (integer.unsigned_abs() <= EXCEL_EXACT_INTEGER).then(|| integer as f64)
    } else if let Some(integer) = number.as_u64() {
        (integer <= EXCEL_EXACT_INTEGER).then(|| integer as f64)
    } else {
        number.as_f64()
    }
}

/// The union of record keys in first-seen order.
fn columns(records: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        // nested structures are kept as compact JSON
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{columns, exact_number, export, to_csv, to_json, to_xlsx_multi, Format};
    use serde_json::{json, Value};
    use std::path::PathBuf;

    fn records() -> Vec<Value> {
        vec![
            json!({"idVeiculo": 1, "placa": "ABC1D23", "velocidade": 82.5}),
            json!({"idVeiculo": 2, "placa": null, "motorista": {"nome": "Fulano"}}),
        ]
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sascar-rs-{}-{}", std::process::id(), name))
    }

    #[test]
    fn columns_are_the_union_in_first_seen_order() {
        assert_eq!(
            columns(&records()),
            vec!["idVeiculo", "placa", "velocidade", "motorista"]
        );
    }

    #[test]
    fn writes_csv_with_header() {
        let path = temp_path("export.csv");
        to_csv(&records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("idVeiculo,placa,velocidade,motorista"));
        assert_eq!(lines.next(), Some("1,ABC1D23,82.5,"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn writes_json_that_reads_back() {
        let path = temp_path("export.json");
        to_json(&records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1]["motorista"]["nome"], json!("Fulano"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn writes_multi_sheet_workbooks() {
        let path = temp_path("export.xlsx");
        let vehicles = records();
        let customers = vec![json!({"idCliente": 5001, "razaoSocial": "Transportes"})];
        to_xlsx_multi(
            &[("veiculos", vehicles.as_slice()), ("clientes", customers.as_slice())],
            &path,
        )
        .unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn wide_integers_are_not_rounded_to_doubles() {
        fn number(value: Value) -> serde_json::Number {
            match value {
                Value::Number(number) => number,
                other => panic!("expected a number, got {other:?}"),
            }
        }

        assert_eq!(exact_number(&number(json!(42))), Some(42.0));
        assert_eq!(exact_number(&number(json!(-23.5505))), Some(-23.5505));
        // 2^53 + 1 has no exact double
        assert_eq!(exact_number(&number(json!(9007199254740993i64))), None);
        assert_eq!(exact_number(&number(json!(-9007199254740993i64))), None);
        assert_eq!(exact_number(&number(json!(u64::MAX))), None);
    }

    #[test]
    fn export_appends_the_extension() {
        let stem = temp_path("export-stem");
        let path = export(&records(), stem.to_str().unwrap(), Format::Json).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
        assert!(path.exists());
        std::fs::remove_file(path).ok();
    }
}
