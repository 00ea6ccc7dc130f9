//! Transaction file readers
//!
//! CSV files use the headers `date, amount, ref_no, category, is_essential`
//! (matched case-insensitively, `reference_text` and `is_mandatory` also
//! accepted). JSON files hold an array of transaction objects. Records come
//! back unvalidated so callers choose between fail-fast and per-item errors.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::TransactionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            _ => Err(Error::Validation(format!(
                "Unsupported input file {} (expected .csv or .json)",
                path.display()
            ))),
        }
    }
}

/// Read transaction records from a CSV or JSON file
pub fn read_records(path: &Path) -> Result<Vec<TransactionRecord>> {
    let format = InputFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    let records = match format {
        InputFormat::Csv => parse_csv(reader)?,
        InputFormat::Json => parse_json(reader)?,
    };
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a JSON array of transactions
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Column positions resolved from the header row
struct Columns {
    date: Option<usize>,
    amount: Option<usize>,
    reference: Option<usize>,
    category: Option<usize>,
    mandatory: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        Self {
            date: find(&["date"]),
            amount: find(&["amount"]),
            reference: find(&["ref_no", "reference_text", "refno"]),
            category: find(&["category"]),
            mandatory: find(&["is_essential", "is_mandatory"]),
        }
    }
}

/// Parse CSV with a header row
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?);
    if columns.date.is_none() || columns.amount.is_none() {
        return Err(Error::Validation(
            "CSV must have 'date' and 'amount' columns".into(),
        ));
    }

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let amount = field(columns.amount)
            .map(parse_amount)
            .transpose()
            .map_err(|e| Error::Validation(format!("row {}: {}", row + 1, e)))?;
        let is_mandatory = field(columns.mandatory)
            .map(parse_flag)
            .transpose()
            .map_err(|e| Error::Validation(format!("row {}: {}", row + 1, e)))?;

        records.push(TransactionRecord {
            date: field(columns.date).map(String::from),
            amount,
            reference_text: field(columns.reference).map(String::from),
            category: field(columns.category).map(String::from),
            is_mandatory,
        });
    }

    Ok(records)
}

fn parse_amount(s: &str) -> std::result::Result<f64, String> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .map_err(|_| format!("Unable to parse amount: {}", s))
}

fn parse_flag(s: &str) -> std::result::Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(format!("Unable to parse flag: {}", s)),
    }
}
