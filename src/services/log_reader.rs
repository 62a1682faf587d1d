//! Readers for the tabular files exchanged with the imaging and harvesting
//! instruments and with the compound library vendor.
//!
//! Instrument logs start with a preamble of `;`-prefixed metadata lines. The
//! column header either follows the preamble as a plain line or is the last
//! preamble line itself, written with a leading `;`. Every line after the
//! header is a data row.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashMap;

/// Format used by the imaging and harvesting logs
pub const LOG_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
/// Format operators type when recording when a batch was dispensed
pub const BATCH_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Debug, Clone)]
pub struct LogRow {
    /// Zero-based index of the data row, preamble excluded
    pub index: usize,
    values: HashMap<String, String>,
}

impl LogRow {
    /// Trimmed cell value; empty cells read as missing
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct LogTable {
    pub headers: Vec<String>,
    pub rows: Vec<LogRow>,
}

impl LogTable {
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        let missing: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|column| !self.headers.iter().any(|header| header == column))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("missing required columns: {}", missing.join(", ")))
        }
    }

    /// Distinct non-empty values of a column, in first-seen order
    pub fn distinct(&self, column: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for value in self.rows.iter().filter_map(|row| row.get(column)) {
            if !seen.iter().any(|existing| existing == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }
}

/// Number of leading `;` metadata lines
pub fn preamble_length(text: &str) -> usize {
    text.lines()
        .take_while(|line| line.trim_start().starts_with(';'))
        .count()
}

fn split_record(line: &str) -> Vec<String> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map(|record| record.iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Header line and the index of the first data line. A plain line after the
/// preamble is the header when it names every key column; otherwise the last
/// preamble line is, with its `;` stripped.
fn locate_header(lines: &[&str], skip: usize, key_columns: &[&str]) -> Result<(String, usize)> {
    if let Some(first) = lines.get(skip) {
        let cells = split_record(first);
        let names_keys = key_columns
            .iter()
            .all(|key| cells.iter().any(|cell| cell == key));
        if skip == 0 || names_keys {
            return Ok(((*first).to_string(), skip + 1));
        }
    }
    let last = skip
        .checked_sub(1)
        .and_then(|index| lines.get(index))
        .ok_or_else(|| anyhow!("log file is empty"))?;
    Ok((last.trim_start().trim_start_matches(';').to_string(), skip))
}

/// Parses an instrument log. `key_columns` are columns the caller expects in
/// the header; they decide between the two header placements.
pub fn read_prefixed_log(bytes: &[u8], key_columns: &[&str]) -> Result<LogTable> {
    let text = std::str::from_utf8(bytes).context("log file is not valid UTF-8")?;
    let text = text.trim_start_matches('\u{feff}');
    let lines: Vec<&str> = text.lines().collect();
    let skip = preamble_length(text);

    let (header, body_start) = locate_header(&lines, skip, key_columns)?;
    let normalized = std::iter::once(header.as_str())
        .chain(lines[body_start.min(lines.len())..].iter().copied())
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(normalized.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("could not read header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("row {index}: malformed record"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let values = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(LogRow { index, values });
    }

    Ok(LogTable { headers, rows })
}

pub fn parse_log_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), LOG_TIMESTAMP_FORMAT)
        .with_context(|| format!("'{value}' does not match DD/MM/YYYY HH:MM:SS"))
}

pub fn parse_batch_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), BATCH_TIMESTAMP_FORMAT)
        .with_context(|| format!("'{value}' does not match MM/DD/YYYY HH:MM:SS"))
}

/// One compound of a library plate file
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryRow {
    pub well: String,
    pub catalog_id: String,
    pub smiles: String,
}

pub fn read_library_csv(bytes: &[u8]) -> Result<Vec<LibraryRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    reader
        .deserialize()
        .enumerate()
        .map(|(index, row)| row.with_context(|| format!("row {index}: malformed library entry")))
        .collect()
}
