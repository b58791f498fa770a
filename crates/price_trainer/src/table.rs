//! String-typed CSV tables
//!
//! The clean stage must write back every input column untouched, so rows
//! are kept as raw strings and only the columns a stage works on are parsed.

use std::path::Path;

use crate::errors::TrainerError;

/// Tokens treated as a missing value when reading raw listings
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A", "n/a", "-NaN", "-nan", "<NA>", "None",
];

/// Whether a raw cell counts as missing
pub fn is_na(value: &str) -> bool {
    NA_TOKENS.contains(&value.trim())
}

/// Parse a cell as a finite number; `None` when missing or invalid
pub fn parse_number(value: &str) -> Option<f64> {
    if is_na(value) {
        return None;
    }
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read a CSV file with a header row
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, TrainerError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| TrainerError::csv(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| TrainerError::csv(path, e))?
            .iter()
            .map(String::from)
            .collect();

        let mut table = Table::new(headers);
        for record in reader.records() {
            let record = record.map_err(|e| TrainerError::csv(path, e))?;
            table.rows.push(record.iter().map(String::from).collect());
        }
        Ok(table)
    }

    /// Write the table as CSV, creating parent directories
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TrainerError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TrainerError::io(parent, e))?;
        }

        let mut writer = csv::Writer::from_path(path).map_err(|e| TrainerError::csv(path, e))?;
        writer
            .write_record(&self.headers)
            .map_err(|e| TrainerError::csv(path, e))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| TrainerError::csv(path, e))?;
        }
        writer.flush().map_err(|e| TrainerError::io(path, e))
    }

    /// Index of a named column
    pub fn column(&self, name: &str) -> Result<usize, TrainerError> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| TrainerError::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the rows for which `keep` returns true
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Vec<String>) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(keep);
        before - self.rows.len()
    }

    /// Cell value; rows shorter than the header read as empty
    pub fn cell(row: &[String], col: usize) -> &str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}
