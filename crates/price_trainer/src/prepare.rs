//! Clean stage
//!
//! Filters run in a fixed order: duplicate ids, missing required fields,
//! non-positive target, target outliers, count caps. Missing values in the
//! fill columns are then replaced with the sentinel label.

use std::collections::HashSet;
use tracing::info;

use crate::config::PrepareConfig;
use crate::errors::TrainerError;
use crate::table::{is_na, parse_number, Table};

/// Rows removed by each filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    pub input_rows: usize,
    pub duplicates: usize,
    pub missing_required: usize,
    pub invalid_target: usize,
    pub outliers: usize,
    pub over_caps: usize,
    pub filled: usize,
    pub output_rows: usize,
    /// Target cut-off; rows at or above it were dropped
    pub target_cap: Option<f64>,
}

/// Linear-interpolated quantile of `values` (sorted in place)
pub fn quantile(values: &mut [f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(values[lo] + (values[hi] - values[lo]) * frac)
}

/// Apply every cleaning rule to `table`
pub fn clean(mut table: Table, config: &PrepareConfig) -> Result<(Table, CleanReport), TrainerError> {
    let mut report = CleanReport {
        input_rows: table.len(),
        ..CleanReport::default()
    };

    let id_col = table.column(&config.id_column)?;
    let target_col = table.column(&config.target_column)?;
    let required: Vec<usize> = config
        .required_columns
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<_, _>>()?;
    let caps: Vec<(usize, f64)> = config
        .count_caps
        .iter()
        .map(|(name, &cap)| table.column(name).map(|col| (col, cap)))
        .collect::<Result<_, _>>()?;
    let fill: Vec<usize> = config
        .fill_columns
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<_, _>>()?;

    // Missing ids compare equal to each other
    let mut seen = HashSet::new();
    report.duplicates = table.retain(|row| {
        let id = Table::cell(row, id_col);
        let key = if is_na(id) { "" } else { id };
        seen.insert(key.to_string())
    });

    report.missing_required =
        table.retain(|row| required.iter().all(|&col| !is_na(Table::cell(row, col))));

    report.invalid_target = table.retain(|row| {
        parse_number(Table::cell(row, target_col)).is_some_and(|target| target > 0.0)
    });

    let mut targets: Vec<f64> = table
        .rows
        .iter()
        .filter_map(|row| parse_number(Table::cell(row, target_col)))
        .collect();
    report.target_cap = quantile(&mut targets, config.outlier_quantile);
    if let Some(cap) = report.target_cap {
        report.outliers = table.retain(|row| {
            parse_number(Table::cell(row, target_col)).is_some_and(|target| target < cap)
        });
    }

    // Missing or unparseable counts fail the comparison and are dropped
    report.over_caps = table.retain(|row| {
        caps.iter().all(|&(col, cap)| {
            parse_number(Table::cell(row, col)).is_some_and(|value| value <= cap)
        })
    });

    for row in &mut table.rows {
        for &col in &fill {
            if row.len() <= col {
                row.resize(col + 1, String::new());
            }
            if is_na(&row[col]) {
                row[col] = config.fill_value.clone();
                report.filled += 1;
            }
        }
    }

    report.output_rows = table.len();
    Ok((table, report))
}

/// Clean stage: read the raw CSV, clean it, write the cleaned CSV
pub fn run(config: &PrepareConfig) -> Result<CleanReport, TrainerError> {
    info!("Loading data from {}", config.input_file.display());
    let table = Table::read_csv(&config.input_file)?;
    info!(
        "Original dataset shape: ({}, {})",
        table.len(),
        table.headers.len()
    );

    let (cleaned, report) = clean(table, config)?;
    info!(
        duplicates = report.duplicates,
        missing_required = report.missing_required,
        invalid_target = report.invalid_target,
        outliers = report.outliers,
        over_caps = report.over_caps,
        filled = report.filled,
        "Rows removed by cleaning"
    );
    if let Some(cap) = report.target_cap {
        info!(
            "Target cap at quantile {}: {:.2}",
            config.outlier_quantile, cap
        );
    }
    info!(
        "Dataset shape after cleaning: ({}, {})",
        cleaned.len(),
        cleaned.headers.len()
    );

    cleaned.write_csv(&config.output_file)?;
    info!("Cleaned data saved to {}", config.output_file.display());
    Ok(report)
}
