//! Feature stage
//!
//! Turns the cleaned listings into numeric arrays: fits one label encoder
//! per categorical feature, parses the numeric ones, records the schema and
//! splits train/test deterministically.

use housepk_core::features::{
    EncoderRegistry, FeatureSchema, FeatureSpec, LabelEncoder, NumericRange,
};
use housepk_core::ArtifactPaths;
use tracing::{info, warn};

use crate::config::{FeaturesConfig, PipelineConfig};
use crate::dataset::{DataPaths, Dataset, Matrix};
use crate::errors::TrainerError;
use crate::table::{is_na, parse_number, Table};

/// Everything the feature stage produces
#[derive(Debug, Clone)]
pub struct EngineeredFeatures {
    pub schema: FeatureSchema,
    pub registry: EncoderRegistry,
    pub train: Dataset,
    pub test: Dataset,
    /// Rows skipped because a selected feature or the target was missing
    pub skipped_rows: usize,
}

/// Build encoders, schema and the train/test split from a cleaned table
pub fn engineer(table: &Table, config: &FeaturesConfig) -> Result<EngineeredFeatures, TrainerError> {
    let feature_cols: Vec<usize> = config
        .selected_features
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<_, _>>()?;
    let target_col = table.column(&config.target)?;
    let is_categorical: Vec<bool> = config
        .selected_features
        .iter()
        .map(|name| config.categorical_features.contains(name))
        .collect();

    let complete: Vec<(usize, &Vec<String>)> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            !is_na(Table::cell(row, target_col))
                && feature_cols
                    .iter()
                    .all(|&col| !is_na(Table::cell(row, col)))
        })
        .collect();
    let skipped_rows = table.len() - complete.len();
    if complete.is_empty() {
        return Err(TrainerError::Dataset(
            "no rows with every selected feature present".to_string(),
        ));
    }

    let mut registry = EncoderRegistry::new();
    for (i, name) in config.selected_features.iter().enumerate() {
        if !is_categorical[i] {
            continue;
        }
        let col = feature_cols[i];
        let encoder = LabelEncoder::fit(
            name.as_str(),
            complete.iter().map(|(_, row)| Table::cell(row, col)),
        );
        info!("Encoded {} with {} classes", name, encoder.len());
        registry.insert(encoder);
    }

    let mut features = Matrix::new(feature_cols.len());
    let mut targets = Vec::with_capacity(complete.len());
    let mut values = vec![0.0; feature_cols.len()];

    for &(row_idx, row) in &complete {
        // 1-based data row, header excluded
        let row_no = row_idx + 1;
        for (i, (name, &col)) in config.selected_features.iter().zip(&feature_cols).enumerate() {
            let raw = Table::cell(row, col);
            values[i] = if is_categorical[i] {
                f64::from(registry.encode(name, raw)?)
            } else {
                parse_number(raw).ok_or_else(|| TrainerError::InvalidValue {
                    row: row_no,
                    column: name.clone(),
                    value: raw.to_string(),
                })?
            };
        }
        features.push_row(&values)?;

        let raw_target = Table::cell(row, target_col);
        targets.push(
            parse_number(raw_target).ok_or_else(|| TrainerError::InvalidValue {
                row: row_no,
                column: config.target.clone(),
                value: raw_target.to_string(),
            })?,
        );
    }

    let specs = config
        .selected_features
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if is_categorical[i] {
                Ok(FeatureSpec::categorical(name.as_str()))
            } else {
                let range = NumericRange::observe(features.iter_rows().map(|row| row[i]))
                    .ok_or_else(|| TrainerError::Dataset(format!("no values for {name}")))?;
                Ok(FeatureSpec::numeric(name.as_str(), range))
            }
        })
        .collect::<Result<Vec<_>, TrainerError>>()?;
    let schema = FeatureSchema::new(specs)?;

    let dataset = Dataset::new(features, targets)?;
    let (train, test) = dataset.split(config.test_size, config.random_state)?;

    Ok(EngineeredFeatures {
        schema,
        registry,
        train,
        test,
        skipped_rows,
    })
}

/// Feature stage: read the cleaned CSV and persist arrays, encoders and schema
pub fn run(config: &PipelineConfig) -> Result<EngineeredFeatures, TrainerError> {
    info!(
        "Loading cleaned data from {}",
        config.prepare.output_file.display()
    );
    let table = Table::read_csv(&config.prepare.output_file)?;

    info!("Engineering features...");
    let engineered = engineer(&table, &config.features)?;
    if engineered.skipped_rows > 0 {
        warn!(
            "Skipped {} rows with a missing feature or target",
            engineered.skipped_rows
        );
    }

    info!(
        "Training set size: ({}, {})",
        engineered.train.len(),
        engineered.train.feature_count()
    );
    info!(
        "Test set size: ({}, {})",
        engineered.test.len(),
        engineered.test.feature_count()
    );

    let data = DataPaths::in_dir(&config.paths.data_dir);
    data.save_split(&engineered.train, &engineered.test)?;

    let artifacts = ArtifactPaths::in_dir(&config.paths.models_dir);
    engineered.registry.save(&artifacts.encoders)?;
    engineered.schema.save(&artifacts.schema)?;
    info!("Encoders saved to {}", artifacts.encoders.display());
    info!("Feature schema saved to {}", artifacts.schema.display());

    info!("Feature engineering complete!");
    Ok(engineered)
}
