//! Numeric training data and its on-disk form
//!
//! Feature rows are stored as a dense row-major [`Matrix`]; targets as a
//! plain `Vec<f64>`. Both are persisted with bincode between stages.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::deterministic::LcgRng;
use crate::errors::TrainerError;

pub const X_TRAIN_FILE: &str = "X_train.bin";
pub const X_TEST_FILE: &str = "X_test.bin";
pub const Y_TRAIN_FILE: &str = "y_train.bin";
pub const Y_TEST_FILE: &str = "y_test.bin";

/// Dense row-major matrix of feature values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn new(cols: usize) -> Self {
        Self {
            rows: 0,
            cols,
            data: Vec::new(),
        }
    }

    /// Build from equally sized rows
    pub fn from_rows(cols: usize, rows: &[Vec<f64>]) -> Result<Self, TrainerError> {
        let mut matrix = Self::new(cols);
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    pub fn push_row(&mut self, row: &[f64]) -> Result<(), TrainerError> {
        if row.len() != self.cols {
            return Err(TrainerError::Dataset(format!(
                "row {} has {} values, expected {}",
                self.rows,
                row.len(),
                self.cols
            )));
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, idx: usize) -> &[f64] {
        &self.data[idx * self.cols..(idx + 1) * self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols.max(1))
    }

    /// New matrix holding the given rows in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &idx in indices {
            data.extend_from_slice(self.row(idx));
        }
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Check the stored shape agrees with the data length
    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.rows * self.cols != self.data.len() {
            return Err(TrainerError::Dataset(format!(
                "matrix shape {}x{} does not match {} values",
                self.rows,
                self.cols,
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// Features and aligned targets
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub features: Matrix,
    pub targets: Vec<f64>,
}

impl Dataset {
    pub fn new(features: Matrix, targets: Vec<f64>) -> Result<Self, TrainerError> {
        if features.rows() != targets.len() {
            return Err(TrainerError::Dataset(format!(
                "{} feature rows but {} targets",
                features.rows(),
                targets.len()
            )));
        }
        Ok(Self { features, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.features.cols()
    }

    fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_rows(indices),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }

    /// Shuffle with `seed` and split off `ceil(test_size * n)` test rows.
    ///
    /// Returns `(train, test)`; both partitions are non-empty.
    pub fn split(&self, test_size: f64, seed: u64) -> Result<(Dataset, Dataset), TrainerError> {
        let n = self.len();
        let n_test = (test_size * n as f64).ceil() as usize;
        if n_test == 0 || n_test >= n {
            return Err(TrainerError::Dataset(format!(
                "test_size {test_size} leaves an empty partition for {n} rows"
            )));
        }

        let mut order: Vec<usize> = (0..n).collect();
        LcgRng::new(seed).shuffle(&mut order);

        let (test_idx, train_idx) = order.split_at(n_test);
        Ok((self.subset(train_idx), self.subset(test_idx)))
    }
}

/// Array files written by the feature stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub x_train: PathBuf,
    pub x_test: PathBuf,
    pub y_train: PathBuf,
    pub y_test: PathBuf,
}

impl DataPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            x_train: dir.join(X_TRAIN_FILE),
            x_test: dir.join(X_TEST_FILE),
            y_train: dir.join(Y_TRAIN_FILE),
            y_test: dir.join(Y_TEST_FILE),
        }
    }

    pub fn save_split(&self, train: &Dataset, test: &Dataset) -> Result<(), TrainerError> {
        save_bincode(&self.x_train, &train.features)?;
        save_bincode(&self.x_test, &test.features)?;
        save_bincode(&self.y_train, &train.targets)?;
        save_bincode(&self.y_test, &test.targets)?;
        Ok(())
    }

    pub fn load_train(&self) -> Result<Dataset, TrainerError> {
        load_dataset(&self.x_train, &self.y_train)
    }

    pub fn load_test(&self) -> Result<Dataset, TrainerError> {
        load_dataset(&self.x_test, &self.y_test)
    }
}

fn load_dataset(x: &Path, y: &Path) -> Result<Dataset, TrainerError> {
    let features: Matrix = load_bincode(x)?;
    features.validate()?;
    Dataset::new(features, load_bincode(y)?)
}

/// Write `value` with bincode, creating parent directories
pub fn save_bincode<T: Serialize>(path: &Path, value: &T) -> Result<(), TrainerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TrainerError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| TrainerError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, value).map_err(|e| TrainerError::bincode(path, e))?;
    writer.flush().map_err(|e| TrainerError::io(path, e))
}

pub fn load_bincode<T: DeserializeOwned>(path: &Path) -> Result<T, TrainerError> {
    let file = File::open(path).map_err(|e| TrainerError::io(path, e))?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|e| TrainerError::bincode(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_dataset(n: usize) -> Dataset {
        let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i * 2) as f64]).collect();
        let targets = (0..n).map(|i| i as f64 * 100.0).collect();
        Dataset::new(Matrix::from_rows(2, &rows).unwrap(), targets).unwrap()
    }

    #[test]
    fn test_matrix_rows() {
        let matrix = Matrix::from_rows(2, &[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.row(1), &[3.0, 4.0]);
        assert_eq!(matrix.get(0, 1), 2.0);
        assert_eq!(matrix.iter_rows().count(), 2);
        assert!(Matrix::new(2).push_row(&[1.0]).is_err());
    }

    #[test]
    fn test_split_sizes() {
        let dataset = create_dataset(10);
        let (train, test) = dataset.split(0.2, 42).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        // ceil(0.25 * 10) = 3
        let (train, test) = dataset.split(0.25, 42).unwrap();
        assert_eq!(train.len(), 7);
        assert_eq!(test.len(), 3);
    }

    #[test]
    fn test_split_keeps_rows_aligned() {
        let dataset = create_dataset(20);
        let (train, test) = dataset.split(0.3, 7).unwrap();

        for part in [&train, &test] {
            for (row, &target) in part.features.iter_rows().zip(&part.targets) {
                assert_eq!(row[0] * 100.0, target);
            }
        }

        let mut seen: Vec<f64> = train.targets.iter().chain(&test.targets).copied().collect();
        seen.sort_by(f64::total_cmp);
        assert_eq!(seen, dataset.targets);
    }

    #[test]
    fn test_split_determinism() {
        let dataset = create_dataset(50);
        let (a_train, a_test) = dataset.split(0.2, 42).unwrap();
        let (b_train, b_test) = dataset.split(0.2, 42).unwrap();
        assert_eq!(a_train, b_train);
        assert_eq!(a_test, b_test);

        let (c_train, _) = dataset.split(0.2, 43).unwrap();
        assert_ne!(a_train, c_train);
    }

    #[test]
    fn test_split_rejects_empty_partition() {
        assert!(create_dataset(1).split(0.2, 42).is_err());
        assert!(create_dataset(0).split(0.2, 42).is_err());
    }

    #[test]
    fn test_bincode_round_trip() {
        let dir = tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path().join("data"));
        let (train, test) = create_dataset(10).split(0.2, 42).unwrap();

        paths.save_split(&train, &test).unwrap();
        assert_eq!(paths.load_train().unwrap(), train);
        assert_eq!(paths.load_test().unwrap(), test);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_bincode_reports_failed_flush() {
        // Fits in the write buffer, so the error only surfaces on flush
        let err = save_bincode(Path::new("/dev/full"), &vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, TrainerError::Io { .. }), "{err:?}");
    }
}
