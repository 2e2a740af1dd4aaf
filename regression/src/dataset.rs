use std::{fs::File, io::Read, path::Path};

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::DataError;

/// Predictor columns, in the order the model stores its weights.
pub const FEATURE_COLUMNS: [&str; 3] = ["hp", "wt", "disp"];

/// Target column of the reference dataset.
pub const TARGET_COLUMN: &str = "mpg";

/// The three predictors of a single car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Features {
    pub hp: f64,
    pub wt: f64,
    pub disp: f64,
}

impl Features {
    pub fn new(hp: f64, wt: f64, disp: f64) -> Self {
        Self { hp, wt, disp }
    }

    /// Returns the features in [`FEATURE_COLUMNS`] order.
    pub fn to_array(self) -> [f64; 3] {
        [self.hp, self.wt, self.disp]
    }
}

/// A reference row: the predictors and the observed fuel economy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub features: Features,
    pub mpg: f64,
}

/// The fixed dataset the model is fitted on.
///
/// Rows keep file order. Columns other than `hp`, `wt`, `disp` and `mpg`
/// are read past and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDataset {
    samples: Vec<Sample>,
}

impl ReferenceDataset {
    /// Loads the dataset from a CSV file with a header row.
    ///
    /// # Errors
    /// Returns `DataError` if the file cannot be read, is not valid CSV, lacks
    /// one of the required columns or holds a non-numeric required cell.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        log::info!("loaded {} reference rows from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parses the dataset from any CSV source with a header row.
    ///
    /// # Errors
    /// See [`ReferenceDataset::load`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let headers = rdr.headers()?.clone();

        let find = |name: &'static str| {
            column_index(&headers, name)
                .map(|idx| (name, idx))
                .ok_or(DataError::MissingColumn(name))
        };
        let columns = [find("hp")?, find("wt")?, find("disp")?, find(TARGET_COLUMN)?];

        let mut samples = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let row = i + 1;

            let mut values = [0.0; 4];
            for (slot, (name, idx)) in values.iter_mut().zip(columns) {
                let cell = record.get(idx).unwrap_or_default();
                *slot = parse_number(cell).ok_or_else(|| DataError::InvalidValue {
                    row,
                    column: name,
                    value: cell.to_string(),
                })?;
            }

            let [hp, wt, disp, mpg] = values;
            samples.push(Sample {
                features: Features::new(hp, wt, disp),
                mpg,
            });
        }

        Ok(Self { samples })
    }

    /// Builds a dataset from rows already in memory.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns the predictors of every row, in file order.
    pub fn features(&self) -> Vec<Features> {
        self.samples.iter().map(|s| s.features).collect()
    }

    /// Returns the observed `mpg` of every row, in file order.
    pub fn targets(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.mpg).collect()
    }

    /// Returns the `n x 3` design matrix (no intercept column).
    pub fn design_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.samples.len(), FEATURE_COLUMNS.len()), |(i, j)| {
            self.samples[i].features.to_array()[j]
        })
    }

    /// Returns the target vector.
    pub fn target_vector(&self) -> Array1<f64> {
        self.samples.iter().map(|s| s.mpg).collect()
    }
}

/// Position of the first header equal to `name`.
pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Parses a numeric cell, ignoring surrounding whitespace.
pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
