use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use crate::{
    dataset::{column_index, parse_number},
    BatchError, Features, Predictor, FEATURE_COLUMNS, TARGET_COLUMN,
};

/// Name of the column appended by the batch flow.
pub const PREDICTED_COLUMN: &str = "Predicted MPG";

/// A validated upload: every row has numeric `hp`, `wt` and `disp`.
///
/// All cells are kept verbatim so that extra columns pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
    features: Vec<Features>,
    actual: Option<Vec<f64>>,
}

impl BatchTable {
    /// Reads and validates an uploaded CSV file.
    ///
    /// # Errors
    /// See [`BatchTable::from_reader`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        Self::from_reader(File::open(path)?)
    }

    /// Parses and validates an upload with a header row.
    ///
    /// # Errors
    /// Returns `BatchError::Csv` for malformed CSV (including ragged rows),
    /// `BatchError::MissingColumns` listing every absent required column,
    /// `BatchError::InvalidValue` for an empty or non-numeric required cell
    /// and `BatchError::Empty` when there are no data rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BatchError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let headers = rdr.headers()?.clone();

        let positions = FEATURE_COLUMNS.map(|name| column_index(&headers, name));
        let missing: Vec<&'static str> = FEATURE_COLUMNS
            .iter()
            .zip(positions)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| *name)
            .collect();
        let [Some(hp), Some(wt), Some(disp)] = positions else {
            return Err(BatchError::MissingColumns(missing));
        };
        let mpg = column_index(&headers, TARGET_COLUMN);

        let mut records = Vec::new();
        let mut features = Vec::new();
        let mut actual = mpg.map(|_| Vec::new());

        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let row = i + 1;

            let cell = |idx: usize, column: &'static str| {
                let raw = record.get(idx).unwrap_or_default();
                parse_number(raw).ok_or_else(|| BatchError::InvalidValue {
                    row,
                    column,
                    value: raw.to_string(),
                })
            };
            features.push(Features::new(cell(hp, "hp")?, cell(wt, "wt")?, cell(disp, "disp")?));

            // A single unusable `mpg` cell means there is nothing to compare against.
            if let Some(idx) = mpg {
                match record.get(idx).and_then(parse_number) {
                    Some(v) => {
                        if let Some(values) = actual.as_mut() {
                            values.push(v);
                        }
                    }
                    None if actual.is_some() => {
                        // The upload is then treated as having no `mpg` at all,
                        // so the plot title also drops "from uploaded data".
                        log::debug!("row {row}: mpg is not numeric, dropping actual values");
                        actual = None;
                    }
                    None => {}
                }
            }

            records.push(record.iter().map(str::to_string).collect());
        }

        if records.is_empty() {
            return Err(BatchError::Empty);
        }

        Ok(Self {
            headers: headers.iter().map(str::to_string).collect(),
            records,
            features,
            actual,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Predictor values of every row, in upload order.
    pub fn features(&self) -> &[Features] {
        &self.features
    }

    /// Observed `mpg` of every row, if the column exists and is fully numeric.
    pub fn actual(&self) -> Option<&[f64]> {
        self.actual.as_deref()
    }

    /// Runs `model` over every row and appends the predictions.
    ///
    /// An existing `Predicted MPG` column is overwritten in place.
    pub fn predict<P: Predictor>(self, model: &P) -> PredictedTable {
        let predictions = model.predict(&self.features);
        let Self {
            mut headers,
            mut records,
            actual,
            ..
        } = self;

        let existing = headers.iter().position(|h| h == PREDICTED_COLUMN);
        let column = existing.unwrap_or_else(|| {
            headers.push(PREDICTED_COLUMN.to_string());
            headers.len() - 1
        });

        for (record, prediction) in records.iter_mut().zip(&predictions) {
            let cell = prediction.to_string();
            match existing {
                Some(idx) => record[idx] = cell,
                None => record.push(cell),
            }
        }

        PredictedTable {
            headers,
            records,
            predictions,
            actual,
            column,
        }
    }
}

/// An upload augmented with a `Predicted MPG` column.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
    predictions: Vec<f64>,
    actual: Option<Vec<f64>>,
    column: usize,
}

impl PredictedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header row, including `Predicted MPG`.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows as text, including the predicted cell.
    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// Observed `mpg`, if the upload had a fully numeric `mpg` column.
    pub fn actual(&self) -> Option<&[f64]> {
        self.actual.as_deref()
    }

    /// Index of the `Predicted MPG` column.
    pub fn prediction_column(&self) -> usize {
        self.column
    }

    /// Writes the table as CSV with a header row and no index column.
    ///
    /// # Errors
    /// Returns `BatchError` if writing fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), BatchError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for record in &self.records {
            wtr.write_record(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Renders the table as a CSV string.
    ///
    /// # Errors
    /// Returns `BatchError` if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, BatchError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| {
            BatchError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Writes the table to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns `BatchError` if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BatchError> {
        let path = path.as_ref();
        self.write_csv(File::create(path)?)?;
        log::info!("wrote {} predicted rows to {}", self.len(), path.display());
        Ok(())
    }
}

/// Runs the whole batch flow on a CSV source.
///
/// # Errors
/// Returns any `BatchError` of [`BatchTable::from_reader`].
pub fn predict_csv<R: Read, P: Predictor>(
    model: &P,
    reader: R,
) -> Result<PredictedTable, BatchError> {
    let table = BatchTable::from_reader(reader)?;
    Ok(table.predict(model))
}

/// Runs the whole batch flow on a CSV file.
///
/// # Errors
/// Returns any `BatchError` of [`BatchTable::load`].
pub fn predict_file<P: Predictor, Q: AsRef<Path>>(
    model: &P,
    path: Q,
) -> Result<PredictedTable, BatchError> {
    let path = path.as_ref();
    match BatchTable::load(path) {
        Ok(table) => {
            log::info!("predicting {} uploaded rows from {}", table.len(), path.display());
            Ok(table.predict(model))
        }
        Err(e) => {
            log::warn!("rejected upload {}: {e}", path.display());
            Err(e)
        }
    }
}
