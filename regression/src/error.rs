use std::{error::Error, fmt, io};

use crate::InputField;

/// Errors produced while loading the reference dataset.
#[derive(Debug)]
pub enum DataError {
    /// The dataset file could not be opened or read.
    Io(io::Error),

    /// The file is not valid CSV (e.g. rows of unequal length).
    Csv(csv::Error),

    /// A column the model needs is not in the header row.
    MissingColumn(&'static str),

    /// A cell of a required column is empty or not a number.
    InvalidValue {
        /// 1-based data row (the header is row 0).
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "cannot read reference dataset: {e}"),
            DataError::Csv(e) => write!(f, "malformed reference dataset: {e}"),
            DataError::MissingColumn(column) => {
                write!(f, "reference dataset has no '{column}' column")
            }
            DataError::InvalidValue { row, column, value } => {
                write!(f, "row {row}, column '{column}': '{value}' is not a number")
            }
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataError::Io(e) => Some(e),
            DataError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DataError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Errors produced when the reference dataset cannot determine a unique fit.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// Fewer rows than unknowns (three weights plus the intercept).
    InsufficientSamples { got: usize, expected: usize },

    /// The normal equations have no unique solution (a constant or
    /// perfectly collinear predictor).
    Singular,

    /// The solve produced NaN or infinite coefficients.
    NonFinite,

    /// The design matrix and target disagree in shape.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::InsufficientSamples { got, expected } => write!(
                f,
                "not enough samples to fit: got {got}, expected at least {expected}"
            ),
            FitError::Singular => {
                write!(f, "predictors are constant or perfectly collinear")
            }
            FitError::NonFinite => write!(f, "fit produced non-finite coefficients"),
            FitError::ShapeMismatch { what, got, expected } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
        }
    }
}

impl Error for FitError {}

/// Errors produced by the batch prediction flow.
#[derive(Debug)]
pub enum BatchError {
    /// The uploaded file could not be opened, read or written.
    Io(io::Error),

    /// The upload is not valid CSV.
    Csv(csv::Error),

    /// One or more of `hp`, `wt`, `disp` are missing from the header row.
    MissingColumns(Vec<&'static str>),

    /// A cell of a required column is empty or not a number.
    InvalidValue {
        /// 1-based data row (the header is row 0).
        row: usize,
        column: &'static str,
        value: String,
    },

    /// The upload has a header row but no data rows.
    Empty,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Io(e) => write!(f, "io error: {e}"),
            BatchError::Csv(e) => write!(f, "malformed CSV: {e}"),
            BatchError::MissingColumns(columns) => {
                write!(f, "missing required column(s): {}", columns.join(", "))
            }
            BatchError::InvalidValue { row, column, value } => {
                write!(f, "row {row}, column '{column}': '{value}' is not a number")
            }
            BatchError::Empty => write!(f, "the uploaded file has no data rows"),
        }
    }
}

impl Error for BatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BatchError::Io(e) => Some(e),
            BatchError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BatchError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for BatchError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Errors produced while editing a manual input field.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// The text could not be parsed as a number.
    NotANumber { field: InputField, text: String },

    /// The field only accepts whole numbers.
    NotAnInteger { field: InputField, value: f64 },

    /// The value falls outside the field's range.
    OutOfRange {
        field: InputField,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The configured bounds for a field are inconsistent.
    InvalidBounds {
        field: InputField,
        reason: &'static str,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotANumber { field, text } => {
                write!(f, "{}: '{text}' is not a number", field.column())
            }
            InputError::NotAnInteger { field, value } => {
                write!(f, "{}: {value} must be a whole number", field.column())
            }
            InputError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{}: {value} is outside the range [{min}, {max}]",
                field.column()
            ),
            InputError::InvalidBounds { field, reason } => {
                write!(f, "invalid bounds for {}: {reason}", field.column())
            }
        }
    }
}

impl Error for InputError {}
