mod batch;
mod dataset;
mod error;
mod input;
mod model;
mod plot;
mod stats;

pub use batch::{predict_csv, predict_file, BatchTable, PredictedTable, PREDICTED_COLUMN};
pub use dataset::{Features, ReferenceDataset, Sample, FEATURE_COLUMNS, TARGET_COLUMN};
pub use error::{BatchError, DataError, FitError, InputError};
pub use input::{format_prediction, FieldBounds, InputBounds, InputField, ManualInput};
pub use model::{LinearModel, Predictor};
pub use plot::{PerformancePlot, PlotKind, PlotSource};
pub use stats::{mean_squared_error, variance, FitStats};
