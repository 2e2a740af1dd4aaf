use serde::Serialize;

use crate::{Predictor, ReferenceDataset};

/// In-sample goodness of fit of a model on the reference dataset.
///
/// This type keeps fields private so the reported figures always come from
/// [`FitStats::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitStats {
    samples: usize,
    mse: f64,
    target_variance: f64,
}

impl FitStats {
    /// Scores `model` against every row of `dataset`.
    ///
    /// # Args
    /// * `model` - The fitted predictor.
    /// * `dataset` - Rows with known `mpg`.
    ///
    /// # Returns
    /// The sample count, the mean squared error and the target variance.
    ///
    /// # Panics
    /// Never panics.
    pub fn evaluate<P: Predictor>(model: &P, dataset: &ReferenceDataset) -> Self {
        let actual = dataset.targets();
        let predicted = model.predict(&dataset.features());

        Self {
            samples: actual.len(),
            mse: mean_squared_error(&predicted, &actual),
            target_variance: variance(&actual),
        }
    }

    /// Returns the number of rows scored.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the mean squared error of the predictions.
    pub fn mse(&self) -> f64 {
        self.mse
    }

    /// Returns the population variance of the target, which is the error of
    /// always predicting the mean.
    pub fn target_variance(&self) -> f64 {
        self.target_variance
    }

    /// Returns the coefficient of determination.
    ///
    /// # Returns
    /// `1 - mse / variance`, or `0.0` when the target is constant.
    pub fn r_squared(&self) -> f64 {
        if self.target_variance > 0.0 {
            1.0 - self.mse / self.target_variance
        } else {
            0.0
        }
    }

    /// Returns whether the model beats a constant predictor.
    pub fn beats_constant(&self) -> bool {
        self.mse < self.target_variance
    }
}

/// Mean of squared differences between paired values.
///
/// Pairs past the shorter slice are ignored; empty input yields `0.0`.
pub fn mean_squared_error(predicted: &[f64], actual: &[f64]) -> f64 {
    let n = predicted.len().min(actual.len());
    if n == 0 {
        return 0.0;
    }

    predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / n as f64
}

/// Population variance; empty input yields `0.0`.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
