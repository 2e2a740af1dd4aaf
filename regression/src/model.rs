use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::Serialize;

use crate::{FitError, Features, ReferenceDataset, FEATURE_COLUMNS};

/// Relative pivot size under which the normal matrix is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// A fitted function from car features to fuel economy.
///
/// Implementations are pure: the same input always maps to the same output
/// and predicting never mutates the model.
pub trait Predictor {
    /// Predicts `mpg` for a single car.
    fn predict_one(&self, features: &Features) -> f64;

    /// Predicts `mpg` for every row, preserving order.
    fn predict(&self, rows: &[Features]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}

/// Ordinary least squares fit of `mpg ~ hp + wt + disp`.
///
/// The value is built once from the reference dataset and then only read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearModel {
    /// Weights in [`FEATURE_COLUMNS`] order.
    weights: [f64; 3],
    intercept: f64,
}

impl LinearModel {
    /// Fits the model on the reference dataset.
    ///
    /// # Errors
    /// Returns `FitError` if the dataset is too small or degenerate.
    pub fn fit(dataset: &ReferenceDataset) -> Result<Self, FitError> {
        let x = dataset.design_matrix();
        let y = dataset.target_vector();
        let model = Self::fit_arrays(x.view(), y.view())?;

        log::info!(
            "fitted on {} rows: intercept={:.6}, hp={:.6}, wt={:.6}, disp={:.6}",
            dataset.len(),
            model.intercept,
            model.weights[0],
            model.weights[1],
            model.weights[2],
        );
        Ok(model)
    }

    /// Fits the model on an `n x 3` design matrix and its targets.
    ///
    /// Features and target are centered, the 3x3 normal equations are solved
    /// by Cholesky decomposition and the intercept is recovered from the means.
    ///
    /// # Errors
    /// Returns `FitError::InsufficientSamples` with fewer than four rows,
    /// `FitError::Singular` for constant or collinear predictors and
    /// `FitError::NonFinite` if the solution overflows.
    pub fn fit_arrays(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Self, FitError> {
        let (n_samples, n_features) = x.dim();
        let required = FEATURE_COLUMNS.len() + 1;

        if n_features != FEATURE_COLUMNS.len() {
            return Err(FitError::ShapeMismatch {
                what: "features",
                got: n_features,
                expected: FEATURE_COLUMNS.len(),
            });
        }
        if y.len() != n_samples {
            return Err(FitError::ShapeMismatch {
                what: "targets",
                got: y.len(),
                expected: n_samples,
            });
        }
        if n_samples < required {
            return Err(FitError::InsufficientSamples {
                got: n_samples,
                expected: required,
            });
        }

        let (Some(x_mean), Some(y_mean)) = (x.mean_axis(Axis(0)), y.mean()) else {
            return Err(FitError::InsufficientSamples {
                got: n_samples,
                expected: required,
            });
        };

        let xc = &x - &x_mean;
        let yc = &y - y_mean;

        let xtx = xc.t().dot(&xc);
        let xty = xc.t().dot(&yc);

        let w = cholesky_solve(&xtx, &xty)?;
        let intercept = y_mean - x_mean.dot(&w);

        if !intercept.is_finite() || w.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite);
        }

        Ok(Self {
            weights: [w[0], w[1], w[2]],
            intercept,
        })
    }

    /// Builds a model from known coefficients.
    pub fn from_coefficients(weights: [f64; 3], intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Weights in [`FEATURE_COLUMNS`] order.
    pub fn weights(&self) -> [f64; 3] {
        self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predicts every row of an `n x 3` matrix.
    pub fn predict_matrix(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.dot(&ArrayView1::from(&self.weights[..])) + self.intercept
    }
}

impl Predictor for LinearModel {
    fn predict_one(&self, features: &Features) -> f64 {
        features
            .to_array()
            .iter()
            .zip(self.weights)
            .fold(self.intercept, |acc, (x, w)| acc + w * x)
    }
}

/// Solves `a * x = b` for a symmetric positive definite `a`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, FitError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();

            if i == j {
                let diag = a[[i, i]] - sum;
                if !(diag > PIVOT_TOLERANCE * a[[i, i]].abs()) {
                    return Err(FitError::Singular);
                }
                l[[i, i]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L * z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|k| l[[i, k]] * z[k]).sum();
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T * x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|k| l[[k, i]] * x[k]).sum();
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}
