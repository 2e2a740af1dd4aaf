use crate::{PredictedTable, Predictor, ReferenceDataset};

/// Which data the performance plot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotSource {
    /// Predictions over the reference dataset against its `mpg`.
    Reference,
    /// Predictions over an upload against its own `mpg`.
    Uploaded,
    /// Predictions over an upload with nothing to compare them to.
    UploadedWithoutActual,
}

impl PlotSource {
    pub fn title(self) -> &'static str {
        match self {
            PlotSource::Reference => "Actual vs Predicted MPG (on mtcars dataset)",
            PlotSource::Uploaded => "Actual vs Predicted MPG (from uploaded data)",
            PlotSource::UploadedWithoutActual => {
                "Predicted MPG (uploaded data, no actual MPG to compare)"
            }
        }
    }
}

/// Geometry of the plot.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotKind {
    /// `(actual, predicted)` points plus the dashed `y = x` reference line
    /// between the smallest and largest actual value.
    Scatter {
        points: Vec<(f64, f64)>,
        identity: [(f64, f64); 2],
    },
    /// `(row index, predicted)` points joined in row order.
    Line { points: Vec<(f64, f64)> },
}

/// Data behind the "Model Performance" chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformancePlot {
    source: PlotSource,
    kind: PlotKind,
}

impl PerformancePlot {
    /// Picks the plot for the current state of the page.
    ///
    /// An upload that produced predictions wins over the reference dataset.
    pub fn select<P: Predictor>(
        model: &P,
        reference: &ReferenceDataset,
        upload: Option<&PredictedTable>,
    ) -> Self {
        match upload {
            Some(table) => Self::from_upload(table),
            None => Self::reference(model, reference),
        }
    }

    /// Actual vs predicted over the reference dataset.
    pub fn reference<P: Predictor>(model: &P, reference: &ReferenceDataset) -> Self {
        let predicted = model.predict(&reference.features());
        Self::scatter(PlotSource::Reference, &reference.targets(), &predicted)
    }

    /// Actual vs predicted when the upload has `mpg`, predictions by row
    /// index otherwise.
    pub fn from_upload(table: &PredictedTable) -> Self {
        match table.actual() {
            Some(actual) => Self::scatter(PlotSource::Uploaded, actual, table.predictions()),
            // Also reached when `mpg` exists but has a blank or non-numeric cell.
            None => Self {
                source: PlotSource::UploadedWithoutActual,
                kind: PlotKind::Line {
                    points: table
                        .predictions()
                        .iter()
                        .enumerate()
                        .map(|(i, &p)| (i as f64, p))
                        .collect(),
                },
            },
        }
    }

    fn scatter(source: PlotSource, actual: &[f64], predicted: &[f64]) -> Self {
        let (lo, hi) = min_max(actual.iter().copied()).unwrap_or((0.0, 0.0));

        Self {
            source,
            kind: PlotKind::Scatter {
                points: actual.iter().copied().zip(predicted.iter().copied()).collect(),
                identity: [(lo, lo), (hi, hi)],
            },
        }
    }

    pub fn source(&self) -> PlotSource {
        self.source
    }

    pub fn kind(&self) -> &PlotKind {
        &self.kind
    }

    pub fn title(&self) -> &'static str {
        self.source.title()
    }

    pub fn is_scatter(&self) -> bool {
        matches!(self.kind, PlotKind::Scatter { .. })
    }

    /// The plotted points, without the identity line.
    pub fn points(&self) -> &[(f64, f64)] {
        match &self.kind {
            PlotKind::Scatter { points, .. } | PlotKind::Line { points } => points,
        }
    }

    pub fn x_label(&self) -> &'static str {
        match self.kind {
            PlotKind::Scatter { .. } => "Actual MPG",
            PlotKind::Line { .. } => "Car Index",
        }
    }

    pub fn y_label(&self) -> &'static str {
        "Predicted MPG"
    }

    /// Legend of the point series.
    pub fn series_label(&self) -> &'static str {
        match self.kind {
            PlotKind::Scatter { .. } => "Predictions",
            PlotKind::Line { .. } => "Predicted MPG",
        }
    }

    /// X axis range covering every point and the identity line, padded by 5%.
    pub fn x_bounds(&self) -> [f64; 2] {
        padded(self.all_points().map(|(x, _)| x))
    }

    /// Y axis range covering every point and the identity line, padded by 5%.
    pub fn y_bounds(&self) -> [f64; 2] {
        padded(self.all_points().map(|(_, y)| y))
    }

    fn all_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let identity: &[(f64, f64)] = match &self.kind {
            PlotKind::Scatter { identity, .. } => identity.as_slice(),
            PlotKind::Line { .. } => &[],
        };
        self.points().iter().chain(identity).copied()
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn padded(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = min_max(values).unwrap_or((0.0, 1.0));
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    [lo - pad, hi + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{predict_csv, Features, Sample};

    struct Doubling;

    impl Predictor for Doubling {
        fn predict_one(&self, f: &Features) -> f64 {
            2.0 * f.hp
        }
    }

    fn reference() -> ReferenceDataset {
        ReferenceDataset::from_samples(
            [(10.0, 25.0), (20.0, 15.0), (30.0, 30.0)]
                .iter()
                .map(|&(hp, mpg)| Sample {
                    features: Features::new(hp, 3.0, 200.0),
                    mpg,
                })
                .collect(),
        )
    }

    #[test]
    fn without_upload_plots_reference_scatter() {
        let plot = PerformancePlot::select(&Doubling, &reference(), None);

        assert_eq!(plot.source(), PlotSource::Reference);
        assert_eq!(plot.title(), "Actual vs Predicted MPG (on mtcars dataset)");
        assert_eq!(
            plot.kind(),
            &PlotKind::Scatter {
                points: vec![(25.0, 20.0), (15.0, 40.0), (30.0, 60.0)],
                identity: [(15.0, 15.0), (30.0, 30.0)],
            }
        );
        assert_eq!(plot.x_label(), "Actual MPG");
        assert_eq!(plot.y_label(), "Predicted MPG");
    }

    #[test]
    fn upload_with_mpg_plots_uploaded_scatter() {
        let csv = "hp,wt,disp,mpg\n5,1,1,12\n7,1,1,9\n";
        let table = predict_csv(&Doubling, csv.as_bytes()).unwrap();
        let plot = PerformancePlot::select(&Doubling, &reference(), Some(&table));

        assert_eq!(plot.source(), PlotSource::Uploaded);
        assert_eq!(plot.title(), "Actual vs Predicted MPG (from uploaded data)");
        match plot.kind() {
            PlotKind::Scatter { points, identity } => {
                assert_eq!(points, &vec![(12.0, 10.0), (9.0, 14.0)]);
                assert_eq!(identity, &[(9.0, 9.0), (12.0, 12.0)]);
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn upload_without_mpg_plots_line_by_row_index() {
        let table = predict_csv(&Doubling, "hp,wt,disp\n5,1,1\n7,1,1\n6,1,1\n".as_bytes()).unwrap();
        let plot = PerformancePlot::select(&Doubling, &reference(), Some(&table));

        assert_eq!(plot.source(), PlotSource::UploadedWithoutActual);
        assert!(!plot.is_scatter());
        assert_eq!(plot.points(), [(0.0, 10.0), (1.0, 14.0), (2.0, 12.0)]);
        assert_eq!(plot.x_label(), "Car Index");
        assert_eq!(plot.series_label(), "Predicted MPG");
    }

    #[test]
    fn bounds_cover_points_and_identity_line() {
        let plot = PerformancePlot::reference(&Doubling, &reference());
        let [x_lo, x_hi] = plot.x_bounds();
        let [y_lo, y_hi] = plot.y_bounds();

        assert!(x_lo < 15.0 && x_hi > 30.0);
        assert!(y_lo < 15.0 && y_hi > 60.0);
    }

    #[test]
    fn single_point_bounds_are_not_degenerate() {
        let table = predict_csv(&Doubling, "hp,wt,disp\n5,1,1\n".as_bytes()).unwrap();
        let plot = PerformancePlot::from_upload(&table);
        let [lo, hi] = plot.x_bounds();
        assert!(lo < hi);
    }
}
