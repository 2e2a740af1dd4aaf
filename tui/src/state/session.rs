use std::path::{Path, PathBuf};

use regression::{
    format_prediction, predict_file, FitStats, InputError, InputField, LinearModel, ManualInput,
    PerformancePlot, Predictor, ReferenceDataset,
};

use super::model::{BatchStatus, LogLine};

const MAX_LOGS: usize = 200;

/// Everything the predictor page shows, derived from the fitted model, the
/// form values and the last upload.
pub struct PredictorSession {
    model: LinearModel,
    reference: ReferenceDataset,
    stats: FitStats,
    input: ManualInput,
    result: Option<f64>,
    batch: BatchStatus,
    export_path: PathBuf,
    logs: Vec<LogLine>,
}

impl PredictorSession {
    /// Creates a new `PredictorSession`.
    ///
    /// # Args
    /// * `model` - The model fitted on `reference`.
    /// * `reference` - The dataset shown in the default plot.
    /// * `input` - The manual form, usually at its defaults.
    /// * `export_path` - Where the predicted table is written on download.
    pub fn new(
        model: LinearModel,
        reference: ReferenceDataset,
        input: ManualInput,
        export_path: PathBuf,
    ) -> Self {
        let stats = FitStats::evaluate(&model, &reference);

        let mut session = Self {
            model,
            reference,
            stats,
            input,
            result: None,
            batch: BatchStatus::Idle,
            export_path,
            logs: Vec::new(),
        };

        session.push_log(
            "INFO",
            format!(
                "model fitted on {} cars (R² = {:.3})",
                session.stats.samples(),
                session.stats.r_squared()
            ),
        );
        session
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn stats(&self) -> &FitStats {
        &self.stats
    }

    pub fn input(&self) -> &ManualInput {
        &self.input
    }

    /// Last manual prediction, cleared when the form changes.
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn batch(&self) -> &BatchStatus {
        &self.batch
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn logs(&self) -> &[LogLine] {
        &self.logs
    }

    /// Commits typed text into a form field.
    ///
    /// # Errors
    /// Returns the `InputError` when the text is rejected; the previous value
    /// is kept.
    pub fn set_field(&mut self, field: InputField, text: &str) -> Result<(), InputError> {
        let before = self.input.value(field);
        self.input.parse_and_set(field, text)?;
        if self.input.value(field) != before {
            self.result = None;
        }
        Ok(())
    }

    /// Moves a form field by `steps` steps.
    pub fn step_field(&mut self, field: InputField, steps: i32) {
        self.input.increment(field, steps);
        self.result = None;
    }

    /// Restores the form to its defaults.
    pub fn reset_form(&mut self) {
        self.input.reset();
        self.result = None;
        self.push_log("INFO", "form reset to defaults".into());
    }

    /// Predicts MPG for the current form values.
    pub fn predict_manual(&mut self) -> f64 {
        let features = self.input.features();
        let value = self.model.predict_one(&features);

        log::info!(
            hp = features.hp, wt = features.wt, disp = features.disp;
            "manual prediction {value}"
        );
        self.push_log(
            "INFO",
            format!(
                "hp={} wt={} disp={} -> {} mpg",
                self.input.display_value(InputField::Hp),
                self.input.display_value(InputField::Wt),
                self.input.display_value(InputField::Disp),
                format_prediction(value)
            ),
        );

        self.result = Some(value);
        value
    }

    /// Runs the batch flow on the CSV at `path`.
    ///
    /// A failed upload replaces any previous table.
    pub fn upload(&mut self, path: &str) {
        self.batch = match predict_file(&self.model, path) {
            Ok(table) => {
                let compare = if table.actual().is_some() {
                    "with actual mpg"
                } else {
                    "without actual mpg"
                };
                self.push_log(
                    "INFO",
                    format!("predicted {} rows from '{path}' ({compare})", table.len()),
                );
                BatchStatus::Loaded(table)
            }
            Err(e) => {
                let message = format!("Error processing file: {e}");
                self.push_log("ERROR", message.clone());
                BatchStatus::Failed(message)
            }
        };
    }

    /// Writes the predicted table to the export path.
    ///
    /// # Errors
    /// Returns a human-readable message if nothing is loaded or the write
    /// fails.
    pub fn export(&mut self) -> Result<(), String> {
        let Some(table) = self.batch.table() else {
            return Err("upload a CSV file before downloading".into());
        };

        match table.save(&self.export_path) {
            Ok(()) => {
                let message = format!(
                    "saved {} rows to {}",
                    table.len(),
                    self.export_path.display()
                );
                self.push_log("INFO", message);
                Ok(())
            }
            Err(e) => {
                let message = format!("cannot write {}: {e}", self.export_path.display());
                self.push_log("ERROR", message.clone());
                Err(message)
            }
        }
    }

    /// The performance plot for the current state.
    pub fn plot(&self) -> PerformancePlot {
        PerformancePlot::select(&self.model, &self.reference, self.batch.table())
    }

    fn push_log(&mut self, level: &'static str, message: String) {
        self.logs.push(LogLine { level, message });
        if self.logs.len() > MAX_LOGS {
            let drain = self.logs.len() - MAX_LOGS;
            self.logs.drain(0..drain);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, process};

    use regression::{Features, PlotSource, Sample};

    use super::*;

    fn session() -> PredictorSession {
        let reference = ReferenceDataset::from_samples(
            [
                (110.0, 2.620, 160.0, 21.0),
                (93.0, 2.320, 108.0, 22.8),
                (175.0, 3.440, 360.0, 18.7),
                (105.0, 3.460, 225.0, 18.1),
                (245.0, 3.570, 360.0, 14.3),
                (62.0, 3.190, 146.7, 24.4),
            ]
            .iter()
            .map(|&(hp, wt, disp, mpg)| Sample {
                features: Features::new(hp, wt, disp),
                mpg,
            })
            .collect(),
        );
        let model = LinearModel::fit(&reference).unwrap();
        PredictorSession::new(model, reference, ManualInput::default(), temp_path("export"))
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mpg-tui-{}-{name}.csv", process::id()))
    }

    #[test]
    fn manual_prediction_is_stored() {
        let mut s = session();
        assert_eq!(s.result(), None);

        let value = s.predict_manual();

        assert_eq!(s.result(), Some(value));
        assert_eq!(value, s.model().predict_one(&Features::new(110.0, 3.0, 200.0)));
    }

    #[test]
    fn editing_a_field_clears_the_result() {
        let mut s = session();
        s.predict_manual();

        s.set_field(InputField::Hp, "150").unwrap();

        assert_eq!(s.result(), None);
        assert_eq!(s.input().value(InputField::Hp), 150.0);
    }

    #[test]
    fn rejected_text_keeps_value() {
        let mut s = session();
        assert!(s.set_field(InputField::Wt, "9").is_err());
        assert_eq!(s.input().value(InputField::Wt), 3.0);
    }

    #[test]
    fn failed_upload_clears_previous_table() {
        let mut s = session();
        let good = temp_path("good");
        fs::write(&good, "hp,wt,disp\n110,3,200\n").unwrap();

        s.upload(good.to_str().unwrap());
        assert!(s.batch().table().is_some());
        assert_eq!(s.plot().source(), PlotSource::UploadedWithoutActual);

        s.upload("/definitely/not/here.csv");
        assert!(matches!(s.batch(), BatchStatus::Failed(_)));
        assert_eq!(s.plot().source(), PlotSource::Reference);

        fs::remove_file(good).unwrap();
    }

    #[test]
    fn missing_columns_are_reported_inline() {
        let mut s = session();
        let bad = temp_path("bad");
        fs::write(&bad, "hp,disp\n110,200\n").unwrap();

        s.upload(bad.to_str().unwrap());

        assert_eq!(
            s.batch(),
            &BatchStatus::Failed(
                "Error processing file: missing required column(s): wt".into()
            )
        );
        fs::remove_file(bad).unwrap();
    }

    #[test]
    fn export_requires_a_table() {
        let mut s = session();
        assert!(s.export().is_err());
    }

    #[test]
    fn export_writes_predicted_csv() {
        let mut s = session();
        let input = temp_path("upload");
        fs::write(&input, "hp,wt,disp,mpg\n110,3,200,21\n").unwrap();

        s.upload(input.to_str().unwrap());
        s.export().unwrap();

        let written = fs::read_to_string(s.export_path()).unwrap();
        assert!(written.starts_with("hp,wt,disp,mpg,Predicted MPG\n110,3,200,21,"));

        fs::remove_file(input).unwrap();
        fs::remove_file(s.export_path()).unwrap();
    }

    #[test]
    fn logs_are_bounded() {
        let mut s = session();
        for _ in 0..(MAX_LOGS + 50) {
            s.predict_manual();
        }
        assert_eq!(s.logs().len(), MAX_LOGS);
    }
}
