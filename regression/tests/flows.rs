use rand::Rng;
use regression::{
    predict_csv, predict_file, BatchError, FitStats, Features, InputField, LinearModel,
    ManualInput, PerformancePlot, PlotKind, PlotSource, Predictor, ReferenceDataset,
    PREDICTED_COLUMN,
};

const MTCARS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/mtcars.csv");

fn fitted() -> (ReferenceDataset, LinearModel) {
    let dataset = ReferenceDataset::load(MTCARS).unwrap();
    let model = LinearModel::fit(&dataset).unwrap();
    (dataset, model)
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn mtcars_has_thirty_two_cars() {
    let (dataset, _) = fitted();
    assert_eq!(dataset.len(), 32);
}

#[test]
fn fit_matches_known_coefficients() {
    let (_, model) = fitted();
    let [hp, wt, disp] = model.weights();

    assert!(close(model.intercept(), 37.105505, 1e-5));
    assert!(close(hp, -0.031157, 1e-6));
    assert!(close(wt, -3.800891, 1e-5));
    assert!(close(disp, -0.000937, 1e-6));
}

#[test]
fn fit_beats_constant_predictor() {
    let (dataset, model) = fitted();
    let stats = FitStats::evaluate(&model, &dataset);

    assert_eq!(stats.samples(), 32);
    assert!(stats.mse() < stats.target_variance());
    assert!(stats.beats_constant());
    assert!(close(stats.r_squared(), 0.826836, 1e-5));
}

#[test]
fn predict_is_deterministic() {
    let (_, model) = fitted();
    let mut rng = rand::rng();

    for _ in 0..50 {
        let row = Features::new(
            rng.random_range(50.0..400.0),
            rng.random_range(1.0..6.0),
            rng.random_range(50.0..500.0),
        );
        assert_eq!(model.predict_one(&row), model.predict_one(&row));
    }
}

#[test]
fn predict_is_the_linear_combination() {
    let (_, model) = fitted();
    let [w_hp, w_wt, w_disp] = model.weights();
    let mut rng = rand::rng();

    for _ in 0..50 {
        let row = Features::new(
            rng.random_range(50.0..400.0),
            rng.random_range(1.0..6.0),
            rng.random_range(50.0..500.0),
        );
        let expected = w_hp * row.hp + w_wt * row.wt + w_disp * row.disp + model.intercept();
        assert!(close(model.predict_one(&row), expected, 1e-9));
    }
}

#[test]
fn manual_defaults_predict_the_same_value_every_time() {
    let (_, model) = fitted();
    let input = ManualInput::default();

    let first = model.predict_one(&input.features());
    for _ in 0..10 {
        assert_eq!(model.predict_one(&input.features()), first);
    }
    assert!(close(first, 22.088211, 1e-5));
    assert_eq!(regression::format_prediction(first), "22.09");
}

#[test]
fn manual_prediction_follows_edited_fields() {
    let (_, model) = fitted();
    let mut input = ManualInput::default();
    let before = model.predict_one(&input.features());

    input.set(InputField::Wt, 4.0).unwrap();
    let after = model.predict_one(&input.features());

    assert!(close(after - before, model.weights()[1], 1e-9));
}

#[test]
fn batch_keeps_row_count_and_order() {
    let (_, model) = fitted();
    let csv = "hp,wt,disp\n110,2.62,160\n52,1.615,75.7\n335,3.57,301\n";

    let out = predict_csv(&model, csv.as_bytes()).unwrap();

    assert_eq!(out.len(), 3);
    assert_eq!(out.headers(), ["hp", "wt", "disp", PREDICTED_COLUMN]);
    assert_eq!(out.records()[1][0], "52");
    assert_eq!(out.records()[2][0], "335");
    let expected = model.predict_one(&Features::new(52.0, 1.615, 75.7));
    assert_eq!(out.predictions()[1], expected);
    assert_eq!(out.records()[1][3], expected.to_string());
}

#[test]
fn batch_without_wt_reports_an_error() {
    let (_, model) = fitted();

    let err = predict_csv(&model, "hp,disp\n110,160\n".as_bytes()).unwrap_err();

    assert!(matches!(err, BatchError::MissingColumns(ref cols) if cols == &["wt"]));
    assert_eq!(err.to_string(), "missing required column(s): wt");
}

#[test]
fn batch_from_missing_file_is_an_io_error() {
    let (_, model) = fitted();
    let err = predict_file(&model, "/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, BatchError::Io(_)));
}

#[test]
fn reference_csv_round_trips_through_batch_flow() {
    let (dataset, model) = fitted();

    let out = predict_file(&model, MTCARS).unwrap();

    assert_eq!(out.len(), dataset.len());
    assert_eq!(out.headers().len(), 13);
    assert_eq!(out.actual(), Some(dataset.targets().as_slice()));
    assert_eq!(out.predictions(), model.predict(&dataset.features()).as_slice());
}

#[test]
fn plot_defaults_to_reference_scatter() {
    let (dataset, model) = fitted();
    let plot = PerformancePlot::select(&model, &dataset, None);

    assert_eq!(plot.source(), PlotSource::Reference);
    assert_eq!(plot.points().len(), 32);
    match plot.kind() {
        PlotKind::Scatter { identity, .. } => {
            assert_eq!(identity[0], (10.4, 10.4));
            assert_eq!(identity[1], (33.9, 33.9));
        }
        other => panic!("expected scatter, got {other:?}"),
    }
}

#[test]
fn plot_for_upload_without_mpg_is_a_line() {
    let (dataset, model) = fitted();
    let upload = predict_csv(&model, "hp,wt,disp\n110,3,200\n150,3.5,300\n".as_bytes()).unwrap();

    let plot = PerformancePlot::select(&model, &dataset, Some(&upload));

    assert_eq!(plot.source(), PlotSource::UploadedWithoutActual);
    assert!(matches!(plot.kind(), PlotKind::Line { .. }));
    assert_eq!(plot.points()[0].0, 0.0);
    assert_eq!(plot.points()[1].0, 1.0);
}
