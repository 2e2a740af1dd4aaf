use std::{env, io, process};

use anyhow::{Context, Result};
use regression::{
    format_prediction, predict_file, FitStats, InputField, LinearModel, ManualInput,
    PerformancePlot, PlotKind, Predictor, ReferenceDataset, FEATURE_COLUMNS,
};
use serde_json::json;

const DEFAULT_DATASET: &str = "data/mtcars.csv";

const USAGE: &str = "\
Usage: mpg <command>

Commands:
  predict <hp> <wt> <disp>       predict MPG for one car
  batch <input.csv> [output.csv] append a Predicted MPG column
  plot [input.csv]               print the performance plot data
  model                          print coefficients and fit statistics as JSON";

#[derive(Debug, PartialEq)]
enum Command {
    Predict { hp: String, wt: String, disp: String },
    Batch { input: String, output: Option<String> },
    Plot { input: Option<String> },
    Model,
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let rest: Vec<&str> = args.iter().skip(2).map(String::as_str).collect();
    let Some(name) = args.get(1) else {
        return Err("missing command".into());
    };

    match (name.as_str(), rest.as_slice()) {
        ("predict", [hp, wt, disp]) => Ok(Command::Predict {
            hp: hp.to_string(),
            wt: wt.to_string(),
            disp: disp.to_string(),
        }),
        ("batch", [input]) => Ok(Command::Batch {
            input: input.to_string(),
            output: None,
        }),
        ("batch", [input, output]) => Ok(Command::Batch {
            input: input.to_string(),
            output: Some(output.to_string()),
        }),
        ("plot", []) => Ok(Command::Plot { input: None }),
        ("plot", [input]) => Ok(Command::Plot {
            input: Some(input.to_string()),
        }),
        ("model", []) => Ok(Command::Model),
        ("predict" | "batch" | "plot" | "model", _) => {
            Err(format!("wrong number of arguments for '{name}'"))
        }
        (other, _) => Err(format!("unknown command '{other}'")),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            process::exit(2);
        }
    };

    let dataset_path = env::var("MPG_DATASET").unwrap_or_else(|_| DEFAULT_DATASET.into());
    let reference = ReferenceDataset::load(&dataset_path)
        .with_context(|| format!("loading reference dataset {dataset_path}"))?;
    let model = LinearModel::fit(&reference).context("fitting the regression model")?;

    log::debug!("running {command:?}");
    if let Err(e) = execute(command, &model, &reference) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    Ok(())
}

fn execute(command: Command, model: &LinearModel, reference: &ReferenceDataset) -> Result<()> {
    match command {
        Command::Predict { hp, wt, disp } => {
            let mut input = ManualInput::default();
            for (field, text) in InputField::ALL.into_iter().zip([hp, wt, disp]) {
                input.parse_and_set(field, &text)?;
            }
            let value = model.predict_one(&input.features());
            println!("Predicted MPG: {}", format_prediction(value));
        }

        Command::Batch { input, output } => {
            let table = predict_file(model, &input)?;
            match output {
                Some(path) => table.save(&path)?,
                None => table.write_csv(io::stdout().lock())?,
            }
        }

        Command::Plot { input } => {
            let upload = input.map(|path| predict_file(model, path)).transpose()?;
            let plot = PerformancePlot::select(model, reference, upload.as_ref());

            println!("{}", plot.title());
            println!("x: {}", plot.x_label());
            println!("y: {}", plot.y_label());
            if let PlotKind::Scatter { identity, .. } = plot.kind() {
                let [(lo, _), (hi, _)] = *identity;
                println!("ideal: ({lo}, {lo}) -> ({hi}, {hi})");
            }
            println!("{}:", plot.series_label());
            for (x, y) in plot.points() {
                println!("{x},{y}");
            }
        }

        Command::Model => {
            let stats = FitStats::evaluate(model, reference);
            let out = json!({
                "columns": FEATURE_COLUMNS,
                "model": model,
                "stats": stats,
                "r_squared": stats.r_squared(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
