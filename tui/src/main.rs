use std::{env, fs::File};

use anyhow::{anyhow, Context, Result};
use regression::{LinearModel, ManualInput, ReferenceDataset};

mod app;
mod config;
mod state;
mod ui;

use config::{builder, json};
use state::session::PredictorSession;

const DEFAULT_CONFIG: &str = "predictor.json";
const DEFAULT_LOG_FILE: &str = "mpg-tui.log";

fn main() -> Result<()> {
    init_logging()?;

    let config_path = env::var("MPG_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.into());
    let mut draft = json::load_config(&config_path).map_err(|e| anyhow!("{config_path}: {e}"))?;
    if let Ok(dataset) = env::var("MPG_DATASET") {
        draft.dataset = dataset;
    }
    let config = builder::build(&draft).map_err(|e| anyhow!("{config_path}: {e}"))?;

    let reference = ReferenceDataset::load(&config.dataset_path).with_context(|| {
        format!("loading reference dataset {}", config.dataset_path.display())
    })?;
    let model = LinearModel::fit(&reference).context("fitting the regression model")?;

    let session = PredictorSession::new(
        model,
        reference,
        ManualInput::new(config.bounds),
        config.export_path,
    );

    app::run::run(session, config.tick)
}

/// Sends `env_logger` output to a file so it never draws over the TUI.
fn init_logging() -> Result<()> {
    let path = env::var("MPG_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.into());
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
