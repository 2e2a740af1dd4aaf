use std::{path::PathBuf, time::Duration};

use regression::InputBounds;

pub const DEFAULT_DATASET: &str = "data/mtcars.csv";
pub const DEFAULT_EXPORT: &str = "predicted_mpg.csv";
pub const DEFAULT_TICK_MS: u64 = 120;

/// Unvalidated bounds of one form field as read from JSON.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDraft {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

/// Unvalidated configuration as read from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDraft {
    pub dataset: String,
    pub export: String,
    pub tick_ms: u64,
    pub hp: FieldDraft,
    pub wt: FieldDraft,
    pub disp: FieldDraft,
}

impl Default for ConfigDraft {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.into(),
            export: DEFAULT_EXPORT.into(),
            tick_ms: DEFAULT_TICK_MS,
            hp: FieldDraft {
                min: 50.0,
                max: 400.0,
                default: 110.0,
                step: 1.0,
            },
            wt: FieldDraft {
                min: 1.0,
                max: 6.0,
                default: 3.0,
                step: 0.01,
            },
            disp: FieldDraft {
                min: 50.0,
                max: 500.0,
                default: 200.0,
                step: 0.01,
            },
        }
    }
}

/// Validated configuration the app runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub export_path: PathBuf,
    pub tick: Duration,
    pub bounds: InputBounds,
}
