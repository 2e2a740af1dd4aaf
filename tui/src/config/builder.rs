use std::{path::PathBuf, time::Duration};

use regression::{FieldBounds, InputBounds, InputField};

use super::model::{AppConfig, ConfigDraft, FieldDraft};

/// Converts a [`ConfigDraft`] into the [`AppConfig`] the app runs with.
///
/// # Errors
/// Returns a human-readable error if any value is invalid.
pub fn build(d: &ConfigDraft) -> Result<AppConfig, String> {
    if d.dataset.trim().is_empty() {
        return Err("dataset path must not be empty".into());
    }
    if d.export.trim().is_empty() {
        return Err("export path must not be empty".into());
    }
    if d.tick_ms == 0 {
        return Err("tick_ms must be greater than zero".into());
    }

    Ok(AppConfig {
        dataset_path: PathBuf::from(&d.dataset),
        export_path: PathBuf::from(&d.export),
        tick: Duration::from_millis(d.tick_ms),
        bounds: InputBounds {
            hp: build_field(InputField::Hp, &d.hp)?,
            wt: build_field(InputField::Wt, &d.wt)?,
            disp: build_field(InputField::Disp, &d.disp)?,
        },
    })
}

fn build_field(field: InputField, d: &FieldDraft) -> Result<FieldBounds, String> {
    FieldBounds::new(field, d.min, d.max, d.default, d.step).map_err(|e| e.to_string())
}
