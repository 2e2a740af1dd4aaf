use std::io::ErrorKind;

use serde_json::Value;

use super::model::{ConfigDraft, FieldDraft};

/// Loads a [`ConfigDraft`] from a JSON file.
///
/// A missing file yields the defaults.
///
/// # Errors
/// Returns a human-readable string if the file cannot be read or parsed.
pub fn load_config(path: &str) -> Result<ConfigDraft, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("no config at '{path}', using defaults");
            return Ok(ConfigDraft::default());
        }
        Err(e) => return Err(format!("cannot read '{path}': {e}")),
    };

    parse_config(&content)
}

/// Parses a [`ConfigDraft`] from JSON text. Every key is optional.
///
/// # Errors
/// Returns a human-readable string if the JSON is invalid or a key has the
/// wrong type.
pub fn parse_config(content: &str) -> Result<ConfigDraft, String> {
    let val: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    if !val.is_object() {
        return Err("config must be a JSON object".into());
    }

    let defaults = ConfigDraft::default();

    let string = |key: &str, default: String| -> Result<String, String> {
        match &val[key] {
            Value::Null => Ok(default),
            v => v
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("{key} must be a string")),
        }
    };

    let tick_ms = match &val["tick_ms"] {
        Value::Null => defaults.tick_ms,
        v => v.as_u64().ok_or("tick_ms must be a non-negative integer")?,
    };

    let inputs = &val["inputs"];
    if !inputs.is_null() && !inputs.is_object() {
        return Err("inputs must be an object".into());
    }

    Ok(ConfigDraft {
        dataset: string("dataset", defaults.dataset)?,
        export: string("export", defaults.export)?,
        tick_ms,
        hp: parse_field(&inputs["hp"], "hp", defaults.hp)?,
        wt: parse_field(&inputs["wt"], "wt", defaults.wt)?,
        disp: parse_field(&inputs["disp"], "disp", defaults.disp)?,
    })
}

fn parse_field(val: &Value, name: &str, default: FieldDraft) -> Result<FieldDraft, String> {
    if val.is_null() {
        return Ok(default);
    }
    if !val.is_object() {
        return Err(format!("inputs.{name} must be an object"));
    }

    let num = |key: &str, default: f64| -> Result<f64, String> {
        match &val[key] {
            Value::Null => Ok(default),
            v => v
                .as_f64()
                .ok_or_else(|| format!("inputs.{name}.{key} must be a number")),
        }
    };

    Ok(FieldDraft {
        min: num("min", default.min)?,
        max: num("max", default.max)?,
        default: num("default", default.default)?,
        step: num("step", default.step)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(parse_config("{}").unwrap(), ConfigDraft::default());
    }

    #[test]
    fn missing_file_is_all_defaults() {
        let draft = load_config("/definitely/not/here/predictor.json").unwrap();
        assert_eq!(draft, ConfigDraft::default());
    }

    #[test]
    fn partial_keys_override_defaults() {
        let draft = parse_config(
            r#"{ "export": "out.csv", "tick_ms": 50, "inputs": { "wt": { "max": 8 } } }"#,
        )
        .unwrap();

        assert_eq!(draft.export, "out.csv");
        assert_eq!(draft.dataset, "data/mtcars.csv");
        assert_eq!(draft.tick_ms, 50);
        assert_eq!(draft.wt.max, 8.0);
        assert_eq!(draft.wt.min, 1.0);
        assert_eq!(draft.hp, ConfigDraft::default().hp);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(parse_config(r#"{ "dataset": 3 }"#).is_err());
        assert!(parse_config(r#"{ "tick_ms": -1 }"#).is_err());
        assert!(parse_config(r#"{ "inputs": { "hp": { "min": "low" } } }"#).is_err());
        assert!(parse_config("[]").is_err());
        assert!(parse_config("not json").is_err());
    }
}
