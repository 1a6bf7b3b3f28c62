//! Declarative preference presets.
//!
//! A preset is a TOML file whose `[prefs]` table maps preference keys to
//! typed values. Table order is preserved, so the merge applies entries in
//! the order they are written and new keys land in the override file in
//! first-seen order. Only booleans, integers, and strings are expressible
//! in the override grammar; anything else is rejected up front rather than
//! silently skipped.

use std::fs;
use std::path::Path;

use toml::Value;

use crate::error::{Error, Result};
use crate::prefs::PrefValue;

/// An ordered batch of preference overrides to apply in one run.
#[derive(Debug, Clone, Default)]
pub struct Preset {
    pub entries: Vec<(String, PrefValue)>,
}

/// Loads a preset from a TOML file.
pub fn load_preset(path: &Path) -> Result<Preset> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let table: toml::Table = text.parse().map_err(|e: toml::de::Error| Error::PresetParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let prefs = match table.get("prefs") {
        Some(Value::Table(prefs)) => prefs,
        Some(other) => {
            return Err(Error::PresetParse {
                path: path.to_path_buf(),
                message: format!("`prefs` must be a table, found {}", other.type_str()),
            })
        }
        None => {
            return Err(Error::PresetParse {
                path: path.to_path_buf(),
                message: "missing `[prefs]` table".into(),
            })
        }
    };

    let mut entries = Vec::with_capacity(prefs.len());
    for (key, value) in prefs {
        entries.push((key.clone(), convert(key, value)?));
    }
    Ok(Preset { entries })
}

fn convert(key: &str, value: &Value) -> Result<PrefValue> {
    match value {
        Value::Boolean(b) => Ok(PrefValue::Bool(*b)),
        Value::Integer(n) => Ok(PrefValue::Int(*n)),
        Value::String(s) => Ok(PrefValue::Str(s.clone())),
        other => Err(Error::UnsupportedValue {
            key: key.to_string(),
            found: other.type_str(),
        }),
    }
}
