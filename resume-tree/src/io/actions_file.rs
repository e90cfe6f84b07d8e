//! Reading producer-emitted action lists from disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Load raw action values from a JSON file.
///
/// Accepts a bare array, an object wrapping the array under `actions`, or a
/// single action object. Individual entries are not validated here.
pub fn load_actions(path: &Path) -> Result<Vec<Value>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read actions {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse actions {}", path.display()))?;
    unwrap_actions(value).with_context(|| format!("actions file {}", path.display()))
}

fn unwrap_actions(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(actions) => Ok(actions),
        Value::Object(mut object) => match object.remove("actions") {
            Some(Value::Array(actions)) => Ok(actions),
            Some(_) => bail!("'actions' must be an array"),
            None => Ok(vec![Value::Object(object)]),
        },
        _ => bail!("expected a JSON array of actions"),
    }
}
