//! Reading definition and value files.

use std::path::Path;

use bpconsole_parameters::{load_definitions, FormSession, ParameterDefinition};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CommandError;

fn read(path: &Path) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a YAML list of parameter definitions.
pub fn read_definitions(path: &Path) -> Result<Vec<ParameterDefinition>, CommandError> {
    let definitions = load_definitions(&read(path)?)?;
    debug!(path = %path.display(), count = definitions.len(), "loaded definitions");
    Ok(definitions)
}

/// Load a YAML mapping of field names to values. An empty file is an empty
/// mapping.
pub fn read_values(path: &Path) -> Result<Map<String, Value>, CommandError> {
    let text = read(path)?;
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: Value = serde_yaml_ng::from_str(&text).map_err(|source| CommandError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(CommandError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Apply every entry of `values` to `session`, marking each one touched.
pub fn fill_session(session: &mut FormSession, values: Map<String, Value>) {
    for (name, value) in values {
        session.set_json_value(name.clone(), value);
        session.touch(name);
    }
}
