//! JSON tree dumps for tooling and golden-file tests.

use serde_json::Value;

use super::Program;

/// Controls the shape of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Keep `position` members. Golden comparisons usually turn this off.
    pub positions: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self { positions: true }
    }
}

impl DumpOptions {
    pub fn without_positions() -> Self {
        Self { positions: false }
    }
}

/// Serializes `program` into a JSON value.
pub fn to_json(program: &Program, options: &DumpOptions) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(program)?;
    if !options.positions {
        strip_positions(&mut value);
    }
    Ok(value)
}

/// Renders `program` as JSON text, indented unless `compact` is set.
pub fn to_json_string(
    program: &Program,
    options: &DumpOptions,
    compact: bool,
) -> Result<String, serde_json::Error> {
    let value = to_json(program, options)?;
    if compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    }
}

/// Removes every `position` member, recursively.
pub fn strip_positions(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("position");
            for child in map.values_mut() {
                strip_positions(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_positions(item);
            }
        }
        _ => {}
    }
}
