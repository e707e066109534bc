//! JSON I/O for the CLI
//!
//! - Input: one JSON document per file
//! - Output: one JSON value per line
//! - UTF-8 only

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a file whose top-level value must be an array
pub fn read_json_array(path: &Path) -> CliResult<Vec<Value>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Array(items) => Ok(items),
        other => Err(CliError::invalid_input(format!(
            "{} must hold a JSON array, found {}",
            path.display(),
            json_kind(&other)
        ))),
    }
}

/// Write `value` as a single line
pub fn write_json_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
