//! Reading and writing JSON documents.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;

/// Read a JSON document from `path`, or stdin when `path` is absent or `-`
pub fn read_document(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .wrap_err("failed to read stdin")?;
            text
        }
    };
    parse_document(&text)
}

/// Parse a JSON document
pub fn parse_document(text: &str) -> Result<Value> {
    serde_json::from_str(text).wrap_err("input is not valid JSON")
}

/// Write `value` as pretty JSON to `path`, or stdout when absent
pub fn write_document(value: &Value, path: Option<&Path>) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    match path {
        Some(path) => std::fs::write(path, text)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}
