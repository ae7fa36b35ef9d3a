//! JSON rendering for outline and ranking results.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON, four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a result to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let bytes = match format {
        JsonFormat::Pretty => {
            let mut out = Vec::new();
            let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
            value
                .serialize(&mut ser)
                .map(|_| out)
                .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?
        }
        JsonFormat::Compact => serde_json::to_vec(value)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?,
    };

    String::from_utf8(bytes).map_err(|e| Error::Render(e.to_string()))
}

/// Write a result as JSON, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    path: P,
    value: &T,
    format: JsonFormat,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut json = to_json(value, format)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
