use crate::errors::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Pretty-print `value` to `output_file`, or stdout when absent.
pub fn output_json<T: Serialize>(value: &T, output_file: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(path) = output_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
    } else {
        println!("{json}");
    }
    Ok(())
}
