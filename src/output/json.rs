//! JSON persistence of crawl results
//!
//! The result is written as one pretty-printed JSON array of records,
//! fully replacing any previous file.

use crate::output::traits::OutputResult;
use crate::record::Record;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Resolves `file_name` next to the running executable
///
/// Falls back to the current directory when the executable location is unknown.
pub fn default_output_path(file_name: &str) -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(file_name)
}

/// Formats records as a JSON array with four-space indentation
pub fn format_records(records: &[Record]) -> OutputResult<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes records to `path`, overwriting it
pub fn save_records(records: &[Record], path: &Path) -> OutputResult<()> {
    let json = format_records(records)?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(json.as_bytes())?;
    writer.flush()?;

    tracing::info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads records previously written by [`save_records`]
pub fn load_records(path: &Path) -> OutputResult<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
