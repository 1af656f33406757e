//! JSON formatting and file saving.
//!
//! This module formats `JsonValue`s as text (indented or compact) and saves
//! trees to files with atomic write operations and optional backups.

use crate::config::Config;
use crate::document::node::JsonValue;
use crate::document::tree::JsonTree;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};

/// Formats a value as indented JSON.
///
/// Every non-empty object and array is broken over multiple lines, with
/// `indent` spaces per nesting level; empty containers print as `{}` / `[]`.
///
/// # Example
///
/// ```
/// use jsontree::document::parser::parse_json;
/// use jsontree::file::saver::pretty_format;
///
/// let value = parse_json(r#"{"pop": 100, "tags": []}"#).unwrap();
/// assert_eq!(pretty_format(&value, 2), "{\n  \"pop\": 100,\n  \"tags\": []\n}");
/// ```
pub fn pretty_format(value: &JsonValue, indent: usize) -> String {
    try_pretty_format(value, indent).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to format value");
        String::new()
    })
}

/// Fallible form of [`pretty_format`].
pub fn try_pretty_format(value: &JsonValue, indent: usize) -> serde_json::Result<String> {
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Prints a value to stdout using the default two-space indentation.
pub fn pretty_print(value: &JsonValue) {
    println!("{}", pretty_format(value, 2));
}

/// Serializes a value to a compact single-line string.
pub fn serialize_compact(value: &JsonValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize value");
        String::new()
    })
}

/// Saves a tree to a file with optional backup creation.
///
/// The tree is pretty-printed with `config.indent_size` and written
/// atomically (temp file, then rename). Targets ending in `.gz`, or any
/// target when `config.compress_output` is set, are gzip-compressed.
///
/// # Examples
///
/// ```no_run
/// use jsontree::config::Config;
/// use jsontree::document::tree::JsonTree;
/// use jsontree::file::saver::save_json_file;
///
/// let tree = JsonTree::new();
/// save_json_file("output.json", &tree, &Config::default()).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - Backup creation fails (if requested)
/// - Writing to the temp file fails
/// - Renaming the temp file to the target fails
pub fn save_json_file<P: AsRef<Path>>(path: P, tree: &JsonTree, config: &Config) -> Result<()> {
    save_value(path, tree.tree(), config)
}

/// Saves any value (a tree root, export records, query results) to a file.
pub fn save_value<P: AsRef<Path>>(path: P, value: &JsonValue, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let should_compress = config.compress_output || path.to_string_lossy().ends_with(".gz");

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let mut json_str =
        try_pretty_format(value, config.indent_size).context("Failed to serialize JSON")?;
    json_str.push('\n');

    write_file_atomic(path, json_str.as_bytes(), should_compress)?;
    tracing::info!(path = %path.display(), compressed = should_compress, "saved file");

    Ok(())
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Writes data to a file atomically, optionally compressing with gzip.
///
/// The data goes to `<name>.tmp` beside the target first and is renamed over
/// it; the temp file is removed if any step fails.
///
/// # Errors
///
/// Returns an error if:
/// - Creating the temp file fails
/// - Writing or compressing fails
/// - Renaming the temp file fails
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, data, compress)
        .and_then(|()| fs::rename(&temp_path, path).context("Failed to rename temp file"));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp(temp_path: &Path, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    if compress {
        let file = fs::File::create(temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(temp_path, data).context("Failed to write temp file")?;
    }
    Ok(())
}

/// `world.json` -> `world.json.tmp`, so the temp file never equals the target.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
