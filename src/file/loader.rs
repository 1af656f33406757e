//! JSON file loading functionality.
//!
//! This module provides functions to load JSON documents from files or stdin
//! into `JsonTree` stores. Reading and parsing failures come back as errors;
//! callers that already hold a tree keep it untouched.

use crate::document::export::{import_records, ExportRecord};
use crate::document::parser::parse_json;
use crate::document::tree::JsonTree;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Loads and parses a JSON file from the filesystem.
///
/// Files ending in `.gz` are decompressed first. The document's root must be
/// an object; its first key becomes the tree name.
///
/// # Examples
///
/// ```no_run
/// use jsontree::file::loader::load_json_file;
///
/// let tree = load_json_file("world.json").unwrap();
/// println!("{}", tree.tree_name());
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist or cannot be read
/// - The file is gzipped but corrupted
/// - The file contents are not valid JSON
/// - The JSON root is not an object
pub fn load_json_file<P: AsRef<Path>>(path: P) -> Result<JsonTree> {
    let path_ref = path.as_ref();
    let content = read_content(path_ref)?;
    let tree = parse_tree(&content)
        .with_context(|| format!("Failed to load {}", path_ref.display()))?;
    tracing::info!(path = %path_ref.display(), tree_name = tree.tree_name(), "loaded tree");
    Ok(tree)
}

/// Loads and parses JSON from standard input.
///
/// Gzip-compressed input is detected by its magic bytes and decompressed.
///
/// # Errors
///
/// This function will return an error if:
/// - Reading from stdin fails
/// - The input is not valid UTF-8 or valid JSON
/// - The JSON root is not an object
pub fn load_json_from_stdin() -> Result<JsonTree> {
    let content = decode_bytes(read_stdin()?)?;
    parse_tree(&content).context("Failed to parse JSON from stdin")
}

/// Loads export records from standard input and rebuilds their tree.
///
/// Gzip-compressed input is detected the same way as in
/// [`load_json_from_stdin`].
pub fn load_export_from_stdin() -> Result<JsonTree> {
    let content = decode_bytes(read_stdin()?)?;
    parse_export_records(&content).context("Failed to import records from stdin")
}

fn read_stdin() -> Result<Vec<u8>> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

/// Loads a file of export records (as written by `export`) and rebuilds the
/// tree they describe.
pub fn load_export_file<P: AsRef<Path>>(path: P) -> Result<JsonTree> {
    let path_ref = path.as_ref();
    let content = read_content(path_ref)?;
    parse_export_records(&content)
        .with_context(|| format!("Failed to import records from {}", path_ref.display()))
}

/// Parses export records from JSON text and rebuilds their tree.
pub fn parse_export_records(content: &str) -> Result<JsonTree> {
    let records: Vec<ExportRecord> =
        serde_json::from_str(content).context("Invalid export records")?;
    Ok(import_records(&records)?)
}

/// Parses JSON text into a tree.
pub fn parse_tree(content: &str) -> Result<JsonTree> {
    let root = parse_json(content)?;
    Ok(JsonTree::from_value(root)?)
}

/// Reads a file to a string, decompressing `.gz` files.
fn read_content(path: &Path) -> Result<String> {
    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    if is_gzipped {
        read_gzipped_file(path)
    } else {
        fs::read_to_string(path).context("Failed to read file")
    }
}

/// Reads and decompresses a gzipped file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The file is not valid gzip format (corrupted)
/// - The decompressed content is not valid UTF-8
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Turns raw input bytes into text, gunzipping when the gzip magic
/// bytes (0x1f 0x8b) are present.
fn decode_bytes(bytes: Vec<u8>) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    if !bytes.starts_with(&[0x1f, 0x8b]) {
        return String::from_utf8(bytes).context("Invalid UTF-8 in input");
    }

    let mut decoder = GzDecoder::new(bytes.as_slice());
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_sets_name() {
        let tree = parse_tree(r#"{"world": {"region1": {}}}"#).unwrap();
        assert_eq!(tree.tree_name(), "world");
    }

    #[test]
    fn test_parse_tree_rejects_array_root() {
        let result = parse_tree("[1, 2, 3]");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("tree root must be an object"));
    }

    #[test]
    fn test_decode_plain_bytes() {
        let text = decode_bytes(br#"{"a": {}}"#.to_vec()).unwrap();
        assert_eq!(text, r#"{"a": {}}"#);
    }

    #[test]
    fn test_decode_gzip_bytes() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"a": {"b": {}}}"#).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode_bytes(compressed).unwrap(), r#"{"a": {"b": {}}}"#);
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert!(decode_bytes(vec![0xff, 0xfe, 0xfd]).is_err());
    }

    #[test]
    fn test_read_gzipped_file_corrupted() {
        use tempfile::NamedTempFile;

        let temp_file = NamedTempFile::new().unwrap();
        let gz_path = temp_file.path().with_extension("json.gz");
        fs::write(&gz_path, b"not gzip data").unwrap();

        let result = read_gzipped_file(&gz_path);
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("decompress") || err_msg.contains("corrupted"));
        let _ = fs::remove_file(&gz_path);
    }

    #[test]
    fn test_gzipped_export_records_decode() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(br#"[{"path": "w/a", "name": "a", "data": {"n": 1}}]"#)
            .unwrap();
        let content = decode_bytes(encoder.finish().unwrap()).unwrap();

        let tree = parse_export_records(&content).unwrap();
        assert_eq!(tree.get_branches(), vec!["w/a"]);
    }

    #[test]
    fn test_parse_export_records() {
        let tree = parse_export_records(
            r#"[{"path": "world/region1", "name": "region1", "data": {"pop": 5}}]"#,
        )
        .unwrap();
        assert_eq!(tree.tree_name(), "world");
        assert!(tree.has_branch("world/region1"));
    }
}
