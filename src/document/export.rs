//! Flat export of a tree for external stores.
//!
//! Exporting turns every branch into an [`ExportRecord`] holding its path,
//! its name and its own leaf data; nested branches are represented by their
//! own records rather than inline. [`import_records`] performs the reverse,
//! rebuilding a tree from a record list.
//!
//! # Example
//!
//! ```
//! use jsontree::document::export::import_records;
//! use jsontree::document::parser::parse_json;
//! use jsontree::document::tree::JsonTree;
//!
//! let root = parse_json(r#"{"world": {"region1": {"city1": {"pop": 100}}}}"#).unwrap();
//! let tree = JsonTree::from_value(root).unwrap();
//!
//! let records = tree.export_tree();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].path, "world/region1/city1");
//! assert_eq!(records[1].name, "city1");
//!
//! let rebuilt = import_records(&records).unwrap();
//! assert_eq!(rebuilt.get_branch("world/region1/city1"), tree.get_branch("world/region1/city1"));
//! ```

use serde::{Deserialize, Serialize};

use super::node::{JsonValue, Object};
use super::path::TreePath;
use super::tree::JsonTree;
use crate::error::{TreeError, TreeResult};

/// One exported branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Slash-delimited path of the branch
    pub path: String,
    /// Last segment of `path`
    pub name: String,
    /// The branch's own entries with nested branches removed
    pub data: Object,
}

impl JsonTree {
    /// Exports every branch, in [`get_branches`](JsonTree::get_branches)
    /// order, as a flat record list.
    pub fn export_tree(&self) -> Vec<ExportRecord> {
        self.branches()
            .map(|(path, node)| ExportRecord {
                name: path.name().unwrap_or_default().to_string(),
                path: path.to_string(),
                data: leaf_entries(node),
            })
            .collect()
    }
}

/// Copies the entries of `node` whose values are not objects.
fn leaf_entries(node: &JsonValue) -> Object {
    node.as_object()
        .map(|entries| {
            entries
                .iter()
                .filter(|(_, value)| !value.is_object())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Rebuilds a tree from export records.
///
/// Records may arrive in any order; missing intermediate branches, including
/// the top-level entry, are created empty and filled in when their own
/// record is seen. A record's leaf data is merged into its branch.
///
/// # Errors
///
/// Returns [`TreeError::InvalidData`] if a record's path has fewer than two
/// segments, its name disagrees with its path, it passes through a leaf
/// value set by an earlier record, its data holds an object, or a data key
/// names a branch built from another record.
pub fn import_records(records: &[ExportRecord]) -> TreeResult<JsonTree> {
    let mut root = Object::new();

    for record in records {
        let path = TreePath::parse(&record.path);
        if path.len() < 2 {
            return Err(TreeError::InvalidData(format!(
                "record path '{}' does not name a branch",
                record.path
            )));
        }
        if path.name() != Some(record.name.as_str()) {
            return Err(TreeError::InvalidData(format!(
                "record name '{}' does not match path '{}'",
                record.name, record.path
            )));
        }

        let mut entries = &mut root;
        for segment in path.segments() {
            let child = entries
                .entry(segment.clone())
                .or_insert_with(|| JsonValue::Object(Object::new()));
            entries = child.as_object_mut().ok_or_else(|| {
                TreeError::InvalidData(format!(
                    "record path '{}' passes through leaf '{}'",
                    record.path, segment
                ))
            })?;
        }

        for (key, value) in &record.data {
            if value.is_object() {
                return Err(TreeError::InvalidData(format!(
                    "record '{}' carries nested object '{}' in its data",
                    record.path, key
                )));
            }
            if entries.get(key).is_some_and(JsonValue::is_object) {
                return Err(TreeError::InvalidData(format!(
                    "record '{}' data key '{}' collides with branch '{}/{}'",
                    record.path, key, record.path, key
                )));
            }
            entries.insert(key.clone(), value.clone());
        }
    }

    JsonTree::from_value(JsonValue::Object(root))
}
