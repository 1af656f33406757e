//! The tree document: values, paths, the path-addressable store and its
//! flat export format.

pub mod export;
pub mod node;
pub mod parser;
pub mod path;
pub mod tree;

pub use export::{import_records, ExportRecord};
pub use node::{JsonNumber, JsonValue, Object};
pub use path::TreePath;
pub use tree::JsonTree;
