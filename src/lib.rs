//! jsontree - a path-addressable in-memory JSON tree store.
//!
//! A [`JsonTree`] holds one nested JSON object and addresses its branch
//! nodes with slash-delimited paths (`world/region1/city1`). Branches can be
//! read, appended, deleted, moved, enumerated, exported as flat records and
//! queried with JSONPath expressions.

pub mod config;
pub mod document;
pub mod error;
pub mod file;
pub mod jsonpath;
pub mod logging;

pub use document::{ExportRecord, JsonTree, JsonValue, TreePath};
pub use error::{TreeError, TreeResult};
pub use file::saver::{pretty_format, pretty_print};
