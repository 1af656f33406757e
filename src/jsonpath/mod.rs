//! JSONPath query parser and evaluator for structural search.
//!
//! Once a tree path has located a branch node, a JSONPath expression filters
//! the node's contents. The located node is `$`.
//!
//! # Supported Syntax
//!
//! - `$` - The located node
//! - `.property` - Named property access
//! - `['property']` - Bracket notation
//! - `[index]` - Array index (supports negative indices)
//! - `[*]` or `.*` - All children (wildcard)
//! - `..property` or `..*` - Recursive descent
//! - `[start:end]` - Array slicing
//! - `['prop1','prop2']` - Multiple properties
//! - `[?(@.prop)]` - Children that have `prop`
//! - `[?(@.prop == 'x')]` - Children whose `prop` compares true
//!   (`==`, `!=`, `<`, `<=`, `>`, `>=` against numbers, strings,
//!   `true`, `false` and `null`)
//!
//! # Examples
//!
//! ```
//! use jsontree::document::parser::parse_json;
//! use jsontree::jsonpath::{JsonPathEngine, QueryEngine};
//!
//! let node = parse_json(r#"{"a": {"maker": "Honda"}, "b": {"maker": "Toyota"}}"#).unwrap();
//! let hondas = JsonPathEngine.evaluate(&node, "$[?(@.maker == 'Honda')]").unwrap();
//! assert_eq!(hondas.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{Comparison, FilterExpr, JsonPath, Literal, PathSegment};
pub use error::JsonPathError;
pub use evaluator::Evaluator;
pub use parser::Parser;

use crate::document::node::JsonValue;

/// Evaluates a query expression against a located node.
///
/// The tree store only depends on this capability, so another expression
/// language can be plugged in through
/// [`JsonTree::query_with`](crate::document::tree::JsonTree::query_with).
pub trait QueryEngine {
    fn evaluate<'a>(
        &self,
        node: &'a JsonValue,
        expression: &str,
    ) -> Result<Vec<&'a JsonValue>, JsonPathError>;
}

/// The default [`QueryEngine`], backed by [`Parser`] and [`Evaluator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathEngine;

impl QueryEngine for JsonPathEngine {
    fn evaluate<'a>(
        &self,
        node: &'a JsonValue,
        expression: &str,
    ) -> Result<Vec<&'a JsonValue>, JsonPathError> {
        let path = Parser::parse(expression)?;
        Ok(Evaluator::new(node).evaluate(&path.segments))
    }
}
