//! Path-addressable tree store.
//!
//! This module provides the `JsonTree` type, which holds a nested JSON object
//! and addresses its branch nodes with slash-delimited paths such as
//! `world/region1/city1`. Every public operation first resolves its path(s);
//! only when resolution succeeds does it read, mutate or query the tree.
//!
//! The root object's top-level key names the tree. Top-level entries are the
//! tree's identity: they resolve like any other branch but can never be
//! deleted or moved away, and they are not reported as branches.
//!
//! # Example
//!
//! ```
//! use jsontree::document::parser::parse_json;
//! use jsontree::document::tree::JsonTree;
//!
//! let root = parse_json(r#"{"world": {"region1": {"city1": {"pop": 100}}}}"#).unwrap();
//! let mut tree = JsonTree::from_value(root).unwrap();
//!
//! assert_eq!(tree.tree_name(), "world");
//! assert_eq!(tree.get_branches(), vec!["world/region1", "world/region1/city1"]);
//!
//! let city2 = parse_json(r#"{"city2": {"pop": 50}}"#).unwrap();
//! assert!(tree.append_branch("world/region1", city2));
//! assert!(tree.get_branch("world/region1/city2").is_some());
//!
//! assert!(tree.delete_branch("world/region1/city2"));
//! assert!(tree.get_branch("world/region1/city2").is_none());
//! ```

use tracing::{debug, instrument};

use super::node::{JsonValue, Object};
use super::path::{self, TreePath};
use crate::error::{TreeError, TreeResult};
use crate::jsonpath::{JsonPathEngine, QueryEngine};

/// An in-memory tree of nested JSON objects addressed by slash-delimited paths.
///
/// The root is always an object. The store exclusively owns its data; a
/// mutating call may invalidate any reference previously handed out, which
/// the borrow checker enforces.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonTree {
    root: JsonValue,
    tree_name: String,
}

impl Default for JsonTree {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonTree {
    /// Creates an empty tree with an empty root object and no name.
    pub fn new() -> Self {
        Self {
            root: JsonValue::Object(Object::new()),
            tree_name: String::new(),
        }
    }

    /// Creates a tree from a root value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidData`] if `root` is not an object.
    pub fn from_value(root: JsonValue) -> TreeResult<Self> {
        let mut tree = Self::new();
        tree.set_tree(root)?;
        Ok(tree)
    }

    /// Installs a new root. The tree name becomes the root's first key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidData`] if `root` is not an object; the
    /// current tree is kept in that case.
    pub fn set_tree(&mut self, root: JsonValue) -> TreeResult<()> {
        let name = match root.as_object() {
            Some(entries) => entries.keys().next().cloned().unwrap_or_default(),
            None => {
                return Err(TreeError::InvalidData(format!(
                    "tree root must be an object, found {}",
                    root.type_name()
                )))
            }
        };
        debug!(tree_name = %name, "installed tree");
        self.root = root;
        self.tree_name = name;
        Ok(())
    }

    /// The tree's name: the root's first top-level key, or "" if it has none.
    pub fn tree_name(&self) -> &str {
        &self.tree_name
    }

    /// The live root object.
    pub fn tree(&self) -> &JsonValue {
        &self.root
    }

    /// Consumes the store and returns its root object.
    pub fn into_value(self) -> JsonValue {
        self.root
    }

    /// Walks `path` from the root. Every step, including the last, must land
    /// on an object.
    fn resolve(&self, path: &TreePath) -> Option<&JsonValue> {
        let mut current = &self.root;
        for segment in path.segments() {
            current = current.as_object()?.get(segment)?;
            if !current.is_object() {
                return None;
            }
        }
        Some(current)
    }

    fn resolve_mut(&mut self, path: &TreePath) -> Option<&mut JsonValue> {
        let mut current = &mut self.root;
        for segment in path.segments() {
            current = current.as_object_mut()?.get_mut(segment)?;
            if !current.is_object() {
                return None;
            }
        }
        Some(current)
    }

    fn has_top_level(&self, name: &str) -> bool {
        self.root
            .as_object()
            .is_some_and(|entries| entries.contains_key(name))
    }

    fn entries_mut(&mut self, path: &TreePath) -> TreeResult<&mut Object> {
        self.resolve_mut(path)
            .and_then(JsonValue::as_object_mut)
            .ok_or_else(|| TreeError::PathNotFound(path.to_string()))
    }

    /// Returns the branch node `path` denotes, or `None` if the path does not
    /// resolve. An empty path denotes the root object.
    ///
    /// Resolution is read-only and deterministic: repeated calls return the
    /// same node until the tree is mutated.
    pub fn get_branch(&self, path: &str) -> Option<&JsonValue> {
        self.resolve(&TreePath::parse(path))
    }

    /// Mutable counterpart of [`get_branch`](Self::get_branch).
    pub fn get_branch_mut(&mut self, path: &str) -> Option<&mut JsonValue> {
        self.resolve_mut(&TreePath::parse(path))
    }

    /// True when `path` is one of the paths [`get_branches`](Self::get_branches)
    /// reports.
    pub fn has_branch(&self, path: &str) -> bool {
        let tree_path = TreePath::parse(path);
        tree_path.len() >= 2 && self.resolve(&tree_path).is_some()
    }

    /// Iterates over every branch below the top-level entries in pre-order,
    /// following each object's key order.
    pub fn branches(&self) -> Branches<'_> {
        Branches::new(&self.root)
    }

    /// Lists every branch path, freshly computed from the current tree.
    pub fn get_branches(&self) -> Vec<String> {
        self.branches().map(|(path, _)| path.to_string()).collect()
    }

    /// Sets `data`'s single key as a child of the branch at `path`,
    /// replacing any existing child of that name.
    ///
    /// # Errors
    ///
    /// - [`TreeError::InvalidData`] if `data` is not an object with exactly
    ///   one addressable key (non-empty, no `/`)
    /// - [`TreeError::PathNotFound`] if `path` does not resolve
    /// - [`TreeError::RootProtected`] if `path` is the root and the key names
    ///   an existing top-level entry
    #[instrument(level = "trace", skip(self, data))]
    pub fn try_append_branch(&mut self, path: &str, data: JsonValue) -> TreeResult<()> {
        let (name, value) = split_data_object(data)?;
        let tree_path = TreePath::parse(path);
        let entries = self.entries_mut(&tree_path)?;
        if tree_path.is_root() && entries.contains_key(&name) {
            return Err(TreeError::RootProtected(name));
        }
        entries.insert(name.clone(), value);
        debug!(path = %tree_path, %name, "appended branch");
        Ok(())
    }

    /// Boolean form of [`try_append_branch`](Self::try_append_branch).
    pub fn append_branch(&mut self, path: &str, data: JsonValue) -> bool {
        report(self.try_append_branch(path, data), "append")
    }

    /// Removes the branch at `path` and returns the detached subtree.
    ///
    /// # Errors
    ///
    /// - [`TreeError::RootProtected`] if `path` has fewer than two segments
    /// - [`TreeError::PathNotFound`] if any segment is missing or not an object
    #[instrument(level = "trace", skip(self))]
    pub fn try_delete_branch(&mut self, path: &str) -> TreeResult<JsonValue> {
        let tree_path = TreePath::parse(path);
        let (name, parent_path) = match (tree_path.name(), tree_path.parent()) {
            (Some(name), Some(parent)) if !parent.is_root() => (name.to_string(), parent),
            _ => return Err(TreeError::RootProtected(path.to_string())),
        };

        let entries = self.entries_mut(&parent_path)?;
        if !entries.get(&name).is_some_and(JsonValue::is_object) {
            return Err(TreeError::PathNotFound(tree_path.to_string()));
        }
        let removed = entries
            .shift_remove(&name)
            .ok_or_else(|| TreeError::PathNotFound(tree_path.to_string()))?;
        debug!(path = %tree_path, "deleted branch");
        Ok(removed)
    }

    /// Boolean form of [`try_delete_branch`](Self::try_delete_branch).
    pub fn delete_branch(&mut self, path: &str) -> bool {
        report(self.try_delete_branch(path), "delete")
    }

    /// Moves the branch at `from` underneath the branch at `to`, keeping its
    /// name. A same-named child of `to` is replaced.
    ///
    /// The subtree changes owner rather than being copied, and nothing is
    /// touched unless the whole move succeeds.
    ///
    /// # Errors
    ///
    /// - [`TreeError::PathNotFound`] if either path does not resolve
    /// - [`TreeError::RootProtected`] if `from` has fewer than two segments,
    ///   or `to` is the root and already has a top-level entry of that name
    /// - [`TreeError::CyclicMove`] if `to` is `from` or lies inside it
    #[instrument(level = "trace", skip(self))]
    pub fn try_move_branch(&mut self, from: &str, to: &str) -> TreeResult<()> {
        let source = TreePath::parse(from);
        let destination = TreePath::parse(to);

        if self.resolve(&source).is_none() {
            return Err(TreeError::PathNotFound(from.to_string()));
        }
        if self.resolve(&destination).is_none() {
            return Err(TreeError::PathNotFound(to.to_string()));
        }
        if source.len() < 2 {
            return Err(TreeError::RootProtected(from.to_string()));
        }
        if destination.starts_with(&source) {
            return Err(TreeError::CyclicMove {
                from: source.to_string(),
                to: destination.to_string(),
            });
        }

        let name = source
            .name()
            .map(str::to_string)
            .ok_or_else(|| TreeError::RootProtected(from.to_string()))?;
        if destination.is_root() && self.has_top_level(&name) {
            return Err(TreeError::RootProtected(name));
        }
        let subtree = self.try_delete_branch(from)?;
        // destination lies outside the detached subtree, so it still resolves
        self.entries_mut(&destination)?.insert(name, subtree);
        debug!(from = %source, to = %destination, "moved branch");
        Ok(())
    }

    /// Boolean form of [`try_move_branch`](Self::try_move_branch).
    pub fn move_branch(&mut self, from: &str, to: &str) -> bool {
        report(self.try_move_branch(from, to), "move")
    }

    /// Resolves `path` and runs a JSONPath `expression` against the node.
    ///
    /// Returns `Ok(None)` when the path does not resolve.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Query`] if the expression is malformed.
    pub fn query(&self, path: &str, expression: &str) -> TreeResult<Option<Vec<&JsonValue>>> {
        self.query_with(&JsonPathEngine, path, expression)
    }

    /// Like [`query`](Self::query) with a caller-supplied engine.
    pub fn query_with<E: QueryEngine>(
        &self,
        engine: &E,
        path: &str,
        expression: &str,
    ) -> TreeResult<Option<Vec<&JsonValue>>> {
        match self.get_branch(path) {
            Some(node) => Ok(Some(engine.evaluate(node, expression)?)),
            None => Ok(None),
        }
    }

    /// The last non-empty segment of `path`.
    pub fn get_path_name(&self, path: &str) -> Option<String> {
        path::name_of(path).map(str::to_string)
    }

    /// The text of `path` preceding its name segment.
    pub fn get_path_prefix(&self, path: &str) -> String {
        path::prefix_of(path).to_string()
    }
}

/// Splits an append payload into its single key and value.
fn split_data_object(data: JsonValue) -> TreeResult<(String, JsonValue)> {
    let entries = match data {
        JsonValue::Object(entries) => entries,
        other => {
            return Err(TreeError::InvalidData(format!(
                "expected an object with one key, found {}",
                other.type_name()
            )))
        }
    };
    if entries.len() != 1 {
        return Err(TreeError::InvalidData(format!(
            "expected exactly one key, found {}",
            entries.len()
        )));
    }
    let (name, value) = entries
        .into_iter()
        .next()
        .ok_or_else(|| TreeError::InvalidData("expected exactly one key".to_string()))?;
    if name.is_empty() || name.contains(path::SEPARATOR) {
        return Err(TreeError::InvalidData(format!(
            "key '{}' cannot be addressed by a path",
            name
        )));
    }
    Ok((name, value))
}

fn report<T>(result: TreeResult<T>, operation: &str) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            debug!(error = %e, "{} rejected", operation);
            false
        }
    }
}

/// Pre-order iterator over the branches of a tree, yielding each branch's
/// path together with the node.
///
/// Produced by [`JsonTree::branches`].
#[derive(Debug)]
pub struct Branches<'a> {
    stack: Vec<(TreePath, &'a JsonValue)>,
}

impl<'a> Branches<'a> {
    fn new(root: &'a JsonValue) -> Self {
        let mut branches = Self { stack: Vec::new() };
        branches.push_children(&TreePath::default(), root);
        branches
    }

    fn push_children(&mut self, path: &TreePath, node: &'a JsonValue) {
        if let Some(entries) = node.as_object() {
            // reversed so the first key is popped first
            for (key, child) in entries.iter().rev() {
                if child.is_object() {
                    self.stack.push((path.child(key), child));
                }
            }
        }
    }
}

impl<'a> Iterator for Branches<'a> {
    type Item = (TreePath, &'a JsonValue);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (path, node) = self.stack.pop()?;
            self.push_children(&path, node);
            if path.len() >= 2 {
                return Some((path, node));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_json;

    fn world() -> JsonTree {
        let root = parse_json(
            r#"{"world": {
                "region1": {"city1": {"pop": 100}, "tags": ["a", "b"]},
                "region2": {"city3": {"pop": 7, "districts": {"north": {}}}},
                "motto": "hello"
            }}"#,
        )
        .unwrap();
        JsonTree::from_value(root).unwrap()
    }

    fn data(json: &str) -> JsonValue {
        parse_json(json).unwrap()
    }

    #[test]
    fn test_new_tree_is_empty() {
        let tree = JsonTree::new();
        assert_eq!(tree.tree_name(), "");
        assert!(tree.get_branches().is_empty());
        assert!(tree.get_branch("").is_some());
    }

    #[test]
    fn test_set_tree_rejects_non_object() {
        let mut tree = world();
        let result = tree.set_tree(JsonValue::Array(vec![]));
        assert!(matches!(result, Err(TreeError::InvalidData(_))));
        assert_eq!(tree.tree_name(), "world");
    }

    #[test]
    fn test_resolve_root_variants() {
        let tree = world();
        assert_eq!(tree.get_branch(""), Some(tree.tree()));
        assert_eq!(tree.get_branch("///"), Some(tree.tree()));
    }

    #[test]
    fn test_resolve_ignores_redundant_separators() {
        let tree = world();
        assert_eq!(
            tree.get_branch("/world//region1/city1/"),
            tree.get_branch("world/region1/city1")
        );
        assert!(tree.get_branch("world/region1/city1").is_some());
    }

    #[test]
    fn test_resolve_rejects_leaves() {
        let tree = world();
        assert!(tree.get_branch("world/motto").is_none());
        assert!(tree.get_branch("world/region1/tags").is_none());
        assert!(tree.get_branch("world/region1/city1/pop").is_none());
        assert!(tree.get_branch("world/nowhere").is_none());
        assert!(tree.get_branch("world/motto/deeper").is_none());
    }

    #[test]
    fn test_branches_pre_order() {
        let tree = world();
        assert_eq!(
            tree.get_branches(),
            vec![
                "world/region1",
                "world/region1/city1",
                "world/region2",
                "world/region2/city3",
                "world/region2/city3/districts",
                "world/region2/city3/districts/north",
            ]
        );
    }

    #[test]
    fn test_has_branch() {
        let tree = world();
        assert!(tree.has_branch("world/region1"));
        assert!(!tree.has_branch("world"));
        assert!(!tree.has_branch("world/motto"));
    }

    #[test]
    fn test_append_overwrites_existing_child() {
        let mut tree = world();
        assert!(tree.append_branch("world/region1", data(r#"{"city1": {"pop": 1}}"#)));
        assert_eq!(
            tree.get_branch("world/region1/city1"),
            Some(&data(r#"{"pop": 1}"#))
        );
    }

    #[test]
    fn test_append_leaf_value() {
        let mut tree = world();
        assert!(tree.append_branch("world/region1/city1", data(r#"{"mayor": "Ada"}"#)));
        assert!(tree.get_branch("world/region1/city1/mayor").is_none());
        assert_eq!(
            tree.get_branch("world/region1/city1"),
            Some(&data(r#"{"pop": 100, "mayor": "Ada"}"#))
        );
    }

    #[test]
    fn test_append_rejects_bad_data() {
        let mut tree = world();
        let before = tree.clone();
        for bad in [r#"{}"#, r#"{"a": 1, "b": 2}"#, r#"[1]"#, r#""x""#, r#"{"": 1}"#, r#"{"a/b": 1}"#] {
            let result = tree.try_append_branch("world", data(bad));
            assert!(matches!(result, Err(TreeError::InvalidData(_))), "{}", bad);
        }
        assert_eq!(tree, before);
    }

    #[test]
    fn test_append_missing_path() {
        let mut tree = world();
        let result = tree.try_append_branch("world/nowhere", data(r#"{"a": {}}"#));
        assert_eq!(result, Err(TreeError::PathNotFound("world/nowhere".to_string())));
    }

    #[test]
    fn test_delete_returns_subtree() {
        let mut tree = world();
        let removed = tree.try_delete_branch("world/region2/city3").unwrap();
        assert!(removed.as_object().unwrap().contains_key("districts"));
        assert!(tree.get_branch("world/region2/city3").is_none());
        assert!(tree.get_branch("world/region2").is_some());
    }

    #[test]
    fn test_delete_root_protected() {
        let mut tree = world();
        let before = tree.clone();
        assert!(matches!(
            tree.try_delete_branch("world"),
            Err(TreeError::RootProtected(_))
        ));
        assert!(matches!(
            tree.try_delete_branch("/"),
            Err(TreeError::RootProtected(_))
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_delete_rejects_leaf_and_missing() {
        let mut tree = world();
        assert!(!tree.delete_branch("world/motto"));
        assert!(!tree.delete_branch("world/region1/tags"));
        assert!(!tree.delete_branch("world/none/city1"));
        assert!(tree.get_branch("world").unwrap().as_object().unwrap().contains_key("motto"));
    }

    #[test]
    fn test_delete_keeps_sibling_order() {
        let mut tree = world();
        tree.append_branch("world", data(r#"{"region3": {}}"#));
        assert!(tree.delete_branch("world/region1"));
        let keys: Vec<&String> = tree
            .get_branch("world")
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, vec!["region2", "motto", "region3"]);
    }

    #[test]
    fn test_move_branch() {
        let mut tree = world();
        let original = tree.get_branch("world/region2/city3").cloned();
        assert!(tree.move_branch("world/region2/city3", "world/region1"));
        assert!(tree.get_branch("world/region2/city3").is_none());
        assert_eq!(tree.get_branch("world/region1/city3").cloned(), original);
    }

    #[test]
    fn test_move_to_top_level_destination() {
        let mut tree = world();
        assert!(tree.move_branch("world/region1/city1", "world"));
        assert!(tree.has_branch("world/city1"));
    }

    #[test]
    fn test_move_into_own_subtree_rejected() {
        let mut tree = world();
        let before = tree.clone();
        assert!(matches!(
            tree.try_move_branch("world/region2", "world/region2/city3"),
            Err(TreeError::CyclicMove { .. })
        ));
        assert!(matches!(
            tree.try_move_branch("world/region2", "/world/region2/"),
            Err(TreeError::CyclicMove { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_root_level_rejected() {
        let mut tree = world();
        let before = tree.clone();
        assert!(matches!(
            tree.try_move_branch("world", "world/region1"),
            Err(TreeError::RootProtected(_))
        ));
        assert!(!tree.move_branch("", "world/region1"));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_root_destination_cannot_replace_top_level_entry() {
        let mut tree = world();
        tree.append_branch("world/region1", data(r#"{"world": {"x": 1}}"#));
        let before = tree.clone();

        assert!(matches!(
            tree.try_move_branch("world/region1/world", ""),
            Err(TreeError::RootProtected(_))
        ));
        assert!(matches!(
            tree.try_append_branch("", data(r#"{"world": 1}"#)),
            Err(TreeError::RootProtected(_))
        ));
        assert!(!tree.append_branch("/", data(r#"{"world": {}}"#)));
        assert_eq!(tree, before);
        assert_eq!(tree.tree_name(), "world");
    }

    #[test]
    fn test_root_destination_accepts_new_top_level_entry() {
        let mut tree = world();
        assert!(tree.move_branch("world/region2", ""));
        assert!(tree.has_branch("region2/city3"));
        assert!(tree.append_branch("", data(r#"{"atlas": {"page": {}}}"#)));
        assert!(tree.has_branch("atlas/page"));
        assert_eq!(tree.tree_name(), "world");
    }

    #[test]
    fn test_move_missing_endpoints() {
        let mut tree = world();
        assert!(matches!(
            tree.try_move_branch("world/none", "world/region1"),
            Err(TreeError::PathNotFound(_))
        ));
        assert!(matches!(
            tree.try_move_branch("world/region1", "world/motto"),
            Err(TreeError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_move_into_current_parent_keeps_node() {
        let mut tree = world();
        assert!(tree.move_branch("world/region1/city1", "world/region1"));
        assert!(tree.has_branch("world/region1/city1"));
    }

    #[test]
    fn test_query_unresolved_path() {
        let tree = world();
        assert_eq!(tree.query("world/nowhere", "$").unwrap(), None);
    }

    #[test]
    fn test_query_forwards_to_engine() {
        let tree = world();
        let results = tree.query("world", "$..pop").unwrap().unwrap();
        assert_eq!(results, vec![&JsonValue::from(100i64), &JsonValue::from(7i64)]);
    }

    #[test]
    fn test_query_malformed_expression() {
        let tree = world();
        assert!(matches!(
            tree.query("world", "pop"),
            Err(TreeError::Query(_))
        ));
    }

    #[test]
    fn test_path_name_and_prefix() {
        let tree = world();
        assert_eq!(tree.get_path_name("world/region1/city1"), Some("city1".to_string()));
        assert_eq!(tree.get_path_name("/"), None);
        assert_eq!(tree.get_path_prefix("world/region1/city1"), "world/region1");
    }
}
