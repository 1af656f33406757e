//! Slash-delimited tree paths.
//!
//! A tree path such as `world/region1/city1` addresses a branch node by the
//! chain of object keys leading to it from the root. Empty segments are
//! discarded, so `/world//region1/` and `world/region1` denote the same node,
//! and a path with no non-empty segments denotes the root itself.
//!
//! # Example
//!
//! ```
//! use jsontree::document::path::TreePath;
//!
//! let path = TreePath::parse("/world//region1/city1/");
//! assert_eq!(path.segments(), &["world", "region1", "city1"]);
//! assert_eq!(path.name(), Some("city1"));
//! assert_eq!(path.to_string(), "world/region1/city1");
//! assert!(TreePath::parse("//").is_root());
//! ```

use std::fmt;

/// Segment separator used by tree paths.
pub const SEPARATOR: char = '/';

/// A canonical tree path: the ordered, non-empty segments of a path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    /// Parses a path string, dropping leading, trailing and repeated separators.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Creates a path from already-split segments. Empty segments are dropped.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|segment: &String| !segment.is_empty())
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the path denotes the root (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the path names one of the root's own top-level keys.
    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }

    /// The last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path of the enclosing branch, or `None` for the root.
    pub fn parent(&self) -> Option<TreePath> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self {
            segments: parent.to_vec(),
        })
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: &str) -> TreePath {
        let mut child = self.clone();
        child.push(segment);
        child
    }

    pub fn push(&mut self, segment: &str) {
        if !segment.is_empty() {
            self.segments.push(segment.to_string());
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// True when `self` equals `ancestor` or lies underneath it.
    ///
    /// ```
    /// use jsontree::document::path::TreePath;
    ///
    /// let source = TreePath::parse("world/region1");
    /// assert!(TreePath::parse("world/region1/city1").starts_with(&source));
    /// assert!(TreePath::parse("world/region1").starts_with(&source));
    /// assert!(!TreePath::parse("world/region10").starts_with(&source));
    /// ```
    pub fn starts_with(&self, ancestor: &TreePath) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl From<&str> for TreePath {
    fn from(path: &str) -> Self {
        TreePath::parse(path)
    }
}

/// Returns the last non-empty segment of `path`, or `None` if it has none.
pub fn name_of(path: &str) -> Option<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).last()
}

/// Returns the text of `path` that precedes its name segment.
///
/// Trailing separators are removed from both the path and the result, so
/// the prefix of `world/region1/city1` is `world/region1`. A leading
/// separator is kept as written. Paths without a name yield an empty prefix.
pub fn prefix_of(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    match name_of(trimmed) {
        Some(name) => trimmed[..trimmed.len() - name.len()].trim_end_matches(SEPARATOR),
        None => "",
    }
}
