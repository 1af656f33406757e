//! Abstract syntax tree types for JSONPath expressions.

/// A segment in a JSONPath expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Root node ($)
    Root,
    /// Named child (.property or ['property'])
    Child(String),
    /// Array index ([0], [-1])
    Index(isize),
    /// Wildcard (* or [*]) - all children
    Wildcard,
    /// Recursive descent (.. or ..property)
    RecursiveDescent(Option<String>),
    /// Array slice ([start:end])
    Slice(Option<isize>, Option<isize>),
    /// Multiple properties (['prop1','prop2'])
    MultiProperty(Vec<String>),
    /// Filter over children ([?(@.price < 10)])
    Filter(FilterExpr),
}

/// A filter predicate applied to each child of the current node.
///
/// `target` is the chain of property names after `@`; an empty chain means
/// the child itself. Without a comparison the filter tests for existence.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    pub target: Vec<String>,
    pub comparison: Option<(Comparison, Literal)>,
}

/// Comparison operators usable inside a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Literal operand on the right-hand side of a filter comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// A complete JSONPath expression.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    /// Segments that make up the path.
    pub segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates a new JSONPath with the given segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}
