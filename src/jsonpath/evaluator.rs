use std::cmp::Ordering;

use super::ast::{Comparison, FilterExpr, Literal, PathSegment};
use crate::document::node::JsonValue;

/// Evaluates parsed JSONPath segments against a node.
///
/// The node handed to [`Evaluator::new`] plays the role of `$`.
pub struct Evaluator<'a> {
    root: &'a JsonValue,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a JsonValue) -> Self {
        Evaluator { root }
    }

    /// Evaluates a JSONPath query and returns the matching values in
    /// document order.
    pub fn evaluate(&self, segments: &[PathSegment]) -> Vec<&'a JsonValue> {
        if segments.is_empty() {
            return vec![];
        }

        let mut current: Vec<&'a JsonValue> = vec![self.root];

        for segment in segments {
            let mut next = Vec::new();
            for node in &current {
                next.extend(self.evaluate_segment(node, segment));
            }
            current = next;
        }

        current
    }

    fn evaluate_segment(&self, node: &'a JsonValue, segment: &PathSegment) -> Vec<&'a JsonValue> {
        match segment {
            PathSegment::Root => vec![self.root],
            PathSegment::Child(name) => self.find_child(node, name),
            PathSegment::Index(idx) => self.get_array_element(node, *idx),
            PathSegment::Wildcard => self.get_all_children(node),
            PathSegment::RecursiveDescent(prop) => self.recursive_descent(node, prop.as_deref()),
            PathSegment::Slice(start, end) => self.get_slice(node, *start, *end),
            PathSegment::MultiProperty(props) => {
                let mut results = Vec::new();
                for prop in props {
                    results.extend(self.find_child(node, prop));
                }
                results
            }
            PathSegment::Filter(filter) => self
                .get_all_children(node)
                .into_iter()
                .filter(|child| matches_filter(child, filter))
                .collect(),
        }
    }

    fn find_child(&self, node: &'a JsonValue, name: &str) -> Vec<&'a JsonValue> {
        match node {
            JsonValue::Object(props) => props.get(name).into_iter().collect(),
            _ => vec![],
        }
    }

    fn get_array_element(&self, node: &'a JsonValue, idx: isize) -> Vec<&'a JsonValue> {
        if let JsonValue::Array(items) = node {
            let len = items.len() as isize;
            let normalized_idx = if idx < 0 { len + idx } else { idx };

            if normalized_idx >= 0 && normalized_idx < len {
                return vec![&items[normalized_idx as usize]];
            }
        }
        vec![]
    }

    fn get_all_children(&self, node: &'a JsonValue) -> Vec<&'a JsonValue> {
        match node {
            JsonValue::Object(props) => props.values().collect(),
            JsonValue::Array(items) => items.iter().collect(),
            _ => vec![],
        }
    }

    fn get_slice(
        &self,
        node: &'a JsonValue,
        start: Option<isize>,
        end: Option<isize>,
    ) -> Vec<&'a JsonValue> {
        if let JsonValue::Array(items) = node {
            let len = items.len() as isize;

            let start_idx = match start {
                Some(s) if s < 0 => (len + s).max(0) as usize,
                Some(s) => s.min(len) as usize,
                None => 0,
            };

            let end_idx = match end {
                Some(e) if e < 0 => (len + e).max(0) as usize,
                Some(e) => e.min(len) as usize,
                None => len as usize,
            };

            if start_idx <= end_idx {
                return items[start_idx..end_idx].iter().collect();
            }
        }
        vec![]
    }

    fn recursive_descent(&self, node: &'a JsonValue, prop: Option<&str>) -> Vec<&'a JsonValue> {
        fn walk<'a>(node: &'a JsonValue, prop: Option<&str>, results: &mut Vec<&'a JsonValue>) {
            match node {
                JsonValue::Object(props) => {
                    for (key, child) in props {
                        if prop.map_or(true, |name| key == name) {
                            results.push(child);
                        }
                        walk(child, prop, results);
                    }
                }
                JsonValue::Array(items) => {
                    for item in items {
                        if prop.is_none() {
                            results.push(item);
                        }
                        walk(item, prop, results);
                    }
                }
                _ => {}
            }
        }

        let mut results = Vec::new();
        walk(node, prop, &mut results);
        results
    }
}

/// Tests one child against a filter expression.
fn matches_filter(child: &JsonValue, filter: &FilterExpr) -> bool {
    let mut target = child;
    for name in &filter.target {
        match target.as_object().and_then(|props| props.get(name)) {
            Some(value) => target = value,
            None => return false,
        }
    }

    match &filter.comparison {
        None => true,
        Some((op, literal)) => compare(target, *op, literal),
    }
}

fn compare(value: &JsonValue, op: Comparison, literal: &Literal) -> bool {
    let ordering = match (value, literal) {
        (JsonValue::Number(n), Literal::Number(l)) => n.as_f64().partial_cmp(l),
        (JsonValue::String(s), Literal::String(l)) => Some(s.as_str().cmp(l.as_str())),
        (JsonValue::Boolean(b), Literal::Boolean(l)) if b == l => Some(Ordering::Equal),
        (JsonValue::Null, Literal::Null) => Some(Ordering::Equal),
        // mismatched kinds and unequal booleans are only ever "not equal"
        _ => None,
    };

    match (op, ordering) {
        (Comparison::Eq, Some(ord)) => ord == Ordering::Equal,
        (Comparison::Ne, Some(ord)) => ord != Ordering::Equal,
        (Comparison::Ne, None) => true,
        (Comparison::Lt, Some(ord)) => ord == Ordering::Less,
        (Comparison::Le, Some(ord)) => ord != Ordering::Greater,
        (Comparison::Gt, Some(ord)) => ord == Ordering::Greater,
        (Comparison::Ge, Some(ord)) => ord != Ordering::Less,
        (_, None) => false,
    }
}
