//! Radix tree node implementation.
//!
//! Each node represents one `/`-separated segment of a pattern. Static
//! children are kept sorted for binary search; a node has at most one
//! placeholder child and at most one wildcard child.

use crate::args::PathArgs;
use crate::methods::MethodTable;
use crate::RouteError;
use http::Method;

/// Type of path segment in the radix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    /// Literal segment (e.g. "users")
    Static,
    /// Named placeholder (e.g. "{id}")
    Param(String),
    /// Catch-all placeholder (e.g. "*path"), always the last segment
    Wildcard(String),
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    segment: String,
    kind: SegmentKind,
    methods: MethodTable,
    static_children: Vec<Node>,
    param_child: Option<Box<Node>>,
    wildcard_child: Option<Box<Node>>,
}

impl Node {
    fn new(segment: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            segment: segment.into(),
            kind,
            methods: MethodTable::new(),
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates the root node of a tree.
    pub(crate) fn root() -> Self {
        Self::new("", SegmentKind::Static)
    }

    /// Splits a pattern into typed segments, rejecting malformed input.
    ///
    /// Empty segments are dropped, so `/users/` and `/users` are the same
    /// pattern.
    pub(crate) fn parse_pattern(pattern: &str) -> Result<Vec<(String, SegmentKind)>, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }

        let raw: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut names: Vec<String> = Vec::new();

        for (i, s) in raw.iter().enumerate() {
            let kind = if let Some(inner) = s.strip_prefix('{') {
                let name = inner
                    .strip_suffix('}')
                    .ok_or_else(|| invalid("unterminated placeholder"))?;
                if !is_placeholder_name(name) {
                    return Err(invalid("placeholder names must be non-empty [A-Za-z0-9_]"));
                }
                SegmentKind::Param(name.to_string())
            } else if let Some(name) = s.strip_prefix('*') {
                if i + 1 != raw.len() {
                    return Err(invalid("wildcard must be the last segment"));
                }
                if !is_placeholder_name(name) {
                    return Err(invalid("placeholder names must be non-empty [A-Za-z0-9_]"));
                }
                SegmentKind::Wildcard(name.to_string())
            } else if s.contains(['{', '}']) {
                return Err(invalid("placeholders must span a whole segment"));
            } else {
                SegmentKind::Static
            };

            if let SegmentKind::Param(name) | SegmentKind::Wildcard(name) = &kind {
                if names.contains(name) {
                    return Err(invalid("placeholder names must be unique"));
                }
                names.push(name.clone());
            }

            segments.push(((*s).to_string(), kind));
        }

        Ok(segments)
    }

    /// Binds `method` to `handler_id` at the node addressed by `segments`.
    pub(crate) fn insert(
        &mut self,
        pattern: &str,
        segments: &[(String, SegmentKind)],
        method: Method,
        handler_id: String,
        seq: usize,
    ) -> Result<(), RouteError> {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            if self.methods.bind(method.clone(), handler_id, seq) {
                return Ok(());
            }
            return Err(RouteError::DuplicateRoute {
                method,
                pattern: pattern.to_string(),
            });
        };

        let child = match kind {
            SegmentKind::Static => {
                match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(i) => &mut self.static_children[i],
                    Err(i) => {
                        self.static_children
                            .insert(i, Node::new(segment.clone(), kind.clone()));
                        &mut self.static_children[i]
                    }
                }
            }
            SegmentKind::Param(name) => {
                Self::placeholder_child(&mut self.param_child, pattern, segment, kind, name)?
            }
            SegmentKind::Wildcard(name) => {
                Self::placeholder_child(&mut self.wildcard_child, pattern, segment, kind, name)?
            }
        };

        child.insert(pattern, remaining, method, handler_id, seq)
    }

    fn placeholder_child<'a>(
        slot: &'a mut Option<Box<Node>>,
        pattern: &str,
        segment: &str,
        kind: &SegmentKind,
        name: &str,
    ) -> Result<&'a mut Node, RouteError> {
        if let Some(existing) = slot.as_ref() {
            if existing.kind != *kind {
                return Err(RouteError::ConflictingPlaceholder {
                    pattern: pattern.to_string(),
                    existing: existing.segment.clone(),
                    given: name.to_string(),
                });
            }
        }
        Ok(slot.get_or_insert_with(|| Box::new(Node::new(segment, kind.clone()))))
    }

    /// Finds the highest-priority method table for `segments` that satisfies
    /// `accept`, capturing placeholder values into `args`.
    ///
    /// Priority is static, then placeholder, then wildcard. Captures made on
    /// an abandoned branch are rolled back.
    pub(crate) fn find<'a>(
        &'a self,
        segments: &[&str],
        args: &mut PathArgs,
        accept: &dyn Fn(&MethodTable) -> bool,
    ) -> Option<&'a MethodTable> {
        let Some((segment, remaining)) = segments.split_first() else {
            return (!self.methods.is_empty() && accept(&self.methods)).then_some(&self.methods);
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.find(remaining, args, accept) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = args.len();
                args.push(name.clone(), *segment);
                if let Some(found) = child.find(remaining, args, accept) {
                    return Some(found);
                }
                args.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                if !child.methods.is_empty() && accept(&child.methods) {
                    args.push(name.clone(), segments.join("/"));
                    return Some(&child.methods);
                }
            }
        }

        None
    }

    /// Collects the method table of every branch that matches `segments`,
    /// regardless of method.
    pub(crate) fn collect<'a>(&'a self, segments: &[&str], tables: &mut Vec<&'a MethodTable>) {
        let Some((segment, remaining)) = segments.split_first() else {
            if !self.methods.is_empty() {
                tables.push(&self.methods);
            }
            return;
        };

        if let Some(child) = self.find_static_child(segment) {
            child.collect(remaining, tables);
        }
        if let Some(child) = &self.param_child {
            child.collect(remaining, tables);
        }
        if let Some(child) = &self.wildcard_child {
            if !child.methods.is_empty() {
                tables.push(&child.methods);
            }
        }
    }

    fn find_static_child(&self, segment: &str) -> Option<&Node> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
