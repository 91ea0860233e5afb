//! Path trie: insertion and lookup

use crate::segment::{parse_pattern, split_path, Segment};
use crate::{Error, Params, Result};
use std::collections::HashMap;
use std::fmt;

/// Role of a node in the trie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Static,
    Param,
    CatchAll,
}

/// Terminal payload of a registered pattern
#[derive(Debug, Clone)]
pub struct Route<T> {
    pattern: String,
    param_names: Vec<String>,
    value: T,
}

impl<T> Route<T> {
    /// The pattern exactly as registered
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Capture names declared by this pattern, in path order
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Lookup result
#[derive(Debug)]
pub struct Match<'a, T> {
    /// The resolved route
    pub route: &'a Route<T>,
    /// Captured path parameters
    pub params: Params,
}

impl<'a, T> Match<'a, T> {
    pub fn value(&self) -> &'a T {
        &self.route.value
    }
}

#[derive(Debug)]
struct Node<T> {
    kind: NodeKind,
    /// Literal text for static nodes, capture name for param/catch-all
    segment: String,
    /// Static children keyed by literal text
    statics: HashMap<String, Node<T>>,
    param: Option<Box<Node<T>>>,
    /// Always a leaf
    catch_all: Option<Box<Node<T>>>,
    route: Option<Route<T>>,
}

impl<T> Node<T> {
    fn new(kind: NodeKind, segment: &str) -> Self {
        Self {
            kind,
            segment: segment.to_string(),
            statics: HashMap::new(),
            param: None,
            catch_all: None,
            route: None,
        }
    }

    fn child_or_insert(&mut self, segment: Segment<'_>) -> &mut Node<T> {
        match segment {
            Segment::Static(text) => self
                .statics
                .entry(text.to_string())
                .or_insert_with(|| Node::new(NodeKind::Static, text)),
            // An existing param node is reused whatever name it was created with
            Segment::Param(name) => &mut **self
                .param
                .get_or_insert_with(|| Box::new(Node::new(NodeKind::Param, name))),
            Segment::CatchAll(name) => &mut **self
                .catch_all
                .get_or_insert_with(|| Box::new(Node::new(NodeKind::CatchAll, name))),
        }
    }

    fn children(&self) -> impl Iterator<Item = &Node<T>> {
        let mut statics: Vec<&Node<T>> = self.statics.values().collect();
        statics.sort_by(|a, b| a.segment.cmp(&b.segment));
        statics
            .into_iter()
            .chain(self.param.as_deref())
            .chain(self.catch_all.as_deref())
    }

    fn collect_routes<'a>(&'a self, out: &mut Vec<&'a Route<T>>) {
        if let Some(route) = &self.route {
            out.push(route);
        }
        for child in self.children() {
            child.collect_routes(out);
        }
    }

    fn fmt_depth(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let label = match self.kind {
            NodeKind::Root => "<root>".to_string(),
            NodeKind::Static if self.segment.is_empty() => "\"\"".to_string(),
            NodeKind::Static => self.segment.clone(),
            NodeKind::Param => format!(":{}", self.segment),
            NodeKind::CatchAll => format!("*{}", self.segment),
        };
        write!(f, "{:indent$}{}", "", label, indent = depth * 2)?;
        if let Some(route) = &self.route {
            write!(f, " => {}", route.pattern)?;
        }
        writeln!(f)?;
        for child in self.children() {
            child.fmt_depth(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Segment trie for one HTTP method
///
/// Built once, then read concurrently: `find` takes `&self` and never
/// mutates.
#[derive(Debug)]
pub struct Tree<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Tree<T> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            root: Node::new(NodeKind::Root, ""),
            len: 0,
        }
    }

    /// Register a pattern
    ///
    /// The pattern is fully validated before the tree is touched, so a
    /// failed insert leaves the tree unchanged.
    ///
    /// # Example
    /// ```
    /// use alien_router::{Error, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("/users/:id", 1).unwrap();
    /// assert_eq!(
    ///     tree.insert("/users/:id", 2),
    ///     Err(Error::DuplicateRoute("/users/:id".to_string()))
    /// );
    /// ```
    pub fn insert(&mut self, pattern: &str, value: T) -> Result<()> {
        let segments = parse_pattern(pattern)?;

        let mut node = &mut self.root;
        for segment in &segments {
            node = node.child_or_insert(*segment);
        }

        // Reaching an occupied terminal means every node on the way already
        // existed, so nothing was created above.
        if node.route.is_some() {
            return Err(Error::DuplicateRoute(pattern.to_string()));
        }

        node.route = Some(Route {
            pattern: pattern.to_string(),
            param_names: segments
                .iter()
                .filter_map(|s| s.name())
                .map(str::to_string)
                .collect(),
            value,
        });
        self.len += 1;
        Ok(())
    }

    /// Resolve a concrete request path
    ///
    /// At every node exactly one child is taken: static, else param (for a
    /// non-empty segment), else catch-all (for a non-empty remainder). There
    /// is no backtracking.
    ///
    /// # Example
    /// ```
    /// use alien_router::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("/hello/:name", "hello").unwrap();
    ///
    /// let m = tree.find("/hello/world").unwrap();
    /// assert_eq!(*m.value(), "hello");
    /// assert_eq!(m.params.get("name"), Some("world"));
    /// ```
    pub fn find(&self, path: &str) -> Result<Match<'_, T>> {
        let not_found = || Error::NotFound(path.to_string());
        let segments = split_path(path).ok_or_else(not_found)?;

        let mut node = &self.root;
        let mut values = Vec::new();

        for (i, &segment) in segments.iter().enumerate() {
            if let Some(child) = node.statics.get(segment) {
                node = child;
            } else if let Some(child) = node.param.as_deref().filter(|_| !segment.is_empty()) {
                values.push(segment.to_string());
                node = child;
            } else if let Some(child) = node.catch_all.as_deref() {
                let remainder = segments[i..].join("/");
                if remainder.is_empty() {
                    return Err(not_found());
                }
                values.push(remainder);
                node = child;
                break;
            } else {
                return Err(not_found());
            }
        }

        let route = node.route.as_ref().ok_or_else(not_found)?;
        // Names come from the terminal route's own pattern, not from the
        // shared param nodes along the way.
        let params = route.param_names.iter().cloned().zip(values).collect();
        Ok(Match { route, params })
    }

    /// Number of registered patterns
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All registered routes, depth first, statics before param before
    /// catch-all
    pub fn routes(&self) -> Vec<&Route<T>> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_routes(&mut out);
        out
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Indented dump of the trie, one node per line
impl<T> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_depth(f, 0)
    }
}
