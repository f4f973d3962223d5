//! Segment trie.
//!
//! Each node stands for one `/`-delimited segment position across every
//! registered pattern. Static children are keyed by their literal text; at
//! most one parameter child (`:name`) matches any text when no static child
//! does. Nodes that terminate a route keep one [`Chain`] per method.
//!
//! Lookup walks one segment per level, so its cost is bounded by the path
//! depth, not by the number of registered routes.

use std::collections::HashMap;
use std::str::Split;

use http::Method;
use tracing::warn;

use crate::handler::Chain;

/// Leading character of a parameter segment.
pub(crate) const PARAM_MARKER: char = ':';

/// One segment of a registered pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Static(&'a str),
    Param(&'a str),
}

impl<'a> Segment<'a> {
    pub(crate) fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix(PARAM_MARKER) {
            Some(name) => Self::Param(name),
            None => Self::Static(raw),
        }
    }
}

/// Splits a path into its segments.
///
/// The empty segment in front of a leading `/` is discarded; every other
/// segment, empty ones included, is kept. `/` yields one empty segment,
/// `/a//b/` yields `a`, ``, `b`, `` and the empty path yields nothing.
pub(crate) fn segments(path: &str) -> Split<'_, char> {
    let mut iter = path.strip_prefix('/').unwrap_or(path).split('/');
    if path.is_empty() {
        iter.next();
    }
    iter
}

#[derive(Default)]
pub(crate) struct Node {
    children: HashMap<String, Node>,
    param: Option<Box<ParamChild>>,
    handlers: HashMap<Method, Chain>,
}

struct ParamChild {
    name: String,
    node: Node,
}

/// A `(parameter name, path text)` pair bound during search.
pub(crate) type Capture<'n, 'p> = (&'n str, &'p str);

impl Node {
    /// Registers `chain` for `method` on `path`, creating nodes as needed.
    pub(crate) fn insert_path(&mut self, method: Method, path: &str, chain: Chain) {
        self.insert(method, segments(path).map(Segment::parse), chain);
    }

    /// Finds the node terminating `path`, filling `captures` with the
    /// parameters bound along the way.
    pub(crate) fn search_path<'n, 'p>(
        &'n self,
        path: &'p str,
        captures: &mut Vec<Capture<'n, 'p>>,
    ) -> Option<&'n Node> {
        self.search(segments(path), captures)
    }

    /// Descends (or builds) one level per segment and stores `chain` under
    /// `method` on the last node. An earlier chain for the same method is
    /// replaced.
    pub(crate) fn insert<'a>(
        &mut self,
        method: Method,
        mut segments: impl Iterator<Item = Segment<'a>>,
        chain: Chain,
    ) {
        let Some(segment) = segments.next() else {
            if self.handlers.insert(method.clone(), chain).is_some() {
                warn!(%method, "route registered twice; keeping the last handler chain");
            }
            return;
        };

        let child = match segment {
            Segment::Static(text) => self.children.entry(text.to_owned()).or_default(),
            Segment::Param(name) => {
                let param = self.param.get_or_insert_with(|| {
                    Box::new(ParamChild { name: name.to_owned(), node: Node::default() })
                });
                if param.name != name {
                    warn!(
                        previous = %param.name,
                        current = %name,
                        "conflicting parameter names at the same position; the last one wins"
                    );
                    param.name = name.to_owned();
                }
                &mut param.node
            }
        };
        child.insert(method, segments, chain);
    }

    /// Walks the remaining `segments` and returns the terminal node.
    ///
    /// Static children win over the parameter child. If the static branch
    /// dead-ends further down, or ends on a node that terminates no route,
    /// the parameter child at this same position is tried before giving up;
    /// bindings made inside a failed branch are rolled back. Whether the
    /// returned node has a chain for the request's method is for the caller
    /// to decide.
    pub(crate) fn search<'n, 'p, I>(
        &'n self,
        mut segments: I,
        captures: &mut Vec<Capture<'n, 'p>>,
    ) -> Option<&'n Node>
    where
        I: Iterator<Item = &'p str> + Clone,
    {
        let Some(segment) = segments.next() else {
            // A node that only prefixes longer patterns is not a match; the
            // caller then tries the parameter branch one level up.
            return self.is_terminal().then_some(self);
        };

        let mark = captures.len();
        if let Some(child) = self.children.get(segment) {
            if let Some(found) = child.search(segments.clone(), captures) {
                return Some(found);
            }
            captures.truncate(mark);
        }

        let param = self.param.as_deref()?;
        captures.push((param.name.as_str(), segment));
        let found = param.node.search(segments, captures);
        if found.is_none() {
            captures.truncate(mark);
        }
        found
    }

    /// Whether some route ends here with a non-empty chain.
    fn is_terminal(&self) -> bool {
        self.handlers.values().any(|chain| !chain.is_empty())
    }

    /// The chain registered for `method`, if any.
    pub(crate) fn chain(&self, method: &Method) -> Option<&Chain> {
        self.handlers.get(method)
    }

    /// Methods with a non-empty chain on this node, sorted by name.
    pub(crate) fn allowed_methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .handlers
            .iter()
            .filter(|(_, chain)| !chain.is_empty())
            .map(|(method, _)| method.clone())
            .collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }
}
