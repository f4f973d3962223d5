//! Segment-trie request router.
//!
//! One trie for every method. O(path-depth) lookup. You register a method,
//! a path and a chain of handlers; at request time the router finds the chain,
//! binds the path parameters into the request and runs it. Anything it cannot
//! route goes to the fallback handler.

use std::borrow::Cow;

use http::{Method, StatusCode};
use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::handler::{BoxedHandler, Chain, Handler};
use crate::node::Node;
use crate::request::Request;
use crate::response::Response;

/// The outcome of matching a method + path against the registered routes.
#[derive(Debug)]
pub enum Resolution<'r> {
    /// A chain is registered for the method on the matched path.
    Matched {
        chain: &'r Chain,
        params: Vec<(&'r str, String)>,
    },
    /// The path matches a route, but not for this method.
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

/// The application router.
///
/// Build it once at startup, then hand it to [`Server::serve`](crate::Server::serve),
/// which moves it behind an `Arc`: from then on the routing table is read-only.
///
/// ```rust
/// use trellis::{Request, Response, Router};
/// use http::StatusCode;
///
/// fn not_found(res: &mut Response, _req: &Request) {
///     res.set_status(StatusCode::NOT_FOUND);
/// }
/// fn get_user(res: &mut Response, req: &Request) {
///     res.text(format!("user {}", req.param("id").unwrap_or("?")));
/// }
/// fn new_user_form(res: &mut Response, _req: &Request) {
///     res.text("form");
/// }
///
/// let app = Router::new(not_found)
///     .get("/users/:id", get_user)
///     .get("/users/new", new_user_form);
/// ```
pub struct Router {
    root: Node,
    fallback: BoxedHandler,
    method_not_allowed: Option<BoxedHandler>,
}

impl Router {
    /// Creates an empty router. `fallback` runs for every request that has no
    /// chain: unknown paths and known paths with an unregistered method alike.
    pub fn new(fallback: impl Handler) -> Self {
        Self {
            root: Node::default(),
            fallback: fallback.into_boxed_handler(),
            method_not_allowed: None,
        }
    }

    /// Routes requests whose path matches but whose method has no chain to
    /// `handler` instead of the fallback. The handler can read the allowed
    /// methods from the `allow` header already set on the response.
    pub fn method_not_allowed(mut self, handler: impl Handler) -> Self {
        self.method_not_allowed = Some(handler.into_boxed_handler());
        self
    }

    /// Registers `chain` for a method + path pair.
    ///
    /// Segments starting with `:` are named parameters: `/users/:id` binds
    /// whatever text sits in the second segment to `id`. Registering the same
    /// method + path again replaces the earlier chain, and a new parameter
    /// name at an existing parameter position replaces the old name. An empty
    /// chain is accepted but dispatches to the fallback.
    pub fn add(&mut self, method: Method, path: &str, chain: Chain) {
        debug!(%method, path, handlers = chain.len(), "route registered");
        self.root.insert_path(method, path, chain);
    }

    /// Register a single handler for a method + path pair. Returns `self` for chaining.
    ///
    /// ```rust
    /// # use trellis::{Request, Response, Router};
    /// # use http::Method;
    /// # fn get_user(_: &mut Response, _: &Request) {}
    /// # fn purge_user(_: &mut Response, _: &Request) {}
    /// let purge = Method::from_bytes(b"PURGE").unwrap();
    /// Router::default()
    ///     .on(Method::GET, "/users/:id", get_user)
    ///     .on(purge,       "/users/:id", purge_user);
    /// ```
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, Chain::new().then(handler));
        self
    }

    /// Register a chain for a method + path pair. Returns `self` for chaining.
    pub fn route(mut self, method: Method, path: &str, chain: Chain) -> Self {
        self.add(method, path, chain);
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Matches `method` + `path` without running anything.
    ///
    /// A registered but empty chain resolves as if the method were absent.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let mut captures = Vec::new();
        let Some(node) = self.root.search_path(path, &mut captures) else {
            return Resolution::NotFound;
        };

        match node.chain(method) {
            Some(chain) if !chain.is_empty() => Resolution::Matched {
                chain,
                params: captures
                    .into_iter()
                    .map(|(name, value)| (name, decode(value).into_owned()))
                    .collect(),
            },
            _ => {
                let allowed = node.allowed_methods();
                if allowed.is_empty() {
                    Resolution::NotFound
                } else {
                    Resolution::MethodNotAllowed { allowed }
                }
            }
        }
    }

    /// Routes one request: binds its path parameters, runs the matched chain
    /// (or the fallback) against `res`, then empties the parameter store.
    ///
    /// The store is emptied on every way out, including a panicking handler,
    /// so a pooled request object never carries parameters into its next use.
    pub fn dispatch(&self, res: &mut Response, req: &mut Request) {
        let scope = ParamScope::enter(req);
        let req = &mut *scope.req;
        let mut captures = Vec::new();
        let found = self.root.search_path(&req.path, &mut captures);

        let chain = found
            .and_then(|node| node.chain(&req.method))
            .filter(|chain| !chain.is_empty());

        if let Some(chain) = chain {
            for (name, value) in captures {
                req.params.set(name, decode(value));
            }
            debug!(method = %req.method, path = %req.path, params = req.params.len(), "route matched");
            chain.run(res, req);
            return;
        }

        let allowed = found.map(Node::allowed_methods).unwrap_or_default();
        match &self.method_not_allowed {
            Some(handler) if !allowed.is_empty() => {
                debug!(method = %req.method, path = %req.path, "method not allowed");
                res.set_status(StatusCode::METHOD_NOT_ALLOWED);
                res.header("allow", &join_methods(&allowed));
                handler.call(res, req);
            }
            _ => {
                debug!(method = %req.method, path = %req.path, "no route, running fallback");
                self.fallback.call(res, req);
            }
        }
    }
}

impl Default for Router {
    /// A router whose fallback answers `404 Not Found` with an empty body.
    fn default() -> Self {
        Self::new(|res: &mut Response, _: &Request| res.set_status(StatusCode::NOT_FOUND))
    }
}

/// Percent-decodes one captured segment. Decoding happens after splitting,
/// so an encoded `%2F` stays inside its parameter.
fn decode(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment).decode_utf8_lossy()
}

fn join_methods(methods: &[Method]) -> String {
    methods.iter().map(Method::as_str).collect::<Vec<_>>().join(", ")
}

// ── Parameter lifecycle ───────────────────────────────────────────────────────

/// Exclusive hold on a request for the length of one dispatch.
///
/// Entering empties the parameter store so dispatch starts from a fresh one;
/// dropping empties it again, whether dispatch returned or unwound.
struct ParamScope<'a> {
    req: &'a mut Request,
}

impl<'a> ParamScope<'a> {
    fn enter(req: &'a mut Request) -> Self {
        req.params.clear();
        Self { req }
    }
}

impl Drop for ParamScope<'_> {
    fn drop(&mut self) {
        self.req.params.clear();
    }
}
