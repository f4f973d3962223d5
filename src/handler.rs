//! Handler trait, type erasure and handler chains.
//!
//! # How handlers are stored
//!
//! A trie node keeps the handlers of *different* types for every method it
//! terminates, so they are hidden behind one trait object (`dyn ErasedHandler`)
//! and stored uniformly:
//!
//! ```text
//! fn hello(res: &mut Response, req: &Request) { … }   ← user writes this
//!        ↓ router.get("/", hello)
//! hello.into_boxed_handler()                          ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                          ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(res, req)  at request time             ← one vtable dispatch
//! ```
//!
//! Handlers are plain synchronous functions. They may block; the server runs
//! each dispatch on tokio's blocking pool.

use std::fmt;
use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

// ── Internal types ────────────────────────────────────────────────────────────

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, res: &mut Response, req: &Request);
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// function or closure with the signature:
///
/// ```text
/// fn name(res: &mut Response, req: &Request)
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F> private::Sealed for F where F: Fn(&mut Response, &Request) + Send + Sync + 'static {}

impl<F> Handler for F
where
    F: Fn(&mut Response, &Request) + Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Bridges a concrete handler `F` to the trait-object world.
struct FnHandler<F>(F);

impl<F> ErasedHandler for FnHandler<F>
where
    F: Fn(&mut Response, &Request) + Send + Sync,
{
    fn call(&self, res: &mut Response, req: &Request) {
        (self.0)(res, req);
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// An ordered sequence of handlers registered for one method + path pair.
///
/// At dispatch every handler runs, in registration order, against the same
/// response and request. There is no short-circuit: a handler that has
/// already written a response does not stop the ones after it.
///
/// ```rust
/// use trellis::{Chain, Request, Response};
///
/// fn authenticate(res: &mut Response, _req: &Request) { res.header("x-user", "alice"); }
/// fn show_profile(res: &mut Response, _req: &Request) { res.text("profile"); }
///
/// let chain = Chain::new().then(authenticate).then(show_profile);
/// assert_eq!(chain.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    handlers: Vec<BoxedHandler>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the end of the chain.
    pub fn then(mut self, handler: impl Handler) -> Self {
        self.handlers.push(handler.into_boxed_handler());
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every handler in order.
    pub(crate) fn run(&self, res: &mut Response, req: &Request) {
        for handler in &self.handlers {
            handler.call(res, req);
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("len", &self.handlers.len()).finish()
    }
}
