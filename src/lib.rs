//! # trellis
//!
//! An HTTP request router built on a segment trie.
//!
//! Given a request's method and path, trellis finds the handler chain
//! registered for it in O(path depth), binds the path parameters along the
//! way, and runs the chain. Everything it cannot route goes to one fallback
//! handler.
//!
//! ## Matching rules
//!
//! - A pattern is a `/`-delimited list of segments. A segment starting with
//!   `:` is a named parameter matching any text at that position, empty text
//!   included; any other segment matches its literal text only.
//! - Static segments win: with `/users/new` and `/users/:id` registered,
//!   `/users/new` never reaches the parameter route.
//! - Each registered method + path pair owns a [`Chain`]: every handler in it
//!   runs, in registration order, against the same [`Response`].
//! - Unknown paths and known paths with an unregistered method both go to
//!   the fallback, unless [`Router::method_not_allowed`] is set.
//!   [`Router::resolve`] tells the three outcomes apart without dispatching.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use trellis::{Chain, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), trellis::Error> {
//!     let mut app = Router::new(not_found)
//!         .get("/users/new",    new_user_form)
//!         .get("/users/:id",    get_user);
//!     app.add(http::Method::POST, "/users", Chain::new().then(require_body).then(create_user));
//!
//!     Server::bind("0.0.0.0:3000").await?.serve(app).await
//! }
//!
//! fn not_found(res: &mut Response, _req: &Request) {
//!     res.set_status(StatusCode::NOT_FOUND);
//! }
//!
//! fn new_user_form(res: &mut Response, _req: &Request) {
//!     res.text("form");
//! }
//!
//! fn get_user(res: &mut Response, req: &Request) {
//!     let id = req.param("id").unwrap_or("unknown");
//!     res.json(format!(r#"{{"id":"{id}"}}"#).into_bytes());
//! }
//!
//! fn require_body(res: &mut Response, req: &Request) {
//!     if req.body().is_empty() {
//!         res.set_status(StatusCode::BAD_REQUEST);
//!     }
//! }
//!
//! fn create_user(res: &mut Response, _req: &Request) {
//!     if res.status() == StatusCode::OK {
//!         res.set_status(StatusCode::CREATED);
//!         res.header("location", "/users/99");
//!     }
//! }
//! ```

mod error;
mod handler;
mod node;
mod params;
mod request;
mod response;
mod router;
mod server;

pub use error::Error;
pub use handler::{Chain, Handler};
pub use params::Params;
pub use request::Request;
pub use response::{ContentType, Response};
pub use router::{Resolution, Router};
pub use server::Server;

#[doc(hidden)]
pub use handler::{BoxedHandler, ErasedHandler};
