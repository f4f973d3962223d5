//! Minimal trellis example: CRUD-style JSON endpoints behind one fallback.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl http://localhost:3000/users/new
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42
//!   curl -X PUT http://localhost:3000/users/42      # 405, allow: DELETE, GET

use http::{Method, StatusCode};
use trellis::{Chain, Request, Response, Router, Server};

#[tokio::main]
async fn main() -> Result<(), trellis::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut app = Router::new(not_found)
        .get("/users/new",    new_user_form)
        .get("/users/:id",    get_user)
        .delete("/users/:id", delete_user)
        .method_not_allowed(method_not_allowed);
    app.add(Method::POST, "/users", Chain::new().then(require_body).then(create_user));

    Server::bind("0.0.0.0:3000").await?.serve(app).await
}

fn not_found(res: &mut Response, req: &Request) {
    res.set_status(StatusCode::NOT_FOUND);
    res.text(format!("no route for {} {}", req.method(), req.path()));
}

fn method_not_allowed(res: &mut Response, _req: &Request) {
    res.text("method not allowed");
}

// GET /users/new wins over GET /users/:id
fn new_user_form(res: &mut Response, _req: &Request) {
    res.json(br#"{"name":""}"#.to_vec());
}

// GET /users/:id
fn get_user(res: &mut Response, req: &Request) {
    let id = req.param("id").unwrap_or("unknown");
    res.json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes());
}

// POST /users, first link: reject empty bodies
fn require_body(res: &mut Response, req: &Request) {
    if req.body().is_empty() {
        res.set_status(StatusCode::BAD_REQUEST);
        res.text("empty body");
    }
}

// POST /users, second link: every handler runs, so check what the first one did
fn create_user(res: &mut Response, _req: &Request) {
    if res.status() != StatusCode::OK {
        return;
    }
    res.set_status(StatusCode::CREATED);
    res.header("location", "/users/99");
    res.json(br#"{"id":"99","name":"new_user"}"#.to_vec());
}

// DELETE /users/:id → 204 No Content
fn delete_user(res: &mut Response, _req: &Request) {
    res.set_status(StatusCode::NO_CONTENT);
}
