use std::sync::{Arc, Mutex};

use http::{Method, StatusCode};
use trellis::{Chain, Handler, Request, Response, Router};

/// Records every `(handler tag, bound params)` a router runs.
#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>);

impl Log {
    fn handler(&self, tag: &'static str) -> impl Handler + use<> {
        let log = self.clone();
        move |_: &mut Response, req: &Request| {
            let params = req
                .params()
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            log.0.lock().unwrap().push((tag.to_owned(), params));
        }
    }

    fn take(&self) -> Vec<(String, Vec<(String, String)>)> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    fn tags(&self) -> Vec<String> {
        self.take().into_iter().map(|(tag, _)| tag).collect()
    }
}

fn dispatch(router: &Router, method: Method, path: &str) {
    let mut res = Response::new();
    router.dispatch(&mut res, &mut Request::new(method, path));
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn static_segment_wins_over_parameter() {
    let log = Log::default();
    let router = Router::new(log.handler("fallback"))
        .get("/users/:id", log.handler("show"))
        .get("/users/new", log.handler("new"));

    dispatch(&router, Method::GET, "/users/new");
    dispatch(&router, Method::GET, "/users/42");

    assert_eq!(
        log.take(),
        vec![
            ("new".to_owned(), vec![]),
            ("show".to_owned(), pairs(&[("id", "42")])),
        ]
    );
}

#[test]
fn static_dead_end_retries_the_parameter_branch() {
    let log = Log::default();
    let router = Router::new(log.handler("fallback"))
        .get("/a/:x/b", log.handler("param"))
        .get("/a/c/d", log.handler("static"));

    dispatch(&router, Method::GET, "/a/c/b");
    dispatch(&router, Method::GET, "/a/c/d");
    dispatch(&router, Method::GET, "/a/c/e");

    assert_eq!(
        log.take(),
        vec![
            ("param".to_owned(), pairs(&[("x", "c")])),
            ("static".to_owned(), vec![]),
            ("fallback".to_owned(), vec![]),
        ]
    );
}

#[test]
fn static_prefix_without_route_yields_to_parameter() {
    let log = Log::default();
    let router = Router::new(log.handler("fallback"))
        .get("/users/:id", log.handler("show"))
        .get("/users/new/confirm", log.handler("confirm"));

    dispatch(&router, Method::GET, "/users/new");
    dispatch(&router, Method::GET, "/users/old");
    dispatch(&router, Method::GET, "/users/new/confirm");

    assert_eq!(
        log.take(),
        vec![
            ("show".to_owned(), pairs(&[("id", "new")])),
            ("show".to_owned(), pairs(&[("id", "old")])),
            ("confirm".to_owned(), vec![]),
        ]
    );
}

#[test]
fn parameters_are_percent_decoded() {
    let log = Log::default();
    let router = Router::new(log.handler("fallback")).get("/users/:name", log.handler("show"));

    dispatch(&router, Method::GET, "/users/john%20doe");
    dispatch(&router, Method::GET, "/users/a%2Fb");

    assert_eq!(
        log.take(),
        vec![
            ("show".to_owned(), pairs(&[("name", "john doe")])),
            ("show".to_owned(), pairs(&[("name", "a/b")])),
        ]
    );
}

#[test]
fn unregistered_method_goes_to_fallback() {
    let log = Log::default();
    let mut router = Router::new(log.handler("fallback"));
    router.add(Method::GET, "/items", Chain::new().then(log.handler("list")));
    router.add(
        Method::POST,
        "/items",
        Chain::new().then(log.handler("validate")).then(log.handler("create")),
    );

    dispatch(&router, Method::DELETE, "/items");
    dispatch(&router, Method::POST, "/items");
    dispatch(&router, Method::GET, "/items");

    assert_eq!(log.tags(), vec!["fallback", "validate", "create", "list"]);
}

#[test]
fn re_registration_replaces_the_chain() {
    let log = Log::default();
    let mut router = Router::new(log.handler("fallback"));
    router.add(Method::GET, "/x", Chain::new().then(log.handler("h1")).then(log.handler("h1b")));
    router.add(Method::GET, "/x", Chain::new().then(log.handler("h2")));

    dispatch(&router, Method::GET, "/x");
    dispatch(&router, Method::GET, "/x");

    assert_eq!(log.tags(), vec!["h2", "h2"]);
}

#[test]
fn pooled_requests_do_not_leak_parameters() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = {
        let seen = Arc::clone(&seen);
        move |_: &mut Response, req: &Request| {
            let params: Vec<String> = req.params().iter().map(|(k, v)| format!("{k}={v}")).collect();
            seen.lock().unwrap().push(params.join("&"));
        }
    };
    let router = Router::new(record.clone())
        .get("/orgs/:org/repos/:repo", record.clone())
        .get("/health", record);

    let mut pool = vec![Request::new(Method::GET, "/")];
    let mut res = Response::new();

    let mut req = pool.pop().unwrap();
    req.reset(Method::GET, "/orgs/acme/repos/trellis");
    router.dispatch(&mut res, &mut req);
    assert!(req.params().is_empty());
    pool.push(req);

    let mut req = pool.pop().unwrap();
    req.reset(Method::GET, "/health");
    router.dispatch(&mut res, &mut req);
    assert!(req.params().is_empty());
    pool.push(req);

    let mut req = pool.pop().unwrap();
    req.reset(Method::GET, "/nowhere");
    router.dispatch(&mut res, &mut req);
    assert!(req.params().is_empty());

    assert_eq!(*seen.lock().unwrap(), vec!["org=acme&repo=trellis", "", ""]);
}

#[test]
fn params_are_cleared_even_when_a_handler_panics() {
    fn explode(_: &mut Response, _: &Request) {
        panic!("handler failure");
    }
    let router = Router::default().get("/boom/:id", explode);

    let mut req = Request::new(Method::GET, "/boom/1");
    let mut res = Response::new();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        router.dispatch(&mut res, &mut req);
    }));

    assert!(outcome.is_err());
    assert!(req.params().is_empty());
}

#[test]
fn root_path_matches_its_route() {
    let log = Log::default();
    let router = Router::new(log.handler("fallback"))
        .get("/", log.handler("root"))
        .get("/docs", log.handler("docs"));

    dispatch(&router, Method::GET, "/");
    dispatch(&router, Method::GET, "/docs");
    dispatch(&router, Method::GET, "/docs/");

    assert_eq!(log.tags(), vec!["root", "docs", "fallback"]);
}

#[test]
fn trailing_slash_binds_an_empty_parameter() {
    let log = Log::default();
    let router = Router::new(log.handler("fallback")).get("/files/:name", log.handler("file"));

    dispatch(&router, Method::GET, "/files/");

    assert_eq!(log.take(), vec![("file".to_owned(), pairs(&[("name", "")]))]);
}

#[test]
fn handlers_share_one_response() {
    let router = Router::default().route(
        Method::GET,
        "/greet/:name",
        Chain::new()
            .then(|res: &mut Response, _: &Request| res.header("x-greeter", "trellis"))
            .then(|res: &mut Response, req: &Request| {
                res.text(format!("hello, {}", req.param("name").unwrap_or_default()));
            })
            .then(|res: &mut Response, _: &Request| res.set_status(StatusCode::ACCEPTED)),
    );

    let mut res = Response::new();
    router.dispatch(&mut res, &mut Request::new(Method::GET, "/greet/ada"));

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(res.body(), b"hello, ada");
    assert_eq!(res.header_value("x-greeter"), Some("trellis"));
}
