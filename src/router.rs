//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Static segments win over
//! parameters, so `/users/create_user` and `/users/{id}` coexist.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;

use crate::envelope::Envelope;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The application router.
///
/// Holds the route table and the state `S` handed to every handler. Build it
/// once at startup and pass it to [`Server::serve`](crate::Server::serve),
/// or drive it directly with [`Router::route`].
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: S,
}

enum Lookup<S> {
    Found(BoxedHandler<S>, HashMap<String, String>),
    WrongMethod,
    Missing,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(state: S) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Routes one request and produces one response.
    ///
    /// Unknown paths answer with a 404 envelope, known paths hit with an
    /// unregistered method with a 405 envelope.
    pub async fn route(&self, mut req: Request) -> Response {
        let path = normalize(req.path()).to_owned();
        match self.lookup(&req.method, &path) {
            Lookup::Found(handler, params) => {
                req.params = params;
                handler.call(req, self.state.clone()).await
            }
            Lookup::WrongMethod => Envelope::plain(
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Method {} not allowed on {path}", req.method),
            )
            .into_response(),
            Lookup::Missing => {
                Envelope::plain(StatusCode::NOT_FOUND, format!("No route for {path}")).into_response()
            }
        }
    }

    fn lookup(&self, method: &Method, path: &str) -> Lookup<S> {
        if let Some(matched) = self.routes.get(method).and_then(|tree| tree.at(path).ok()) {
            let handler = Arc::clone(matched.value);
            // Matching runs on the raw path; captured values are decoded.
            let mut params = HashMap::new();
            for (k, v) in matched.params.iter() {
                let Ok(value) = percent_decode_str(v).decode_utf8() else {
                    return Lookup::Missing;
                };
                params.insert(k.to_owned(), value.into_owned());
            }
            return Lookup::Found(handler, params);
        }
        let elsewhere = self.routes.iter()
            .any(|(m, tree)| m != method && tree.at(path).is_ok());
        if elsewhere { Lookup::WrongMethod } else { Lookup::Missing }
    }
}

/// `/users/` and `/users` are the same route. The root stays `/`.
fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}
