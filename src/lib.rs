//! # roster
//!
//! An in-memory user roster served as a small JSON CRUD API, plus three
//! HTML form pages for browsers.
//!
//! Every JSON response is an [`Envelope`]:
//!
//! ```json
//! {"code": 200, "success": true, "message": "", "result": {"user": {"id": 1, "name": "Alice", "age": 30, "team": "Red"}}}
//! ```
//!
//! ## Routes
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/` | hello world |
//! | GET | `/mirror/{name}` | echo a path segment |
//! | GET, POST | `/users` | list (`?team=` filters), create |
//! | GET, PUT, DELETE | `/users/{id}` | read, partial update, delete |
//! | GET, POST | `/users/update_user`, `/users/delete_user` | form pages |
//! | GET | `/users/create_user` | form page |
//! | GET | `/healthz`, `/readyz` | probes |
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roster::{Server, UserStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), roster::Error> {
//!     let app = roster::app(Arc::new(UserStore::new()));
//!     Server::bind("127.0.0.1:5000".parse().unwrap()).serve(app).await
//! }
//! ```

mod envelope;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod forms;
pub mod health;
pub mod logging;
pub mod store;
pub mod users;
pub mod validation;

use std::sync::Arc;

pub use envelope::Envelope;
pub use error::Error;
pub use handler::Handler;
pub use request::{Form, Request};
pub use response::{ContentType, IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use store::{NewUser, User, UserField, UserPatch, UserStore};

/// Builds the full route table around `store`.
pub fn app(store: Arc<UserStore>) -> Router<Arc<UserStore>> {
    Router::new(store)
        .get("/", users::hello)
        .get("/mirror/{name}", users::mirror)
        .get("/users", users::list)
        .post("/users", users::create)
        .get("/users/{id}", users::show)
        .put("/users/{id}", users::update)
        .delete("/users/{id}", users::delete)
        .get("/users/create_user", forms::create_page)
        .get("/users/update_user", forms::update_page)
        .post("/users/update_user", forms::submit_update)
        .get("/users/delete_user", forms::delete_page)
        .post("/users/delete_user", forms::submit_delete)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
}
