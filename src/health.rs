//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic? |
//!
//! Both answer with the usual envelope so clients need only one parser.

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::request::Request;
use crate::store::UserStore;

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    users: usize,
}

/// Liveness probe. If the process can answer HTTP at all, it is alive.
pub async fn liveness(_req: Request, _store: Arc<UserStore>) -> Result<Envelope, Error> {
    Envelope::data(StatusCode::OK, "status", "ok", "")
}

/// Readiness probe. The store is in memory, so it is ready as soon as it
/// can be locked; the record count is reported for convenience.
pub async fn readiness(_req: Request, store: Arc<UserStore>) -> Result<Envelope, Error> {
    let report = Readiness { status: "ready", users: store.len() };
    Envelope::new(Some(serde_json::to_value(report)?), StatusCode::OK, "")
}
