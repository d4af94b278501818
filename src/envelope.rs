//! Uniform JSON response wrapper.
//!
//! Every REST response has the shape
//!
//! ```json
//! {"code": 201, "success": true, "message": "...", "result": {"new user": {...}}}
//! ```
//!
//! `result` is either `null` or an object with a single key naming the kind
//! of data it holds (`"user"`, `"users"`, `"new user"`, ...).

use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use crate::error::Error;
use crate::response::{IntoResponse, Response};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Envelope {
    code: u16,
    success: bool,
    message: String,
    result: Option<Map<String, Value>>,
}

impl Envelope {
    /// Wraps `result` with `status` and `message`.
    ///
    /// Fails with [`Error::EnvelopeShape`] when `result` is present but is
    /// not a JSON object.
    pub fn new(
        result: Option<Value>,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Result<Self, Error> {
        let result = match result {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => return Err(Error::EnvelopeShape(kind(&other))),
        };
        Ok(Self::build(result, status, message.into()))
    }

    /// `{key: value}` as the result.
    pub fn data(
        status: StatusCode,
        key: &str,
        value: impl Serialize,
        message: impl Into<String>,
    ) -> Result<Self, Error> {
        let mut map = Map::new();
        map.insert(key.to_owned(), serde_json::to_value(value)?);
        Self::new(Some(Value::Object(map)), status, message)
    }

    /// No result, just a status and a message.
    pub fn plain(status: StatusCode, message: impl Into<String>) -> Self {
        Self::build(None, status, message.into())
    }

    fn build(result: Option<Map<String, Value>>, status: StatusCode, message: String) -> Self {
        Self {
            code: status.as_u16(),
            success: status.is_success(),
            message,
            result,
        }
    }

    pub fn code(&self) -> u16 { self.code }
    pub fn success(&self) -> bool { self.success }
    pub fn message(&self) -> &str { &self.message }
    pub fn result(&self) -> Option<&Map<String, Value>> { self.result.as_ref() }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = self.status();
        match serde_json::to_vec(&self) {
            Ok(bytes) => Response::builder().status(status).json(bytes),
            Err(e) => {
                error!("failed to serialise envelope: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "handler failed");
        }
        Envelope::plain(status, self.public_message()).into_response()
    }
}

impl<T: IntoResponse> IntoResponse for Result<T, Error> {
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(e) => e.into_response(),
        }
    }
}
