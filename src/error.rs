//! Unified error type.

use http::StatusCode;
use thiserror::Error;

/// The error type returned by roster's fallible operations.
///
/// Application-level outcomes (404, 422, etc.) are expressed as
/// [`Envelope`](crate::Envelope) values, not as `Error`s. This type surfaces
/// infrastructure failures and programming errors. A handler that returns
/// one still answers with an envelope; see [`Error::status`].
#[derive(Debug, Error)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// An envelope was given a result that is not a JSON object.
    #[error("envelope result must be a JSON object, got {0}")]
    EnvelopeShape(&'static str),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The request body is not valid `application/x-www-form-urlencoded`.
    #[error("malformed form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// The request body could not be read off the connection, or exceeded
    /// the configured size limit.
    #[error("request body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// HTTP status used when this error reaches a client.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Form(_) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::EnvelopeShape(_) | Self::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the envelope. Internal details stay in the logs.
    pub(crate) fn public_message(&self) -> String {
        match self {
            Self::Form(_) | Self::Body(_) => self.to_string(),
            _ => "internal server error".to_owned(),
        }
    }
}
