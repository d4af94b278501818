//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, Method, Uri};

use crate::error::Error;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// An incoming HTTP request with its body fully read.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request by hand, e.g. for driving a [`Router`](crate::Router)
    /// without a socket. `uri` may carry a query string.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self::from_parts(method, uri, HeaderMap::new(), Bytes::new())
    }

    pub(crate) fn from_parts(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self { method, uri, headers, body, params: HashMap::new() }
    }

    /// Replaces the body with `fields` encoded as an urlencoded form.
    pub fn with_form(mut self, fields: &[(&str, &str)]) -> Self {
        // Encoding a slice of string pairs cannot fail.
        let encoded = serde_urlencoded::to_string(fields).unwrap_or_default();
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        self.body = Bytes::from(encoded);
        self
    }

    pub fn with_header(mut self, name: http::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the query string. Missing query → empty form.
    pub fn query(&self) -> Result<Form, Error> {
        Form::parse(self.uri.query().unwrap_or_default().as_bytes())
    }

    /// Decodes the body as an urlencoded form.
    ///
    /// Only bodies sent without a content type or as
    /// `application/x-www-form-urlencoded` are read; anything else yields an
    /// empty form, so every field looks absent.
    pub fn form(&self) -> Result<Form, Error> {
        match self.header(CONTENT_TYPE.as_str()) {
            None => Form::parse(&self.body),
            Some(ct) if media_type(ct).eq_ignore_ascii_case(FORM_URLENCODED) => {
                Form::parse(&self.body)
            }
            Some(_) => Ok(Form::default()),
        }
    }
}

fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

/// Decoded `key=value` pairs, from a body or a query string.
#[derive(Clone, Debug, Default)]
pub struct Form {
    fields: Vec<(String, String)>,
}

impl Form {
    fn parse(raw: &[u8]) -> Result<Self, Error> {
        Ok(Self { fields: serde_urlencoded::from_bytes(raw)? })
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
