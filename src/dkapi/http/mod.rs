//! # HTTP Transport
//!
//! Every remote call this client makes is a single POST whose outcome is
//! judged by status code, headers and body text. The [`Transport`] trait
//! captures exactly that, so the auth flow and the search client can be
//! exercised against [`mock::MockTransport`] without a network.
//!
//! - [`client::ReqwestTransport`]: production transport on `reqwest::blocking`
//! - [`mock::MockTransport`]: scripted responses for tests

use crate::error::Result;
use serde_json::Value;
use std::fmt;
use url::Url;

pub mod client;
#[cfg(any(test, feature = "test_utils"))]
pub mod mock;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Form(Vec<(String, String)>),
    Json(Value),
}

/// A POST request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub follow_redirects: bool,
}

impl HttpRequest {
    pub fn post(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
            body: RequestBody::Empty,
            follow_redirects: true,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn form<K: Into<String>, V: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    pub fn form_value(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Status, headers and body in one block, for error reports.
    pub fn diagnostic(&self) -> ResponseDiagnostic<'_> {
        ResponseDiagnostic(self)
    }
}

pub struct ResponseDiagnostic<'a>(&'a HttpResponse);

impl fmt::Display for ResponseDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Response code: {}", self.0.status)?;
        writeln!(f, "********** RESPONSE HEADERS START **********")?;
        for (name, value) in &self.0.headers {
            writeln!(f, "{}: {}", name, value)?;
        }
        writeln!(f, "********** RESPONSE HEADERS END **********")?;
        write!(f, "{}", self.0.body)
    }
}

pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Log response headers at debug level.
pub(crate) fn trace_response(operation: &str, response: &HttpResponse) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    tracing::debug!(operation, status = response.status, "response received");
    for (name, value) in &response.headers {
        tracing::debug!(operation, "{}: {}", name, value);
    }
}
