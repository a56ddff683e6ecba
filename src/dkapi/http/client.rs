use super::{HttpRequest, HttpResponse, RequestBody, Transport};
use crate::error::{DkapiError, Result};
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// Blocking transport backed by `reqwest`.
///
/// The login emulation is a browser session, so both clients share one
/// cookie jar; only the redirect policy differs.
pub struct ReqwestTransport {
    following: Client,
    direct: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let following = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;
        let direct = Client::builder()
            .cookie_provider(jar)
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self { following, direct })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let client = if request.follow_redirects {
            &self.following
        } else {
            &self.direct
        };

        let mut builder = client.post(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(pairs) => builder.form(pairs),
            RequestBody::Json(value) => builder.json(value),
        };

        tracing::debug!(url = %request.url.path(), "POST");
        let response = builder.send().map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// The token URL carries the client secret in its query, so the URL is
/// stripped before the error is rendered. Causes are folded into the message.
fn transport_error(e: reqwest::Error) -> DkapiError {
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    DkapiError::Transport(message)
}
