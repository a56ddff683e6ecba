//! New authorization.
//!
//! The provider only hands out codes to a logged-in browser session, so the
//! flow emulates one:
//!
//! 1. POST the step-one URL and expect `200` with an HTML login form.
//! 2. POST the credentials to the form's action without following redirects
//!    and expect `302` whose `Location` carries `?code=...`.
//! 3. POST the step-two URL (code plus client credentials) to the token
//!    endpoint and expect a `2xx` JSON body with both tokens.
//!
//! Steps run strictly in order; any failure aborts with [`DkapiError::Auth`]
//! and the auth context is only written after step 3 succeeds.

use super::urls;
use crate::config::Endpoints;
use crate::error::{DkapiError, Result};
use crate::form;
use crate::http::{trace_response, HttpRequest, HttpResponse, Transport};
use crate::model::{mask_secret, State, TokenGrant};
use chrono::Local;
use serde::Deserialize;

pub const STAGE_FORM: &str = "authorization step one (login form)";
pub const STAGE_LOGIN: &str = "authorization step one (login)";
pub const STAGE_TOKEN: &str = "authorization step two (token exchange)";

const USERNAME_FIELD: &str = "pf.username";
const PASSWORD_FIELD: &str = "pf.pass";
const SUBMIT_FIELD: &str = "pf.ok";
const SUBMIT_VALUE: &str = "clicked";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Steps 1 and 2: log in and return the authorization code.
pub fn request_code<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    state: &State,
) -> Result<String> {
    let authorize_url = urls::authorization_url(endpoints, state)?;

    tracing::debug!("requesting the login form");
    let response = transport.send(HttpRequest::post(authorize_url.clone()))?;
    trace_response("authorization", &response);
    if response.status != 200 {
        return Err(unexpected(STAGE_FORM, "expected 200", &response));
    }

    let action = form::extract_form_action(&response.body)?;
    let login_url = endpoints.sso_host().join(&action)?;

    tracing::debug!("submitting credentials to the login form");
    let request = HttpRequest::post(login_url)
        .header("Referer", authorize_url.as_str())
        .form([
            (USERNAME_FIELD, state.login_name.as_str()),
            (PASSWORD_FIELD, state.login_password.as_str()),
            (SUBMIT_FIELD, SUBMIT_VALUE),
        ])
        .without_redirects();
    let response = transport.send(request)?;
    trace_response("login", &response);
    // A stale session can answer with another click-through page instead.
    if response.status != 302 {
        return Err(unexpected(STAGE_LOGIN, "expected a 302 redirect", &response));
    }

    let location = response
        .header("Location")
        .ok_or_else(|| unexpected(STAGE_LOGIN, "redirect has no Location header", &response))?;
    let code = urls::code_from_location(location, endpoints.sso_host()).ok_or_else(|| {
        unexpected(
            STAGE_LOGIN,
            &format!("no code in Location header '{}'", location),
            &response,
        )
    })?;

    tracing::debug!(code = %mask_secret(&code), "received an authorization code");
    Ok(code)
}

/// Step 3: trade an authorization code for tokens.
pub fn exchange_code<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    state: &State,
    code: &str,
) -> Result<TokenGrant> {
    let url = urls::token_url(endpoints, state, code)?;

    tracing::debug!("exchanging the authorization code for tokens");
    let response = transport.send(HttpRequest::post(url))?;
    trace_response("token exchange", &response);
    if !response.is_success() {
        return Err(unexpected(STAGE_TOKEN, "expected a 2xx status", &response));
    }

    parse_token_grant(&response, STAGE_TOKEN)
}

/// Full new authorization; writes the tokens into the auth context.
pub fn run<T: Transport>(transport: &T, endpoints: &Endpoints, state: &mut State) -> Result<()> {
    let code = request_code(transport, endpoints, state)?;
    let grant = exchange_code(transport, endpoints, state, &code)?;
    store_grant(state, grant);
    Ok(())
}

/// Exchange a code obtained out-of-band and store the tokens.
pub fn run_with_code<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    state: &mut State,
    code: &str,
) -> Result<()> {
    let grant = exchange_code(transport, endpoints, state, code)?;
    store_grant(state, grant);
    Ok(())
}

pub(crate) fn parse_token_grant(response: &HttpResponse, stage: &'static str) -> Result<TokenGrant> {
    let parsed: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
        DkapiError::auth(stage, format!("unreadable token response: {}", e))
    })?;
    Ok(TokenGrant {
        access_token: parsed.access_token,
        refresh_token: parsed.refresh_token,
        expires_in: parsed.expires_in,
    })
}

fn store_grant(state: &mut State, grant: TokenGrant) {
    let ctx = &mut state.auth_context;
    ctx.access_token = Some(grant.access_token);
    ctx.refresh_token = Some(grant.refresh_token);
    if grant.expires_in.is_some() {
        ctx.expires_in = grant.expires_in;
    }
    ctx.generated_at = Some(Local::now().naive_local());
    tracing::debug!(
        access_token = %mask_secret(ctx.access_token().unwrap_or_default()),
        "stored new token pair"
    );
}

fn unexpected(stage: &'static str, what: &str, response: &HttpResponse) -> DkapiError {
    DkapiError::auth(stage, format!("{}\n{}", what, response.diagnostic()))
}
