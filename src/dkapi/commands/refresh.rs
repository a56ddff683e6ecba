use super::authorize;
use crate::config::Endpoints;
use crate::error::{DkapiError, Result};
use crate::http::{trace_response, HttpRequest, Transport};
use crate::model::{AuthContext, State, TokenGrant};
use chrono::{Local, NaiveDateTime};
use serde_json::Value;

pub const STAGE_REFRESH: &str = "token refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPath {
    /// The refresh token was exchanged for a new token pair.
    Refreshed,
    /// No refresh token was stored, so a new authorization ran instead.
    Reauthorized,
}

/// Mint a new token pair from the stored refresh token, or run a full new
/// authorization when there is none.
pub fn run<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    state: &mut State,
) -> Result<RefreshPath> {
    let Some(refresh_token) = state.auth_context.refresh_token().map(str::to_string) else {
        tracing::debug!("REFRESH_TOKEN is missing, performing a new authorization");
        authorize::run(transport, endpoints, state)?;
        return Ok(RefreshPath::Reauthorized);
    };

    let request = HttpRequest::post(endpoints.token_url()?).form([
        ("refresh_token", refresh_token.as_str()),
        ("grant_type", "refresh_token"),
        ("client_id", state.client_id.as_str()),
        ("client_secret", state.client_secret.as_str()),
    ]);

    tracing::debug!("refreshing the access token");
    let response = transport.send(request)?;
    trace_response("refresh", &response);

    if !response.is_success() {
        let detail = match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => body.to_string(),
            Err(_) => response.body.clone(),
        };
        return Err(DkapiError::auth(
            STAGE_REFRESH,
            format!("Failed to refresh token ({}): {}", response.status, detail),
        ));
    }

    let grant = authorize::parse_token_grant(&response, STAGE_REFRESH)?;
    apply(&mut state.auth_context, grant, Local::now().naive_local());
    Ok(RefreshPath::Refreshed)
}

fn apply(ctx: &mut AuthContext, grant: TokenGrant, now: NaiveDateTime) {
    ctx.access_token = Some(grant.access_token);
    ctx.refresh_token = Some(grant.refresh_token);
    ctx.expires_in = grant.expires_in;
    ctx.generated_at = Some(now);
}
