use crate::config::Endpoints;
use crate::error::{DkapiError, Result};
use crate::model::State;
use url::Url;

/// Step-one URL: the authorization endpoint asking for a code.
pub fn authorization_url(endpoints: &Endpoints, state: &State) -> Result<Url> {
    let mut url = endpoints.authorize_url()?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &state.client_id)
        .append_pair("redirect_uri", &state.redirect_uri);
    Ok(url)
}

/// Step-two URL: the token endpoint trading `code` for tokens.
pub fn token_url(endpoints: &Endpoints, state: &State, code: &str) -> Result<Url> {
    let mut url = endpoints.token_url()?;
    url.query_pairs_mut()
        .append_pair("grant_type", "authorization_code")
        .append_pair("code", code)
        .append_pair("client_id", &state.client_id)
        .append_pair("client_secret", &state.client_secret)
        .append_pair("redirect_uri", &state.redirect_uri);
    Ok(url)
}

/// Pull the `code` query value out of a redirect target. Relative targets
/// are resolved against `base`.
pub fn code_from_location(location: &str, base: &Url) -> Option<String> {
    let url = base.join(location.trim()).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .filter(|code| !code.is_empty())
}

/// Accept either a bare authorization code or the full redirect URL the
/// browser landed on.
pub fn normalize_code(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DkapiError::Api("The authorization code is empty".to_string()));
    }
    match Url::parse(input) {
        Ok(url) if url.has_host() => url
            .query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| DkapiError::Api(format!("No 'code' parameter in {}", input))),
        _ => Ok(input.to_string()),
    }
}
