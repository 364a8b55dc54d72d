use std::collections::HashMap;

use crate::request::TransportResponse;
use crate::{
    ProtocolError, ProtocolResult, OAUTH_CALLBACK_CONFIRMED_KEY, OAUTH_PROBLEM_KEY,
    OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY,
};

/// Represents response of token acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents
    pub remain: HashMap<String, String>,
}

/// Decodes a form-urlencoded body, keeping the first value of each name.
pub(crate) fn read_form(text: &str) -> ProtocolResult<HashMap<String, String>> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(text)
        .map_err(|e| ProtocolError::MalformedBody(e.to_string()))?;
    let mut form = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        form.entry(key).or_insert(value);
    }
    Ok(form)
}

/// Turns a non-success status into [`ProtocolError::Rejected`], carrying the
/// raw body and the provider's `oauth_problem` when the body has one.
pub(crate) fn check_status(resp: &TransportResponse) -> ProtocolResult<()> {
    if resp.status.is_success() {
        return Ok(());
    }
    let problem = read_form(&resp.body)
        .ok()
        .and_then(|mut form| form.remove(OAUTH_PROBLEM_KEY));
    Err(ProtocolError::Rejected {
        status: resp.status,
        problem,
        body: resp.body.clone(),
    })
}

pub(crate) fn take_field(
    form: &mut HashMap<String, String>,
    key: &'static str,
) -> ProtocolResult<String> {
    match form.remove(key) {
        Some(value) if value.is_empty() => Err(ProtocolError::EmptyField(key)),
        Some(value) => Ok(value),
        None => Err(ProtocolError::TokenKeyNotFound(key)),
    }
}

/// Extracts `oauth_token` and `oauth_token_secret`; both must be present and
/// non-empty.
pub fn read_oauth_token(text: &str) -> ProtocolResult<TokenResponse> {
    let mut destructured = read_form(text)?;
    let oauth_token = take_field(&mut destructured, OAUTH_TOKEN_KEY)?;
    let oauth_token_secret = take_field(&mut destructured, OAUTH_TOKEN_SECRET_KEY)?;
    Ok(TokenResponse {
        oauth_token,
        oauth_token_secret,
        remain: destructured,
    })
}

/// Like [`read_oauth_token`], additionally requiring
/// `oauth_callback_confirmed=true`.
pub fn read_request_token(text: &str) -> ProtocolResult<TokenResponse> {
    let resp = read_oauth_token(text)?;
    match resp.remain.get(OAUTH_CALLBACK_CONFIRMED_KEY) {
        Some(confirmed) if confirmed == "true" => Ok(resp),
        other => Err(ProtocolError::CallbackNotConfirmed(other.cloned())),
    }
}
