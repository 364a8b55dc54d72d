//! Carrying a request token across the user's trip to the authorization page.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::token_reader::{read_form, take_field};
use crate::{ProtocolError, ProtocolResult, RequestToken, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY};

/// Query parameters the provider appends when redirecting the user back,
/// e.g. `?oauth_token=a5d5e068b1f04b158df7dbc2fc4f8a2f&oauth_verifier=7009457`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCallback {
    pub oauth_token: String,
    pub oauth_verifier: String,
}

impl AuthorizationCallback {
    pub fn from_query(query: &str) -> ProtocolResult<Self> {
        let mut form = read_form(query)?;
        Ok(AuthorizationCallback {
            oauth_token: take_field(&mut form, OAUTH_TOKEN_KEY)?,
            oauth_verifier: take_field(&mut form, OAUTH_VERIFIER_KEY)?,
        })
    }
}

struct Pending {
    token_secret: String,
    issued: Instant,
}

fn drop_expired(pending: &mut HashMap<String, Pending>, ttl: Duration) -> usize {
    let before = pending.len();
    pending.retain(|_, p| p.issued.elapsed() <= ttl);
    before - pending.len()
}

/// Request tokens awaiting the user's return, keyed by token.
///
/// Entries are handed out at most once and expire after `ttl`.
pub struct PendingAuthorizations {
    ttl: Duration,
    pending: Mutex<HashMap<String, Pending>>,
}

impl PendingAuthorizations {
    pub fn new(ttl: Duration) -> Self {
        PendingAuthorizations {
            ttl,
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `request_token`, dropping any expired entries first so tokens
    /// of users who never come back do not accumulate.
    pub fn insert(&self, request_token: RequestToken) {
        let RequestToken { token, token_secret } = request_token;
        let mut pending = self.lock();
        let expired = drop_expired(&mut pending, self.ttl);
        if expired > 0 {
            debug!(expired, "dropped expired pending authorizations");
        }
        pending.insert(
            token,
            Pending {
                token_secret,
                issued: Instant::now(),
            },
        );
    }

    /// Removes and returns the request token, or `None` if it was never
    /// stored, already taken, or has expired.
    pub fn take(&self, token: &str) -> Option<RequestToken> {
        let pending = self.lock().remove(token)?;
        if pending.issued.elapsed() > self.ttl {
            debug!(request_token = %token, "pending authorization expired");
            return None;
        }
        Some(RequestToken::new(token, pending.token_secret))
    }

    /// Matches a callback to the request token it answers.
    pub fn complete(&self, callback: &AuthorizationCallback) -> ProtocolResult<RequestToken> {
        self.take(&callback.oauth_token)
            .ok_or(ProtocolError::UnknownRequestToken)
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        drop_expired(&mut self.lock(), self.ttl)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for PendingAuthorizations {
    /// Ten minutes, comfortably longer than providers keep request tokens.
    fn default() -> Self {
        PendingAuthorizations::new(Duration::from_secs(600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_query_is_parsed() {
        let callback = AuthorizationCallback::from_query(
            "oauth_token=a5d5e068b1f04b158df7dbc2fc4f8a2f&oauth_verifier=7009457",
        )
        .unwrap();
        assert_eq!(callback.oauth_token, "a5d5e068b1f04b158df7dbc2fc4f8a2f");
        assert_eq!(callback.oauth_verifier, "7009457");

        assert_eq!(
            AuthorizationCallback::from_query("oauth_token=abc"),
            Err(ProtocolError::TokenKeyNotFound(OAUTH_VERIFIER_KEY))
        );
    }

    #[test]
    fn pending_token_is_taken_once() {
        let pending = PendingAuthorizations::default();
        pending.insert(RequestToken::new("rt", "rt-secret"));
        assert_eq!(pending.len(), 1);

        let callback = AuthorizationCallback {
            oauth_token: "rt".to_string(),
            oauth_verifier: "1".to_string(),
        };
        assert_eq!(pending.complete(&callback), Ok(RequestToken::new("rt", "rt-secret")));
        assert_eq!(pending.complete(&callback), Err(ProtocolError::UnknownRequestToken));
        assert!(pending.is_empty());
    }

    #[test]
    fn mismatched_callback_token_is_unknown() {
        let pending = PendingAuthorizations::default();
        pending.insert(RequestToken::new("rt", "rt-secret"));
        assert_eq!(pending.take("other"), None);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn expired_tokens_are_not_returned() {
        let pending = PendingAuthorizations::new(Duration::ZERO);
        pending.insert(RequestToken::new("rt", "rt-secret"));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(pending.take("rt"), None);

        pending.insert(RequestToken::new("rt2", "s"));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(pending.purge_expired(), 1);
        assert!(pending.is_empty());
    }

    #[test]
    fn abandoned_tokens_do_not_accumulate() {
        let pending = PendingAuthorizations::new(Duration::ZERO);
        for i in 0..1000 {
            pending.insert(RequestToken::new(format!("rt{}", i), "s"));
            std::thread::sleep(Duration::from_micros(10));
        }
        assert!(pending.len() <= 1);

        let pending = PendingAuthorizations::default();
        for i in 0..10 {
            pending.insert(RequestToken::new(format!("rt{}", i), "s"));
        }
        assert_eq!(pending.len(), 10);
    }
}
