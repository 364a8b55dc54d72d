use std::{env, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ConfigError;

const REDACTED: &str = "<redacted>";

/// Access to the consumer pair and, once a token is held, the token pair used
/// to derive the signing key.
pub trait SecretsProvider {
    fn get_consumer_key_pair(&self) -> (&str, &str);

    fn get_token_pair_option(&self) -> Option<(&str, &str)>;

    fn get_token_option_pair(&self) -> (Option<&str>, Option<&str>) {
        self.get_token_pair_option()
            .map(|s| (Some(s.0), Some(s.1)))
            .unwrap_or((None, None))
    }
}

/// Application identity registered with an OAuth1 provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
}

impl Credentials {
    /// Builds credentials, refusing blank values so nothing is ever signed
    /// with an empty consumer pair.
    pub fn new<TKey, TSecret>(
        consumer_key: TKey,
        consumer_secret: TSecret,
    ) -> Result<Self, ConfigError>
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        let consumer_key = consumer_key.into();
        let consumer_secret = consumer_secret.into();
        if consumer_key.is_empty() {
            return Err(ConfigError::EmptyConsumerKey);
        }
        if consumer_secret.is_empty() {
            return Err(ConfigError::EmptyConsumerSecret);
        }
        Ok(Credentials {
            consumer_key,
            consumer_secret,
        })
    }

    /// Reads `<PROVIDER>_API_CONSUMER_KEY` and `<PROVIDER>_API_CONSUMER_SECRET`.
    pub fn from_env(provider: &str) -> Result<Self, ConfigError> {
        let prefix = provider.to_uppercase();
        let key_var = format!("{}_API_CONSUMER_KEY", prefix);
        let secret_var = format!("{}_API_CONSUMER_SECRET", prefix);
        let consumer_key =
            env::var(&key_var).map_err(|_| ConfigError::MissingEnv(key_var.clone()))?;
        let consumer_secret =
            env::var(&secret_var).map_err(|_| ConfigError::MissingEnv(secret_var.clone()))?;
        debug!(%key_var, %secret_var, "loaded consumer credentials from environment");
        Credentials::new(consumer_key, consumer_secret)
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Pairs these credentials with a token for signing on its behalf.
    pub fn token<'a>(&'a self, token: &'a str, token_secret: &'a str) -> Secrets<'a> {
        Secrets {
            credentials: self,
            token,
            token_secret,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &REDACTED)
            .finish()
    }
}

impl SecretsProvider for Credentials {
    fn get_consumer_key_pair(&self) -> (&str, &str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option(&self) -> Option<(&str, &str)> {
        None
    }
}

/// Consumer credentials borrowed together with a token pair.
#[derive(Clone, Copy)]
pub struct Secrets<'a> {
    credentials: &'a Credentials,
    token: &'a str,
    token_secret: &'a str,
}

impl fmt::Debug for Secrets<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("credentials", self.credentials)
            .field("token", &self.token)
            .field("token_secret", &REDACTED)
            .finish()
    }
}

impl SecretsProvider for Secrets<'_> {
    fn get_consumer_key_pair(&self) -> (&str, &str) {
        self.credentials.get_consumer_key_pair()
    }

    fn get_token_pair_option(&self) -> Option<(&str, &str)> {
        Some((self.token, self.token_secret))
    }
}

/// Temporary credentials returned by the first leg. Must be kept by the
/// caller until the user comes back from the authorization page.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    pub token: String,
    pub token_secret: String,
}

impl RequestToken {
    pub fn new<T: Into<String>, S: Into<String>>(token: T, token_secret: S) -> Self {
        RequestToken {
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestToken")
            .field("token", &self.token)
            .field("token_secret", &REDACTED)
            .finish()
    }
}

/// Long-lived credentials granted for one user. Persisting them is up to the
/// caller.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub secret: String,
}

impl AccessToken {
    pub fn new<T: Into<String>, S: Into<String>>(token: T, secret: S) -> Self {
        AccessToken {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &self.token)
            .field("secret", &REDACTED)
            .finish()
    }
}
