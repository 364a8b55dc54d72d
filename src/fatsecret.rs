//! FatSecret platform API preset.
//!
//! See <https://platform.fatsecret.com/api/Default.aspx?screen=rapitlsa> for
//! the three-legged flow this provider expects.

use crate::request::Transport;
use crate::{
    AccessToken, Client, ConfigError, Credentials, ProviderEndpoints, Result, VerifierPolicy,
};

pub const PROVIDER_NAME: &str = "fatsecret";
pub const REQUEST_TOKEN_URL: &str = "http://www.fatsecret.com/oauth/request_token";
pub const AUTHORIZE_URL: &str = "http://www.fatsecret.com/oauth/authorize";
pub const ACCESS_TOKEN_URL: &str = "http://www.fatsecret.com/oauth/access_token";
pub const RESOURCE_URL: &str = "http://platform.fatsecret.com/rest/server.api";

/// FatSecret's endpoints. Its verifiers are numeric.
pub fn endpoints() -> std::result::Result<ProviderEndpoints, ConfigError> {
    Ok(
        ProviderEndpoints::new(REQUEST_TOKEN_URL, AUTHORIZE_URL, ACCESS_TOKEN_URL, RESOURCE_URL)?
            .verifier_policy(VerifierPolicy::Numeric),
    )
}

/// OAuth1 client preconfigured for FatSecret, with typed API calls.
#[derive(Debug, Clone)]
pub struct FatSecret<T = reqwest::Client> {
    client: Client<T>,
}

impl FatSecret<reqwest::Client> {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(FatSecret {
            client: Client::new(credentials, endpoints()?)?,
        })
    }

    /// Credentials from `FATSECRET_API_CONSUMER_KEY` and
    /// `FATSECRET_API_CONSUMER_SECRET`.
    pub fn from_env() -> Result<Self> {
        FatSecret::new(Credentials::from_env(PROVIDER_NAME)?)
    }
}

impl<T> FatSecret<T>
where
    T: Transport,
{
    pub fn with_transport(credentials: Credentials, transport: T) -> Result<Self> {
        Ok(FatSecret {
            client: Client::with_transport(credentials, endpoints()?, transport),
        })
    }

    /// The underlying client, for the authorization legs.
    pub fn oauth(&self) -> &Client<T> {
        &self.client
    }

    /// `weights.get_month` for the current month, as raw JSON.
    pub async fn weights_get_month(&self, access_token: &AccessToken) -> Result<String> {
        self.client
            .request(
                access_token,
                &[("method", "weights.get_month"), ("format", "json")],
            )
            .await
    }
}
