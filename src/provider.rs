use serde::Deserialize;
use url::Url;

use crate::{ConfigError, VerifierPolicy};

/// The four fixed URLs of one OAuth1 provider.
///
/// The token and resource URLs double as signature base URLs, so they must
/// not carry a query string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawProviderEndpoints")]
pub struct ProviderEndpoints {
    request_token_url: Url,
    authorize_url: Url,
    access_token_url: Url,
    resource_url: Url,
    verifier_policy: VerifierPolicy,
}

#[derive(Deserialize)]
struct RawProviderEndpoints {
    request_token_url: String,
    authorize_url: String,
    access_token_url: String,
    resource_url: String,
    #[serde(default)]
    verifier_policy: VerifierPolicy,
}

impl TryFrom<RawProviderEndpoints> for ProviderEndpoints {
    type Error = ConfigError;

    fn try_from(raw: RawProviderEndpoints) -> Result<Self, Self::Error> {
        Ok(ProviderEndpoints::new(
            &raw.request_token_url,
            &raw.authorize_url,
            &raw.access_token_url,
            &raw.resource_url,
        )?
        .verifier_policy(raw.verifier_policy))
    }
}

fn parse_endpoint(name: &'static str, input: &str, allow_query: bool) -> Result<Url, ConfigError> {
    let url = Url::parse(input).map_err(|e| ConfigError::InvalidUrl(name, e))?;
    if !allow_query && url.query().is_some() {
        return Err(ConfigError::EndpointHasQuery(name));
    }
    Ok(url)
}

impl ProviderEndpoints {
    pub fn new(
        request_token_url: &str,
        authorize_url: &str,
        access_token_url: &str,
        resource_url: &str,
    ) -> Result<Self, ConfigError> {
        Ok(ProviderEndpoints {
            request_token_url: parse_endpoint("request_token_url", request_token_url, false)?,
            authorize_url: parse_endpoint("authorize_url", authorize_url, true)?,
            access_token_url: parse_endpoint("access_token_url", access_token_url, false)?,
            resource_url: parse_endpoint("resource_url", resource_url, false)?,
            verifier_policy: VerifierPolicy::default(),
        })
    }

    /// How `oauth_verifier` values returned by this provider are checked.
    pub fn verifier_policy(self, verifier_policy: VerifierPolicy) -> Self {
        ProviderEndpoints {
            verifier_policy,
            ..self
        }
    }

    pub fn request_token_url(&self) -> &Url {
        &self.request_token_url
    }

    pub fn authorize_url(&self) -> &Url {
        &self.authorize_url
    }

    pub fn access_token_url(&self) -> &Url {
        &self.access_token_url
    }

    pub fn resource_url(&self) -> &Url {
        &self.resource_url
    }

    pub fn policy(&self) -> VerifierPolicy {
        self.verifier_policy
    }
}
