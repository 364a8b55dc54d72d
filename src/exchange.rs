//! Transport-independent legs of the three-legged OAuth1 flow.
//!
//! ```text
//! Unauthorized --request token--> RequestTokenObtained
//!     --user authorizes (out of band)--> UserAuthorized
//!     --access token--> AccessTokenObtained
//! ```
//!
//! Each leg is split in a `prepare_*` half that signs a request and a
//! `read_*` half that interprets the provider's answer, so the async and
//! blocking clients share everything but the send.

use http::Method;
use serde::Serialize;
use url::Url;

use crate::encoding::Parameters;
use crate::request::{SignedRequest, TransportResponse};
use crate::token_reader::{check_status, read_oauth_token, read_request_token};
use crate::{
    AccessToken, Credentials, OAuthParameters, ProviderEndpoints, RequestToken, Result,
    SecretsProvider, Signer, Verifier, OAUTH_TOKEN_KEY,
};

/// Consumer credentials bound to one provider.
#[derive(Debug, Clone)]
pub struct Exchange {
    credentials: Credentials,
    endpoints: ProviderEndpoints,
}

impl Exchange {
    pub fn new(credentials: Credentials, endpoints: ProviderEndpoints) -> Self {
        Exchange {
            credentials,
            endpoints,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }

    fn sign<S: SecretsProvider>(
        &self,
        secrets: &S,
        parameters: OAuthParameters<'_>,
        url: &Url,
        params: Parameters,
    ) -> Result<SignedRequest> {
        Ok(Signer::new(secrets, parameters).sign_request(Method::GET, url, params)?)
    }

    /// Leg 1: signed with the consumer secret only.
    pub fn prepare_request_token(&self, callback_url: &str) -> Result<SignedRequest> {
        self.sign(
            &self.credentials,
            OAuthParameters::new().callback(callback_url),
            self.endpoints.request_token_url(),
            Parameters::new(),
        )
    }

    pub fn read_request_token(&self, resp: TransportResponse) -> Result<RequestToken> {
        check_status(&resp)?;
        let token = read_request_token(&resp.body)?;
        Ok(RequestToken::new(token.oauth_token, token.oauth_token_secret))
    }

    /// Where the user approves the request token. No request is made.
    pub fn authorize_url(&self, request_token: &RequestToken) -> Url {
        let mut url = self.endpoints.authorize_url().clone();
        url.query_pairs_mut()
            .append_pair(OAUTH_TOKEN_KEY, &request_token.token);
        url
    }

    /// Leg 3: the verifier is checked against the provider's policy before
    /// anything is signed.
    pub fn prepare_access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<SignedRequest> {
        let verifier = Verifier::parse(verifier, self.endpoints.policy())?;
        let secrets = self
            .credentials
            .token(&request_token.token, &request_token.token_secret);
        self.sign(
            &secrets,
            OAuthParameters::new().verifier(verifier.as_str()),
            self.endpoints.access_token_url(),
            Parameters::new(),
        )
    }

    pub fn read_access_token(&self, resp: TransportResponse) -> Result<AccessToken> {
        check_status(&resp)?;
        let token = read_oauth_token(&resp.body)?;
        Ok(AccessToken::new(token.oauth_token, token.oauth_token_secret))
    }

    /// A resource call on behalf of the holder of `access_token`.
    pub fn prepare_resource_request<T>(
        &self,
        access_token: &AccessToken,
        params: &T,
    ) -> Result<SignedRequest>
    where
        T: Serialize + ?Sized,
    {
        let params = Parameters::from_serialize(params)?;
        let secrets = self
            .credentials
            .token(&access_token.token, &access_token.secret);
        self.sign(
            &secrets,
            OAuthParameters::new(),
            self.endpoints.resource_url(),
            params,
        )
    }

    pub fn read_resource(&self, resp: TransportResponse) -> Result<String> {
        check_status(&resp)?;
        Ok(resp.body)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::encoding::base_string;
    use crate::signer::sign;
    use crate::{
        EncodingError, Error, VerifierPolicy, OAUTH_CALLBACK_KEY, OAUTH_SIGNATURE_KEY,
        OAUTH_VERIFIER_KEY,
    };

    fn exchange(policy: VerifierPolicy) -> Exchange {
        Exchange::new(
            Credentials::new("consumer-key", "consumer-secret").unwrap(),
            ProviderEndpoints::new(
                "http://provider.test/oauth/request_token",
                "http://provider.test/oauth/authorize",
                "http://provider.test/oauth/access_token",
                "http://api.provider.test/rest/server.api",
            )
            .unwrap()
            .verifier_policy(policy),
        )
    }

    fn query_of(request: &SignedRequest) -> HashMap<String, String> {
        request.url().query_pairs().into_owned().collect()
    }

    /// Recomputes the signature the way the provider does.
    fn verify(request: &SignedRequest, token_secret: Option<&str>) {
        let mut query = query_of(request);
        let signature = query.remove(OAUTH_SIGNATURE_KEY).unwrap();
        let mut url = request.url().clone();
        url.set_query(None);
        let params: Parameters = query.into_iter().collect();
        let base = base_string(request.method(), &url, &params);
        assert_eq!(sign(&base, "consumer-secret", token_secret).unwrap(), signature);
    }

    #[test]
    fn request_token_leg_is_signed_without_token() {
        let exchange = exchange(VerifierPolicy::Opaque);
        let req = exchange.prepare_request_token("http://app.test/callback").unwrap();
        let query = query_of(&req);

        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.url().path(), "/oauth/request_token");
        assert_eq!(query.get(OAUTH_CALLBACK_KEY).unwrap(), "http://app.test/callback");
        assert!(!query.contains_key(OAUTH_TOKEN_KEY));
        assert_eq!(query.get("oauth_version").unwrap(), "1.0");
        verify(&req, None);
    }

    #[test]
    fn authorize_url_appends_token() {
        let exchange = exchange(VerifierPolicy::Opaque);
        let url = exchange.authorize_url(&RequestToken::new("a5d5e068 b1", "secret"));
        assert_eq!(
            url.as_str(),
            "http://provider.test/oauth/authorize?oauth_token=a5d5e068+b1"
        );
    }

    #[test]
    fn access_token_leg_uses_request_token_secret() {
        let exchange = exchange(VerifierPolicy::Numeric);
        let request_token = RequestToken::new("rt", "rt-secret");
        let req = exchange.prepare_access_token(&request_token, "7009457").unwrap();
        let query = query_of(&req);

        assert_eq!(query.get(OAUTH_TOKEN_KEY).unwrap(), "rt");
        assert_eq!(query.get(OAUTH_VERIFIER_KEY).unwrap(), "7009457");
        assert!(!query.contains_key(OAUTH_CALLBACK_KEY));
        verify(&req, Some("rt-secret"));
    }

    #[test]
    fn bad_verifier_is_refused_before_signing() {
        let exchange = exchange(VerifierPolicy::Numeric);
        let request_token = RequestToken::new("rt", "rt-secret");
        assert!(matches!(
            exchange.prepare_access_token(&request_token, "abc"),
            Err(Error::Encoding(EncodingError::NonNumericVerifier))
        ));
    }

    #[test]
    fn resource_request_merges_caller_parameters() {
        let exchange = exchange(VerifierPolicy::Opaque);
        let access_token = AccessToken::new("at", "at-secret");
        let req = exchange
            .prepare_resource_request(
                &access_token,
                &[("method", "weights.get_month"), ("format", "json")],
            )
            .unwrap();
        let query = query_of(&req);

        assert_eq!(req.url().host_str(), Some("api.provider.test"));
        assert_eq!(query.get("method").unwrap(), "weights.get_month");
        assert_eq!(query.get("format").unwrap(), "json");
        assert_eq!(query.get(OAUTH_TOKEN_KEY).unwrap(), "at");
        verify(&req, Some("at-secret"));
    }

    #[test]
    fn responses_are_interpreted_per_leg() {
        let exchange = exchange(VerifierPolicy::Opaque);
        let token = exchange
            .read_access_token(TransportResponse::ok("oauth_token=T2&oauth_token_secret=S2"))
            .unwrap();
        assert_eq!(token, AccessToken::new("T2", "S2"));

        let body = exchange
            .read_resource(TransportResponse::ok("{\"weight\":[]}"))
            .unwrap();
        assert_eq!(body, "{\"weight\":[]}");
    }
}
