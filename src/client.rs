use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::exchange::Exchange;
use crate::request::{ClientConfig, Transport};
use crate::{AccessToken, Credentials, ProviderEndpoints, RequestToken, Result};

/// OAuth1 client for one provider.
///
/// Holds no per-user state: every call takes the token it acts for, so one
/// instance can serve concurrent exchanges of many users.
#[derive(Debug, Clone)]
pub struct Client<T = reqwest::Client> {
    exchange: Exchange,
    transport: T,
}

impl Client<reqwest::Client> {
    /// Constructs a new `Client` with a default reqwest client.
    pub fn new(credentials: Credentials, endpoints: ProviderEndpoints) -> Result<Self> {
        Client::with_config(credentials, endpoints, &ClientConfig::default())
    }

    /// Constructs a new `Client` whose reqwest client honours `config`.
    pub fn with_config(
        credentials: Credentials,
        endpoints: ProviderEndpoints,
        config: &ClientConfig,
    ) -> Result<Self> {
        Ok(Client::with_transport(credentials, endpoints, config.build()?))
    }
}

impl<T> Client<T>
where
    T: Transport,
{
    /// Constructs a new `Client` sending through `transport`.
    pub fn with_transport(
        credentials: Credentials,
        endpoints: ProviderEndpoints,
        transport: T,
    ) -> Self {
        Client {
            exchange: Exchange::new(credentials, endpoints),
            transport,
        }
    }

    pub fn endpoints(&self) -> &ProviderEndpoints {
        self.exchange.endpoints()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Step 1: obtain a request token. The provider must confirm
    /// `callback_url`.
    #[instrument(skip_all, fields(endpoint = %self.exchange.endpoints().request_token_url()))]
    pub async fn request_token(&self, callback_url: &str) -> Result<RequestToken> {
        let req = self.exchange.prepare_request_token(callback_url)?;
        let resp = self.transport.send(req).await?;
        let token = self.exchange.read_request_token(resp)?;
        debug!(request_token = %token.token, "obtained request token");
        Ok(token)
    }

    /// Step 2: the page the user must visit to approve `request_token`.
    pub fn authorize_url(&self, request_token: &RequestToken) -> Url {
        self.exchange.authorize_url(request_token)
    }

    /// Step 3: trade the approved request token and the verifier from the
    /// callback for an access token.
    #[instrument(skip_all, fields(endpoint = %self.exchange.endpoints().access_token_url()))]
    pub async fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken> {
        let req = self.exchange.prepare_access_token(request_token, verifier)?;
        let resp = self.transport.send(req).await?;
        let token = self.exchange.read_access_token(resp)?;
        debug!("obtained access token");
        Ok(token)
    }

    /// Signed GET to the resource URL. The body is returned unparsed.
    #[instrument(skip_all, fields(endpoint = %self.exchange.endpoints().resource_url()))]
    pub async fn request<P>(&self, access_token: &AccessToken, params: &P) -> Result<String>
    where
        P: Serialize + ?Sized,
    {
        let req = self.exchange.prepare_resource_request(access_token, params)?;
        let resp = self.transport.send(req).await?;
        debug!(status = %resp.status, bytes = resp.body.len(), "resource response");
        self.exchange.read_resource(resp)
    }
}
