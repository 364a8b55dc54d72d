//! Blocking counterpart of [`Client`](crate::Client), for callers without an
//! async runtime. Enabled by the `blocking` feature.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::exchange::Exchange;
use crate::request::{ClientConfig, SignedRequest, TransportResponse};
use crate::{AccessToken, Credentials, ProviderEndpoints, RequestToken, Result};

/// Sends a [`SignedRequest`] on the calling thread.
pub trait Transport: Send + Sync {
    fn send(&self, request: SignedRequest) -> Result<TransportResponse>;
}

impl Transport for reqwest::blocking::Client {
    fn send(&self, request: SignedRequest) -> Result<TransportResponse> {
        let method = request.method().clone();
        let resp = reqwest::blocking::Client::request(self, method, request.into_url()).send()?;
        let status = resp.status();
        let body = resp.text()?;
        Ok(TransportResponse { status, body })
    }
}

#[derive(Debug, Clone)]
pub struct Client<T = reqwest::blocking::Client> {
    exchange: Exchange,
    transport: T,
}

impl Client<reqwest::blocking::Client> {
    pub fn new(credentials: Credentials, endpoints: ProviderEndpoints) -> Result<Self> {
        Client::with_config(credentials, endpoints, &ClientConfig::default())
    }

    pub fn with_config(
        credentials: Credentials,
        endpoints: ProviderEndpoints,
        config: &ClientConfig,
    ) -> Result<Self> {
        Ok(Client::with_transport(credentials, endpoints, config.build_blocking()?))
    }
}

impl<T> Client<T>
where
    T: Transport,
{
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

    pub fn request_token(&self, callback_url: &str) -> Result<RequestToken> {
        let req = self.exchange.prepare_request_token(callback_url)?;
        let token = self.exchange.read_request_token(self.transport.send(req)?)?;
        debug!(request_token = %token.token, "obtained request token");
        Ok(token)
    }

    pub fn authorize_url(&self, request_token: &RequestToken) -> Url {
        self.exchange.authorize_url(request_token)
    }

    pub fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken> {
        let req = self.exchange.prepare_access_token(request_token, verifier)?;
        let token = self.exchange.read_access_token(self.transport.send(req)?)?;
        debug!("obtained access token");
        Ok(token)
    }

    pub fn request<P>(&self, access_token: &AccessToken, params: &P) -> Result<String>
    where
        P: Serialize + ?Sized,
    {
        let req = self.exchange.prepare_resource_request(access_token, params)?;
        self.exchange.read_resource(self.transport.send(req)?)
    }
}
