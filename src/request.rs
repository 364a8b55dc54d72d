use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use url::Url;

use crate::{Error, Result};

/// A request whose query string already carries every OAuth parameter and
/// the signature. Nothing else needs to be added before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    url: Url,
}

impl SignedRequest {
    pub(crate) fn new(method: Method, url: Url) -> Self {
        SignedRequest { method, url }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

/// Status and body of a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TransportResponse {
    pub fn new<T: Into<String>>(status: StatusCode, body: T) -> Self {
        TransportResponse {
            status,
            body: body.into(),
        }
    }

    pub fn ok<T: Into<String>>(body: T) -> Self {
        TransportResponse::new(StatusCode::OK, body)
    }
}

/// Sends a [`SignedRequest`] and hands back the raw response.
///
/// Network failures map to [`Error::Transport`]; a non-success status is
/// still a response and is judged by the caller. Timeouts and cancellation
/// belong to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SignedRequest) -> Result<TransportResponse>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: SignedRequest) -> Result<TransportResponse> {
        let SignedRequest { method, url } = request;
        let resp = reqwest::Client::request(self, method, url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl<T> Transport for std::sync::Arc<T>
where
    T: Transport + ?Sized,
{
    async fn send(&self, request: SignedRequest) -> Result<TransportResponse> {
        (**self).send(request).await
    }
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for the reqwest client built by [`Client::new`](crate::Client::new).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Applied from connect until the response body has finished.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(self, timeout: Duration) -> Self {
        ClientConfig { timeout, ..self }
    }

    pub fn user_agent<T: Into<String>>(self, user_agent: T) -> Self {
        ClientConfig {
            user_agent: user_agent.into(),
            ..self
        }
    }

    pub fn build(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(Error::from)
    }

    #[cfg(feature = "blocking")]
    pub fn build_blocking(&self) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(Error::from)
    }
}
