use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

/// Boxed error produced by a [`Transport`](crate::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration : {0}")]
    Configuration(#[from] ConfigError),
    #[error("request failed : {0}")]
    Transport(#[source] BoxError),
    #[error("OAuth protocol failure : {0}")]
    Protocol(#[from] ProtocolError),
    #[error("unencodable request : {0}")]
    Encoding(#[from] EncodingError),
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("consumer key is empty")]
    EmptyConsumerKey,
    #[error("consumer secret is empty")]
    EmptyConsumerSecret,
    #[error("environment variable {0} is not set")]
    MissingEnv(String),
    #[error("{0} is not a valid URL: {1}")]
    InvalidUrl(&'static str, url::ParseError),
    #[error("{0} must not carry a query string, since it is used as the signature base URL")]
    EndpointHasQuery(&'static str),
}

#[derive(Error, Debug, Clone)]
pub enum SignError {
    #[error("failed to compute time since Unix Epoch, {0}")]
    Clock(#[from] std::time::SystemTimeError),
    #[error("HMAC-SHA1 rejected the signing key")]
    InvalidKey,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("provider did not confirm the callback (oauth_callback_confirmed = {0:?})")]
    CallbackNotConfirmed(Option<String>),
    #[error("response has malformed format: not found {0}")]
    TokenKeyNotFound(&'static str),
    #[error("response has malformed format: {0} is empty")]
    EmptyField(&'static str),
    #[error("callback names a request token that is unknown or expired")]
    UnknownRequestToken,
    #[error("response body is not form-urlencoded: {0}")]
    MalformedBody(String),
    #[error("provider rejected the request with status {status} (oauth_problem = {problem:?})")]
    Rejected {
        status: StatusCode,
        problem: Option<String>,
        /// Raw response body, for provider-specific error payloads.
        body: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("oauth_verifier is empty")]
    EmptyVerifier,
    #[error("oauth_verifier contains control characters")]
    ControlCharacterInVerifier,
    #[error("oauth_verifier must be numeric for this provider")]
    NonNumericVerifier,
    #[error("parameters could not be serialized into key-value pairs: {0}")]
    Serialize(String),
    #[error("parameter {0} uses the reserved oauth_ prefix")]
    ReservedParameter(String),
}
