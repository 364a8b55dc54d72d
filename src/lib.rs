/*!
fatsecret-oauth1: three-legged OAuth1 for the FatSecret platform API, over reqwest.

# Overview

This library implements the OAuth 1.0a flow the way FatSecret expects it:
HMAC-SHA1 signatures, every protocol parameter and the signature carried in
the query string of a `GET`, and form-urlencoded token responses. The
signature base string, percent-encoding and signing key are built here and
exposed in [`encoding`] and [`signer`] so they can be checked against
published vectors.

# How to use

## Acquiring an access token

```no_run
# async fn run() -> fatsecret_oauth1::Result<()> {
use fatsecret_oauth1::{Client, Credentials, ProviderEndpoints};

// prepare authorization info
let credentials = Credentials::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")?;
let endpoints = ProviderEndpoints::new(
    "http://www.fatsecret.com/oauth/request_token",
    "http://www.fatsecret.com/oauth/authorize",
    "http://www.fatsecret.com/oauth/access_token",
    "http://platform.fatsecret.com/rest/server.api",
)?;
let client = Client::new(credentials, endpoints)?;

// step 1: acquire request token & token secret
let request_token = client.request_token("http://localhost:8080/fatsecretCallback").await?;

// step 2: send the user to the provider; keep request_token until they return
println!("please access to: {}", client.authorize_url(&request_token));

// step 3: exchange the verifier from the callback for an access token
let access_token = client.access_token(&request_token, "7009457").await?;
# Ok(())
# }
```

## Calling the API on behalf of the user

```no_run
# async fn run(client: fatsecret_oauth1::Client, access_token: fatsecret_oauth1::AccessToken) -> fatsecret_oauth1::Result<()> {
let body = client
    .request(&access_token, &[("method", "weights.get_month"), ("format", "json")])
    .await?;
# Ok(())
# }
```

The [`fatsecret`] module wraps both with FatSecret's endpoints and
credentials read from `FATSECRET_API_CONSUMER_KEY` /
`FATSECRET_API_CONSUMER_SECRET`.

# Limitations

Parameters carry a single value per name. When a name repeats, only its
first value is signed and sent.
*/
#[cfg(feature = "blocking")]
pub mod blocking;
mod client;
pub mod encoding;
mod error;
mod exchange;
pub mod fatsecret;
mod provider;
mod request;
mod secrets;
pub mod session;
pub mod signer;
mod token_reader;
mod verifier;
pub mod worker;

// exposed to external program
pub use client::Client;
pub use encoding::Parameters;
pub use error::{
    BoxError, ConfigError, EncodingError, Error, ProtocolError, ProtocolResult, Result, SignError,
    SignResult,
};
pub use exchange::Exchange;
pub use provider::ProviderEndpoints;
pub use request::{ClientConfig, SignedRequest, Transport, TransportResponse};
pub use secrets::{AccessToken, Credentials, RequestToken, Secrets, SecretsProvider};
pub use signer::{OAuthParameters, Signer};
pub use token_reader::{read_oauth_token, read_request_token, TokenResponse};
pub use verifier::{Verifier, VerifierPolicy};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_callback_confirmed`.
pub const OAUTH_CALLBACK_CONFIRMED_KEY: &str = "oauth_callback_confirmed";
/// Represents `oauth_consumer_key`.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_problem`.
pub const OAUTH_PROBLEM_KEY: &str = "oauth_problem";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
