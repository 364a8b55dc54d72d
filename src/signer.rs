use std::borrow::Cow;
use std::time::SystemTime;

use base64::{engine::general_purpose::STANDARD as BASE64_ENGINE, Engine};
use hmac::{Hmac, Mac};
use http::Method;
use sha1::Sha1;
use tracing::trace;
use url::Url;
use uuid::Uuid;

use crate::encoding::{base_string, percent_encode, Parameters};
use crate::request::SignedRequest;
use crate::{
    SecretsProvider, SignError, SignResult, OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY,
    OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY,
    OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY, OAUTH_VERSION_KEY,
};

type HmacSha1 = Hmac<Sha1>;

/// Value of `oauth_signature_method`.
pub const HMAC_SHA1: &str = "HMAC-SHA1";
/// Value of `oauth_version`.
pub const OAUTH_VERSION_1: &str = "1.0";

/// `enc(consumer_secret)&enc(token_secret)`; the token part is empty until a
/// token is held.
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    )
}

/// HMAC-SHA1 of `base_string`, base64 encoded.
pub fn sign(
    base_string: &str,
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> SignResult<String> {
    let key = signing_key(consumer_secret, token_secret);
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| SignError::InvalidKey)?;
    mac.update(base_string.as_bytes());
    Ok(BASE64_ENGINE.encode(mac.finalize().into_bytes()))
}

/// Fresh `oauth_nonce`: a v4 UUID, so concurrent exchanges never collide.
pub fn generate_nonce() -> String {
    Uuid::new_v4().to_string()
}

/// Current `oauth_timestamp` in seconds since the Unix epoch.
pub fn generate_timestamp() -> SignResult<u64> {
    Ok(SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)?
        .as_secs())
}

#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            secrets,
            parameters,
        }
    }

    /// The protocol parameters for one request, without the signature.
    ///
    /// A nonce or timestamp not pinned on the [`OAuthParameters`] is
    /// generated here, so every call yields a fresh pair.
    pub fn protocol_parameters(&self) -> SignResult<Parameters> {
        let (consumer_key, _) = self.secrets.get_consumer_key_pair();
        let (token, _) = self.secrets.get_token_option_pair();

        let nonce = match self.parameters.nonce {
            Some(ref nonce) => nonce.to_string(),
            None => generate_nonce(),
        };
        let timestamp = match self.parameters.timestamp {
            Some(timestamp) => timestamp,
            None => generate_timestamp()?,
        };

        let mut params = Parameters::new();
        params.insert(OAUTH_CONSUMER_KEY, consumer_key);
        params.insert(OAUTH_NONCE_KEY, nonce);
        params.insert(OAUTH_SIGNATURE_METHOD_KEY, HMAC_SHA1);
        params.insert(OAUTH_TIMESTAMP_KEY, timestamp.to_string());
        if self.parameters.version {
            params.insert(OAUTH_VERSION_KEY, OAUTH_VERSION_1);
        }
        if let Some(token) = token {
            params.insert(OAUTH_TOKEN_KEY, token);
        }
        if let Some(ref callback) = self.parameters.callback {
            params.insert(OAUTH_CALLBACK_KEY, callback.as_ref());
        }
        if let Some(ref verifier) = self.parameters.verifier {
            params.insert(OAUTH_VERIFIER_KEY, verifier.as_ref());
        }
        Ok(params)
    }

    /// Signs `method url?params` and returns the request with every protocol
    /// parameter and `oauth_signature` placed in the query string.
    ///
    /// `url` is the signature base URL; any query it carries is discarded.
    pub fn sign_request(
        self,
        method: Method,
        url: &Url,
        params: Parameters,
    ) -> SignResult<SignedRequest> {
        let (_, consumer_secret) = self.secrets.get_consumer_key_pair();
        let (_, token_secret) = self.secrets.get_token_option_pair();

        let mut base_url = url.clone();
        base_url.set_query(None);
        base_url.set_fragment(None);

        let mut all = params;
        all.extend(self.protocol_parameters()?.iter());

        let base = base_string(&method, &base_url, &all);
        let signature = sign(&base, consumer_secret, token_secret)?;
        all.insert(OAUTH_SIGNATURE_KEY, signature);

        trace!(%method, url = %base_url, parameters = all.len(), "signed OAuth1 request");

        let mut signed_url = base_url;
        signed_url.set_query(Some(&all.to_query()));
        Ok(SignedRequest::new(method, signed_url))
    }
}

/// Per-request OAuth parameters. Unset nonce and timestamp are generated at
/// signing time.
#[derive(Debug, Clone)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
    version: bool,
}

impl<'a> Default for OAuthParameters<'a> {
    fn default() -> Self {
        OAuthParameters {
            callback: None,
            nonce: None,
            timestamp: None,
            verifier: None,
            version: true,
        }
    }
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    /// set the oauth_version value (boolean)
    ///
    /// # Note
    /// Defaults to `true`, which sends `oauth_version=1.0`.
    /// `false` leaves the parameter out, which OAuth1 also allows.
    pub fn version<T>(self, version: T) -> Self
    where
        T: Into<bool>,
    {
        OAuthParameters {
            version: version.into(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Credentials;

    fn signature_of(request: &SignedRequest) -> String {
        request
            .url()
            .query_pairs()
            .find(|(k, _)| k == OAUTH_SIGNATURE_KEY)
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[test]
    fn signing_key_encodes_both_secrets() {
        assert_eq!(signing_key("cs", None), "cs&");
        assert_eq!(signing_key("c&s", Some("t s")), "c%26s&t%20s");
    }

    #[test]
    fn sign_reference_vector() {
        // OAuth Core 1.0 appendix A.5.2
        let base = "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal";
        assert_eq!(
            sign(base, "kd94hf93k423kf44", Some("pfkkdhi9sl3r4s00")).unwrap(),
            "tR3+Ty81lMeYAr/Fid0kMTYa/WM="
        );
    }

    #[test]
    fn sign_get_query() {
        // https://tools.ietf.org/html/rfc5849#section-3.1
        let endpoint = Url::parse("http://photos.example.net/photos").unwrap();
        let credentials = Credentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44").unwrap();
        let secrets = credentials.token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
        let params = OAuthParameters::new()
            .nonce("chapoH")
            .timestamp(137_131_202u64)
            .version(false);
        let query: Parameters = vec![("file", "vacation.jpg"), ("size", "original")]
            .into_iter()
            .collect();

        let req = Signer::new(&secrets, params)
            .sign_request(Method::GET, &endpoint, query)
            .unwrap();

        assert_eq!(signature_of(&req), "MdpQcU8iPSUjWoN/UDMsK2sui9I=");
    }

    #[test]
    fn sign_request_token_with_callback() {
        // https://tools.ietf.org/html/rfc5849#section-1.2
        let endpoint = Url::parse("https://photos.example.net/initiate").unwrap();
        let credentials = Credentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44").unwrap();
        let params = OAuthParameters::new()
            .nonce("wIjqoS")
            .timestamp(137_131_200u64)
            .callback("http://printer.example.com/ready")
            .version(false);

        let req = Signer::new(&credentials, params)
            .sign_request(Method::POST, &endpoint, Parameters::new())
            .unwrap();

        assert_eq!(signature_of(&req), "74KNZJeDHnMBp0EMJ9ZHt/XKycU=");
    }

    #[test]
    fn sign_post_body() {
        // https://developer.twitter.com/ja/docs/basics/authentication/guides/creating-a-signature
        let endpoint = Url::parse("https://api.twitter.com/1.1/statuses/update.json").unwrap();
        let credentials = Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        )
        .unwrap();
        let secrets = credentials.token(
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );
        let params = OAuthParameters::new()
            .nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
            .timestamp(1_318_622_958u64);
        let body: Parameters = vec![
            ("include_entities", "true"),
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
        ]
        .into_iter()
        .collect();

        let req = Signer::new(&secrets, params)
            .sign_request(Method::POST, &endpoint, body)
            .unwrap();

        assert_eq!(signature_of(&req), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn query_uses_signing_encoding() {
        let endpoint = Url::parse("http://example.com/resource?dropped=1").unwrap();
        let credentials = Credentials::new("key", "secret").unwrap();
        let params = OAuthParameters::new().nonce("n").timestamp(1u64);
        let caller: Parameters = vec![("q", "a b+c")].into_iter().collect();

        let req = Signer::new(&credentials, params)
            .sign_request(Method::GET, &endpoint, caller)
            .unwrap();
        let query = req.url().query().unwrap();

        assert!(query.starts_with(
            "oauth_consumer_key=key&oauth_nonce=n&oauth_signature="
        ));
        assert!(query.ends_with(
            "&oauth_signature_method=HMAC-SHA1&oauth_timestamp=1&oauth_version=1.0&q=a%20b%2Bc"
        ));
        assert!(!query.contains("dropped"));
    }

    #[test]
    fn unpinned_nonce_and_timestamp_are_fresh() {
        let credentials = Credentials::new("key", "secret").unwrap();
        let signer = Signer::new(&credentials, OAuthParameters::new());
        let first = signer.protocol_parameters().unwrap();
        let second = signer.protocol_parameters().unwrap();
        assert_ne!(first.get(OAUTH_NONCE_KEY), second.get(OAUTH_NONCE_KEY));
        assert!(first.get(OAUTH_TIMESTAMP_KEY).unwrap().parse::<u64>().unwrap() > 1_500_000_000);
        assert!(!first.contains_key(OAUTH_TOKEN_KEY));
        assert_eq!(first.get(OAUTH_VERSION_KEY), Some(OAUTH_VERSION_1));
    }
}
