//! Canonical request encoding ([RFC 5849 section 3.4.1][rfc]).
//!
//! [rfc]: https://tools.ietf.org/html/rfc5849#section-3.4.1

use std::borrow::Cow;
use std::collections::btree_map::{self, BTreeMap};

use http::Method;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::{EncodingError, OAUTH_KEY_PREFIX};

/// Everything outside the RFC 3986 unreserved set is escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes `input` the way OAuth1 signing requires: unreserved
/// characters pass through, every other byte becomes an uppercase `%XX`.
pub fn percent_encode(input: &str) -> Cow<'_, str> {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).into()
}

/// Inverse of [`percent_encode`]. Invalid UTF-8 is replaced lossily.
pub fn percent_decode(input: &str) -> Cow<'_, str> {
    percent_decode_str(input).decode_utf8_lossy()
}

/// Request parameters with at most one value per name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    inner: BTreeMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Collects caller parameters from anything `serde_urlencoded` can
    /// serialize (slices of pairs, maps, flat structs).
    ///
    /// Only the first value of a repeated name is kept. Names starting with
    /// `oauth_` are refused since they would shadow protocol parameters.
    pub fn from_serialize<T: Serialize + ?Sized>(params: &T) -> Result<Self, EncodingError> {
        let query = serde_urlencoded::to_string(params)
            .map_err(|e| EncodingError::Serialize(e.to_string()))?;
        let mut parameters = Parameters::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key.starts_with(OAUTH_KEY_PREFIX) {
                return Err(EncodingError::ReservedParameter(key.into_owned()));
            }
            match parameters.inner.entry(key.into_owned()) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(value.into_owned());
                }
                btree_map::Entry::Occupied(entry) => {
                    warn!(
                        key = %entry.key(),
                        "dropping repeated parameter, only the first value is sent"
                    );
                }
            }
        }
        Ok(parameters)
    }

    /// Encodes every pair with [`percent_encode`], sorted by encoded name and
    /// then encoded value.
    fn encoded_pairs(&self) -> Vec<(Cow<'_, str>, Cow<'_, str>)> {
        let mut pairs: Vec<_> = self
            .inner
            .iter()
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        pairs.sort();
        pairs
    }

    /// Query string as transmitted. Identical to the normalized form used for
    /// signing, so the provider recomputes the same base string.
    pub fn to_query(&self) -> String {
        normalized_parameters(self)
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Parameters::new();
        parameters.extend(iter);
        parameters
    }
}

impl<K, V> Extend<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// The normalized request parameter string: `k=v` pairs joined with `&`.
pub fn normalized_parameters(params: &Parameters) -> String {
    params
        .encoded_pairs()
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the signature base string `METHOD&enc(url)&enc(params)`.
///
/// `url` is taken as-is and must not carry a query string; its parameters
/// belong in `params`.
pub fn base_string(method: &Method, url: &Url, params: &Parameters) -> String {
    let normalized = normalized_parameters(params);
    format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode(url.as_str()),
        percent_encode(&normalized)
    )
}
