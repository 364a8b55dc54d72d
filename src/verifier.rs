use std::fmt;

use serde::Deserialize;

use crate::EncodingError;

/// What a provider hands back as `oauth_verifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifierPolicy {
    /// Any non-empty string without control characters.
    #[default]
    Opaque,
    /// ASCII digits only, as FatSecret issues them.
    Numeric,
}

/// A checked `oauth_verifier`, safe to put in a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verifier(String);

impl Verifier {
    pub fn parse(input: &str, policy: VerifierPolicy) -> Result<Self, EncodingError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EncodingError::EmptyVerifier);
        }
        if input.chars().any(char::is_control) {
            return Err(EncodingError::ControlCharacterInVerifier);
        }
        if policy == VerifierPolicy::Numeric && !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::NonNumericVerifier);
        }
        Ok(Verifier(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
