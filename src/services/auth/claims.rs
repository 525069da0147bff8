use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded access-token claims.
///
/// NOTE:
/// - `aud` can be a string or an array; `jsonwebtoken::Validation::set_audience` checks it.
/// - `iss` / `exp` default here so a missing claim surfaces as a validation error
///   (`MissingRequiredClaim`) instead of a deserialization error.
/// - `permissions` stays `Option` so "no permissions claim" and "empty list" differ.
/// - Everything else the provider adds (`azp`, `scope`, `gty`, ...) is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub iss: String,

    #[serde(default)]
    pub aud: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default)]
    pub exp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }
}
