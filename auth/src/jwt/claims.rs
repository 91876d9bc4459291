use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// `token_use` literal carried by every access token.
///
/// Tokens with a different marker are rejected, so other token kinds can be
/// introduced later without being accepted here.
pub const TOKEN_USE_ACCESS: &str = "access";

/// Claim set carried by an access token.
///
/// Standard RFC 7519 claims plus the `token_use` kind marker and any
/// caller-supplied extras (flattened into the payload at issuance).
/// All mandatory claims are non-optional fields, so a token missing one of
/// them fails deserialization and is reported as invalid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Issuer identifier
    pub iss: String,

    /// Subject (stringified user id)
    pub sub: String,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Not before (Unix seconds)
    pub nbf: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,

    /// Unique token identifier, revocation key
    pub jti: String,

    /// Token kind marker, always [`TOKEN_USE_ACCESS`] for tokens issued here
    pub token_use: String,

    /// Audience, present only when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Caller-supplied custom claims (e.g. email, name)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl AccessClaims {
    /// Look up a string-valued extra claim.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }
}

/// Reduced claim set used when revoking a token.
///
/// Only issuer, subject, and the unique identifier are required, so a token
/// remains revocable after its expiry has passed. `exp`, when present, becomes
/// the registry eviction deadline for the revoked identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct RevocationClaims {
    pub iss: String,
    pub sub: String,
    pub jti: String,
    pub exp: Option<i64>,
}
