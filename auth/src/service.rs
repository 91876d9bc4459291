use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Serialize;

use crate::jwt::AccessClaims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::revocation::RevocationRegistry;

/// Configuration consumed by [`AuthService`].
///
/// Read-only after construction; values are environment-supplied by the
/// hosting service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric signing secret (at least 32 bytes for HS256)
    pub secret: String,
    /// Signing algorithm identifier: HS256, HS384, or HS512
    pub algorithm: String,
    /// Issuer string stamped into and required of every token
    pub issuer: String,
    /// Audience; when unset, `aud` is neither emitted nor checked
    pub audience: Option<String>,
    /// Token time-to-live in minutes
    pub ttl_minutes: i64,
}

/// Issuance result, shaped for transport back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    /// Derived from the configured TTL, not recomputed from the token
    pub expires_in: i64,
    pub token_type: String,
}

/// Terminal outcome of a token verification.
///
/// `verify_token` never errors past this boundary; every failure collapses
/// into one of the two failure variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenVerification {
    Valid(AccessClaims),
    Expired,
    Invalid { reason: String },
}

impl TokenVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenVerification::Valid(_))
    }

    pub fn claims(&self) -> Option<&AccessClaims> {
        match self {
            TokenVerification::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    /// Failure reason, `None` for valid tokens.
    pub fn reason(&self) -> Option<&str> {
        match self {
            TokenVerification::Valid(_) => None,
            TokenVerification::Expired => Some("expired"),
            TokenVerification::Invalid { reason } => Some(reason),
        }
    }
}

/// Authentication coordinator.
///
/// Owns the password hasher, the token codec, and the revocation registry,
/// and exposes the operations the HTTP layer consumes: hash/verify passwords,
/// issue tokens, verify tokens (including the revocation check), and revoke
/// tokens on logout.
pub struct AuthService {
    password_hasher: PasswordHasher,
    codec: TokenCodec,
    revocations: RevocationRegistry,
    ttl_minutes: i64,
}

impl AuthService {
    /// Build a service from configuration.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Configured algorithm is not HMAC-family
    pub fn new(config: AuthConfig) -> Result<Self, TokenError> {
        let codec = TokenCodec::new(
            config.secret.as_bytes(),
            &config.algorithm,
            config.issuer,
            config.audience,
        )?;

        Ok(Self {
            password_hasher: PasswordHasher::new(),
            codec,
            revocations: RevocationRegistry::new(),
            ttl_minutes: config.ttl_minutes,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// Malformed stored hashes verify as `false`, indistinguishable from a
    /// wrong password.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Issue an access token for `subject` with the configured TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn generate_token(
        &self,
        subject: impl ToString,
        extra_claims: HashMap<String, serde_json::Value>,
    ) -> Result<IssuedToken, TokenError> {
        let access_token = self.codec.encode(
            &subject.to_string(),
            Duration::minutes(self.ttl_minutes),
            extra_claims,
        )?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    /// Verify an access token, including the revocation check.
    ///
    /// Three terminal outcomes: valid with claims, expired, or invalid with a
    /// reason (bad signature, wrong issuer/audience, missing claim, wrong
    /// token kind, or revoked).
    pub fn verify_token(&self, token: &str) -> TokenVerification {
        match self.codec.decode(token) {
            Ok(claims) => {
                if self.revocations.is_revoked(&claims.jti) {
                    TokenVerification::Invalid {
                        reason: "revoked".to_string(),
                    }
                } else {
                    TokenVerification::Valid(claims)
                }
            }
            Err(TokenError::Expired) => TokenVerification::Expired,
            Err(e) => {
                tracing::debug!(error = %e, "token failed verification");
                TokenVerification::Invalid {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Best-effort revocation of a presented token.
    ///
    /// Decodes without the expiry check (an expired token must stay revocable)
    /// while still requiring a valid signature, issuer, and audience. Returns
    /// `true` when the identifier was recorded, `false` when the token could
    /// not be decoded; it never errors, so logout cannot fail caller flow.
    pub fn revoke_token(&self, token: &str) -> bool {
        match self.codec.decode_for_revocation(token) {
            Ok(claims) => {
                let deadline = claims.exp.unwrap_or_else(|| {
                    (Utc::now() + Duration::minutes(self.ttl_minutes)).timestamp()
                });
                self.revocations.revoke(&claims.jti, deadline);
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring revocation of undecodable token");
                false
            }
        }
    }

    /// Revoke directly by token identifier, with an explicit eviction deadline.
    pub fn revoke_identifier(&self, jti: &str, expires_at: i64) {
        self.revocations.revoke(jti, expires_at);
    }
}
