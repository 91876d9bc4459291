use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use rand::rngs::OsRng;
use rand::RngCore;

use super::claims::AccessClaims;
use super::claims::RevocationClaims;
use super::claims::TOKEN_USE_ACCESS;
use super::errors::TokenError;

/// Signed-token encoder/decoder.
///
/// Builds and validates claim-bearing JWTs with a symmetric key. Issuer is
/// always enforced on decode; audience only when configured. Revocation is
/// deliberately not checked here - that belongs to the service layer.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    audience: Option<String>,
}

impl TokenCodec {
    /// Create a codec from a secret key and configuration.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm identifier is not in the HMAC family
    pub fn new(
        secret: &[u8],
        algorithm: &str,
        issuer: String,
        audience: Option<String>,
    ) -> Result<Self, TokenError> {
        // Symmetric key, so only HMAC algorithms make sense here
        let algorithm = match algorithm {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => return Err(TokenError::UnsupportedAlgorithm(other.to_string())),
        };

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            issuer,
            audience,
        })
    }

    /// Encode a signed access token for `subject`.
    ///
    /// A fresh random `jti` is generated per call. Extra claims are flattened
    /// into the payload alongside the standard ones.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn encode(
        &self,
        subject: &str,
        ttl: Duration,
        extra_claims: HashMap<String, serde_json::Value>,
    ) -> Result<String, TokenError> {
        let now = Utc::now();

        let claims = AccessClaims {
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: new_token_identifier(),
            token_use: TOKEN_USE_ACCESS.to_string(),
            aud: self.audience.clone(),
            extra: extra_claims,
        };

        jsonwebtoken::encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and fully validate an access token.
    ///
    /// Checks signature, mandatory claim presence, issuer, audience (when
    /// configured), the `[nbf, exp]` time window, and the `token_use` marker.
    ///
    /// # Errors
    /// * `Expired` - Only the expiry check failed
    /// * `Invalid` - Any other validation failure
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = self.base_validation();
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(classify)?;

        if data.claims.token_use != TOKEN_USE_ACCESS {
            return Err(TokenError::Invalid(format!(
                "unexpected token use '{}'",
                data.claims.token_use
            )));
        }

        Ok(data.claims)
    }

    /// Decode a token for revocation purposes.
    ///
    /// Signature, issuer, and audience are still enforced, but expiry is not:
    /// an already-expired token must stay revocable to cover replay within any
    /// clock-skew window. Requires only `iss`, `sub`, and `jti`.
    ///
    /// # Errors
    /// * `Invalid` - Signature, issuer, audience, or structure check failed
    pub fn decode_for_revocation(&self, token: &str) -> Result<RevocationClaims, TokenError> {
        let mut validation = self.base_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["iss", "sub"]);

        let data = jsonwebtoken::decode::<RevocationClaims>(token, &self.decoding_key, &validation)
            .map_err(classify)?;

        Ok(data.claims)
    }

    fn base_validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.issuer.as_str()]);

        match &self.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }

        validation
    }
}

/// Generate an unguessable token identifier: 16 bytes from the OS CSPRNG,
/// hex-encoded.
fn new_token_identifier() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn classify(e: jsonwebtoken::errors::Error) -> TokenError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Serialize;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, "HS256", "test-issuer".to_string(), None)
            .expect("Failed to build codec")
    }

    fn extras(pairs: &[(&str, &str)]) -> HashMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
            .collect()
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let codec = codec();

        let token = codec
            .encode("user-123", Duration::minutes(5), extras(&[("role", "admin")]))
            .expect("Failed to encode");

        let claims = codec.decode(&token).expect("Failed to decode");
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.token_use, TOKEN_USE_ACCESS);
        assert_eq!(claims.extra_str("role"), Some("admin"));
        assert_eq!(claims.exp - claims.iat, 5 * 60);
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_jti_is_fresh_per_issuance() {
        let codec = codec();

        let first = codec
            .encode("u1", Duration::minutes(5), HashMap::new())
            .expect("Failed to encode");
        let second = codec
            .encode("u1", Duration::minutes(5), HashMap::new())
            .expect("Failed to encode");

        let first = codec.decode(&first).expect("Failed to decode");
        let second = codec.decode(&second).expect("Failed to decode");

        // 16 random bytes, hex-encoded
        assert_eq!(first.jti.len(), 32);
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let codec = codec();

        let token = codec
            .encode("u1", Duration::minutes(-5), HashMap::new())
            .expect("Failed to encode");

        assert!(matches!(codec.decode(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let codec = codec();
        let other = TokenCodec::new(
            b"another_secret_key_at_least_32_bytes",
            "HS256",
            "test-issuer".to_string(),
            None,
        )
        .expect("Failed to build codec");

        let token = codec
            .encode("u1", Duration::minutes(5), HashMap::new())
            .expect("Failed to encode");

        assert!(matches!(other.decode(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let codec = codec();
        let other = TokenCodec::new(SECRET, "HS256", "someone-else".to_string(), None)
            .expect("Failed to build codec");

        let token = codec
            .encode("u1", Duration::minutes(5), HashMap::new())
            .expect("Failed to encode");

        assert!(matches!(other.decode(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_audience_checked_when_configured() {
        let issuing = TokenCodec::new(
            SECRET,
            "HS256",
            "test-issuer".to_string(),
            Some("web-client".to_string()),
        )
        .expect("Failed to build codec");

        let token = issuing
            .encode("u1", Duration::minutes(5), HashMap::new())
            .expect("Failed to encode");

        let claims = issuing.decode(&token).expect("Failed to decode");
        assert_eq!(claims.aud.as_deref(), Some("web-client"));

        let mismatched = TokenCodec::new(
            SECRET,
            "HS256",
            "test-issuer".to_string(),
            Some("another-client".to_string()),
        )
        .expect("Failed to build codec");

        assert!(matches!(
            mismatched.decode(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_token_use_is_invalid() {
        let codec = codec();
        let now = Utc::now();

        let claims = AccessClaims {
            iss: "test-issuer".to_string(),
            sub: "u1".to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
            jti: "any-jti".to_string(),
            token_use: "refresh".to_string(),
            aud: None,
            extra: HashMap::new(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to encode");

        assert!(matches!(codec.decode(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_missing_jti_is_invalid() {
        #[derive(Serialize)]
        struct NoJti {
            iss: String,
            sub: String,
            iat: i64,
            nbf: i64,
            exp: i64,
            token_use: String,
        }

        let codec = codec();
        let now = Utc::now();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &NoJti {
                iss: "test-issuer".to_string(),
                sub: "u1".to_string(),
                iat: now.timestamp(),
                nbf: now.timestamp(),
                exp: (now + Duration::minutes(5)).timestamp(),
                token_use: TOKEN_USE_ACCESS.to_string(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to encode");

        assert!(matches!(codec.decode(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let codec = codec();
        let token = codec
            .encode("u1", Duration::minutes(5), HashMap::new())
            .expect("Failed to encode");

        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).expect("ascii");

        assert!(matches!(
            codec.decode(&tampered),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_decode_for_revocation_ignores_expiry() {
        let codec = codec();

        let token = codec
            .encode("u1", Duration::minutes(-5), HashMap::new())
            .expect("Failed to encode");

        let claims = codec
            .decode_for_revocation(&token)
            .expect("Expired token must stay revocable");
        assert_eq!(claims.sub, "u1");
        assert!(claims.exp.is_some());
        assert_eq!(claims.jti.len(), 32);
    }

    #[test]
    fn test_decode_for_revocation_still_checks_signature() {
        let codec = codec();
        let other = TokenCodec::new(
            b"another_secret_key_at_least_32_bytes",
            "HS256",
            "test-issuer".to_string(),
            None,
        )
        .expect("Failed to build codec");

        let token = codec
            .encode("u1", Duration::minutes(5), HashMap::new())
            .expect("Failed to encode");

        assert!(other.decode_for_revocation(&token).is_err());
    }

    #[test]
    fn test_rejects_non_hmac_algorithm() {
        let result = TokenCodec::new(SECRET, "RS256", "test-issuer".to_string(), None);
        assert!(matches!(result, Err(TokenError::UnsupportedAlgorithm(_))));
    }
}
