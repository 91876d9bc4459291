//! Credential and session-token library
//!
//! Provides the authentication core for the task-management API:
//! - Password hashing and verification (Argon2id)
//! - Signed access-token issuance and validation (HMAC JWT)
//! - Token revocation tracked by unique token identifiers
//!
//! The HTTP layer constructs a single [`AuthService`] at startup and shares it
//! across request handlers; there is no ambient global instance.
//!
//! # Examples
//!
//! ```
//! use auth::{AuthConfig, AuthService, TokenVerification};
//!
//! let service = AuthService::new(AuthConfig {
//!     secret: "secret_key_at_least_32_bytes_long!!".to_string(),
//!     algorithm: "HS256".to_string(),
//!     issuer: "task-api".to_string(),
//!     audience: None,
//!     ttl_minutes: 30,
//! })
//! .unwrap();
//!
//! // Register: hash password
//! let hash = service.hash_password("password123").unwrap();
//! assert!(service.verify_password("password123", &hash));
//!
//! // Login: issue a bearer token
//! let issued = service.generate_token(42, Default::default()).unwrap();
//! assert_eq!(issued.token_type, "Bearer");
//!
//! // Protected access: verify it
//! match service.verify_token(&issued.access_token) {
//!     TokenVerification::Valid(claims) => assert_eq!(claims.sub, "42"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//!
//! // Logout: revoke it
//! assert!(service.revoke_token(&issued.access_token));
//! assert!(!service.verify_token(&issued.access_token).is_valid());
//! ```

pub mod jwt;
pub mod password;
pub mod revocation;
pub mod service;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use revocation::RevocationRegistry;
pub use service::AuthConfig;
pub use service::AuthService;
pub use service::IssuedToken;
pub use service::TokenVerification;
