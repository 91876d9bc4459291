use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;
use crate::user::errors::UserIdError;

/// Registered user identity record.
///
/// Owned by the storage layer; the password hash is the only credential ever
/// persisted.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier (database-assigned numeric id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user id from a token subject claim.
    ///
    /// # Errors
    /// * `InvalidFormat` - Subject is not a numeric id
    pub fn from_subject(s: &str) -> Result<Self, UserIdError> {
        i64::from_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address value type.
///
/// Validates format with an RFC 5322 compliant parser and otherwise stores the
/// address exactly as given (uniqueness is case-sensitive as stored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new user.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub name: String,
    pub email: EmailAddress,
    /// Plaintext; exists only for the duration of the request and is hashed
    /// before anything is stored
    pub password: String,
}

/// New user row handed to the repository; id and timestamps are
/// storage-assigned.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
}
