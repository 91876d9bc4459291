use std::collections::HashMap;
use std::sync::RwLock;

/// Registry of revoked token identifiers.
///
/// Single instance per process, constructed at startup and owned by the
/// service layer. Safe for concurrent `revoke`/`is_revoked` calls; the lock is
/// only held for the map operation itself.
///
/// Each entry carries the revoked token's own expiry as an eviction deadline,
/// and entries past their deadline are pruned lazily on later insertions, so
/// the registry stays bounded by the number of live revoked tokens. Entries do
/// not survive a process restart; that is a stated scope limit, not a defect.
pub struct RevocationRegistry {
    revoked: RwLock<HashMap<String, i64>>,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self {
            revoked: RwLock::new(HashMap::new()),
        }
    }

    /// Mark a token identifier as revoked until `expires_at` (Unix seconds).
    ///
    /// Idempotent: revoking an already-revoked or never-issued identifier is a
    /// no-op success.
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        let now = chrono::Utc::now().timestamp();
        let mut revoked = self.revoked.write().unwrap_or_else(|e| e.into_inner());
        revoked.retain(|_, deadline| *deadline > now);
        revoked.entry(jti.to_string()).or_insert(expires_at);
    }

    /// Membership test for a token identifier.
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(jti)
    }
}

impl Default for RevocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
