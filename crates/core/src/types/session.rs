//! Resolved session identity.

use serde::{Deserialize, Serialize};

use crate::types::{Claims, Role, UserId};

/// Resolved identity for the lifetime of the application shell.
///
/// Constructed from decoded claims plus one remote vendor-status lookup,
/// and always replaced wholesale - login, refresh, and logout swap the
/// whole value rather than patching fields, so observers never see a
/// partially updated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user ID from the token subject.
    pub user_id: UserId,
    /// Role derived from claims (customer when the claim is absent).
    pub role: Role,
    /// Email from claims; empty when the token carries none.
    pub email: String,
    /// Remote-authoritative vendor approval. Meaningful for vendor and
    /// customer-pending-vendor sessions; never assumed true.
    pub vendor_approved: bool,
}

impl Session {
    /// Build a session from decoded claims with approval not yet known.
    ///
    /// `vendor_approved` starts `false`; the resolver overwrites it after
    /// the remote status lookup.
    #[must_use]
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: UserId::new(claims.sub.clone()),
            role: claims.effective_role(),
            email: claims.email.clone().unwrap_or_default(),
            vendor_approved: false,
        }
    }

    /// Copy of this session with the vendor-approval flag set.
    #[must_use]
    pub fn with_vendor_approved(mut self, approved: bool) -> Self {
        self.vendor_approved = approved;
        self
    }
}
