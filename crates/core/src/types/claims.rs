//! Claims embedded in the bearer token payload.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Decoded payload of a bearer token.
///
/// Only `sub` is required; a missing role defaults to customer at the
/// decode site. The signature is never verified here - trust is
/// established by the remote store on every request, and these fields are
/// read purely for UI gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the opaque user ID issued by the remote store.
    pub sub: String,

    /// Role claim. Absent on older tokens, which are customers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Email address, if the store embedded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Expiry as Unix seconds. A past `exp` is treated as a decode
    /// failure by callers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Effective role: the claim if present, otherwise customer.
    #[must_use]
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or_default()
    }
}
