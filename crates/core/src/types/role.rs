//! Role and status enums.

use serde::{Deserialize, Serialize};

/// User role carried in bearer-token claims.
///
/// The role is read for UI gating only; the remote store re-checks
/// permissions on every state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular shopper. Tokens without a role claim default to this.
    #[default]
    Customer,
    /// Approved seller with product management access.
    Vendor,
    /// Store administrator handling vendor applications.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Vendor => write!(f, "vendor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Vendor application status, owned entirely by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    /// Application submitted, awaiting an admin decision.
    #[default]
    Pending,
    /// Application approved; vendor views unlock.
    Approved,
    /// Application rejected.
    Rejected,
}

impl VendorStatus {
    /// Whether this status unlocks vendor-only views.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Customer, Role::Vendor, Role::Admin] {
            let parsed = Role::from_str(&role.to_string()).expect("parse");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_role_default_is_customer() {
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_vendor_status_serde_snake_case() {
        let status: VendorStatus = serde_json::from_str("\"approved\"").expect("parse");
        assert_eq!(status, VendorStatus::Approved);
        assert!(status.is_approved());
        assert!(!VendorStatus::Pending.is_approved());
    }
}
