//! Vendor application entity.

use serde::{Deserialize, Serialize};

use crate::types::{UserId, VendorApplicationId, VendorStatus};

/// A vendor application, owned entirely by the remote store.
///
/// The client only reads and displays this record and invokes
/// approve/reject as opaque remote calls; list membership and ordering
/// across re-fetches are whatever the store returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorApplication {
    pub id: VendorApplicationId,
    /// Applicant user ID.
    pub user_id: UserId,
    pub shop_name: String,
    /// Contact number (the store calls this field `whatsapp`).
    #[serde(alias = "whatsapp")]
    pub contact: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: VendorStatus,
}
