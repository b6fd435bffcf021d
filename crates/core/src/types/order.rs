//! Order entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, ProductId};

/// Contact details collected with an order draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Mobile number reached for delivery coordination.
    pub mobile: String,
    /// Delivery address.
    pub address: String,
}

/// A submitted order as read back from the remote store, display only.
///
/// The client never models status transitions beyond what the store
/// reports here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
    /// Product name denormalized by the store for display.
    #[serde(default)]
    pub product_name: String,
    /// Kilograms ordered.
    pub quantity: Decimal,
    /// Authoritative charge computed by the store.
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of a successful order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Stock left for the product after this order, as reported by the
    /// store. This value is authoritative and is patched into the local
    /// product cache verbatim.
    pub remaining_stock: Decimal,
}
