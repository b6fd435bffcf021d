//! Storefront product entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, UserId};

/// A product as served by the remote store.
///
/// Mutated only by the remote system. The client holds a read-mostly
/// cached copy; after a successful order, the cached stock is patched to
/// the server-reported remaining value, never recomputed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Currency units per kilogram.
    pub price: Decimal,
    /// Kilograms remaining; fractional.
    pub stock: Decimal,
    pub vendor_id: UserId,
    /// Image reference (URL or path), if the vendor uploaded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Display price for a quantity, rounded to two decimal places.
    ///
    /// The remote store computes the authoritative charge; this value is
    /// presentation only.
    #[must_use]
    pub fn display_price(&self, quantity: Decimal) -> Decimal {
        (self.price * quantity).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn carrots() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Carrots".to_owned(),
            description: String::new(),
            price: dec!(3.50),
            stock: dec!(12.5),
            vendor_id: UserId::new("v1"),
            image: None,
        }
    }

    #[test]
    fn test_display_price_rounds_to_two_places() {
        let product = carrots();
        // 3.50 * 0.333 = 1.1655 -> 1.17
        assert_eq!(product.display_price(dec!(0.333)), dec!(1.17));
        assert_eq!(product.display_price(dec!(2)), dec!(7.00));
    }
}
