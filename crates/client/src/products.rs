//! Read-mostly product cache.
//!
//! Products are mutated only by the remote store. The cache holds copies
//! for display, refreshed wholesale from list fetches. The one exception
//! is [`ProductCache::patch_stock`]: after a successful order, the
//! server-reported remaining stock is written into the cached entry
//! verbatim - the client never computes `stock - quantity` itself.

use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;

use farmstall_core::{Product, ProductId};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// In-memory cache of products keyed by ID.
#[derive(Clone)]
pub struct ProductCache {
    inner: Cache<ProductId, Product>,
}

impl Default for ProductCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCache {
    /// Create an empty cache (capacity 1000, 5-minute TTL).
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Cached copy of a product, if present and fresh.
    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.inner.get(id).await
    }

    /// Insert or replace one product.
    pub async fn insert(&self, product: Product) {
        self.inner.insert(product.id.clone(), product).await;
    }

    /// Replace cached entries with a freshly fetched list.
    pub async fn refresh(&self, products: Vec<Product>) {
        for product in products {
            self.insert(product).await;
        }
    }

    /// Patch a cached product's stock to the server-reported remaining
    /// value. Returns the updated product, or `None` when the product is
    /// not cached (nothing to patch; the next fetch brings the fresh
    /// value anyway).
    pub async fn patch_stock(&self, id: &ProductId, remaining: Decimal) -> Option<Product> {
        let mut product = self.inner.get(id).await?;
        tracing::debug!(product = %id, %remaining, "reconciling server-reported stock");
        product.stock = remaining;
        self.inner.insert(id.clone(), product.clone()).await;
        Some(product)
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstall_core::UserId;
    use rust_decimal_macros::dec;

    fn product(id: &str, stock: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: "Tomatoes".to_owned(),
            description: String::new(),
            price: dec!(4.25),
            stock,
            vendor_id: UserId::new("v1"),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_patch_stock_uses_server_value_verbatim() {
        let cache = ProductCache::new();
        cache.insert(product("p1", dec!(12.0))).await;

        // An order of 2 kg went through, but another buyer got there
        // first: the server says 9.7 remain, not 10.0.
        let updated = cache
            .patch_stock(&ProductId::new("p1"), dec!(9.7))
            .await
            .expect("cached");
        assert_eq!(updated.stock, dec!(9.7));

        let cached = cache.get(&ProductId::new("p1")).await.expect("cached");
        assert_eq!(cached.stock, dec!(9.7));
    }

    #[tokio::test]
    async fn test_patch_stock_on_uncached_product_is_none() {
        let cache = ProductCache::new();
        assert!(cache.patch_stock(&ProductId::new("ghost"), dec!(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_entries() {
        let cache = ProductCache::new();
        cache.insert(product("p1", dec!(5))).await;
        cache.refresh(vec![product("p1", dec!(3)), product("p2", dec!(8))]).await;

        assert_eq!(cache.get(&ProductId::new("p1")).await.expect("p1").stock, dec!(3));
        assert_eq!(cache.get(&ProductId::new("p2")).await.expect("p2").stock, dec!(8));
    }
}
