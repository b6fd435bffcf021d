//! Order placement workflow.
//!
//! Validation happens locally, before any network traffic: quantity
//! bounds and contact fields are checked against the cached (or freshly
//! fetched) product, and a rejected draft never reaches the store. On
//! success, the store reports the authoritative remaining stock and that
//! value is patched into the product cache verbatim - the single source
//! of truth reconciliation rule. On failure, the store's message is
//! surfaced verbatim and no local state changes.
//!
//! One submission may be in flight at a time; a second submit while the
//! first is pending fails fast with [`OrderError::InFlight`] instead of
//! double-ordering.

use rust_decimal::Decimal;
use tokio::sync::Mutex;

use farmstall_core::{Contact, OrderReceipt, Product, ProductId};

use crate::api::{OrderRequest, StoreBackend};
use crate::error::{OrderError, ValidationError};
use crate::products::ProductCache;

/// Minimum order quantity in kilograms (0.1 kg).
pub const MIN_ORDER_KG: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Hard per-order ceiling in kilograms (20 kg).
pub const MAX_ORDER_KG: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Check an order quantity against the bounds and available stock.
///
/// Accepts quantities in `[MIN_ORDER_KG, MAX_ORDER_KG]` that are strictly
/// below the available stock.
///
/// # Errors
///
/// Returns the specific bound that failed.
pub fn validate_quantity(quantity: Decimal, stock: Decimal) -> Result<(), ValidationError> {
    if quantity < MIN_ORDER_KG {
        return Err(ValidationError::BelowMinimum {
            quantity,
            minimum: MIN_ORDER_KG,
        });
    }
    if quantity > MAX_ORDER_KG {
        return Err(ValidationError::AboveCeiling {
            quantity,
            ceiling: MAX_ORDER_KG,
        });
    }
    if quantity >= stock {
        return Err(ValidationError::ExceedsStock { quantity, stock });
    }
    Ok(())
}

fn validate_contact(contact: &Contact) -> Result<(), ValidationError> {
    if contact.mobile.trim().is_empty() {
        return Err(ValidationError::MissingContact("mobile"));
    }
    if contact.address.trim().is_empty() {
        return Err(ValidationError::MissingContact("address"));
    }
    Ok(())
}

/// Order placement over a [`StoreBackend`] and the shared product cache.
pub struct OrderWorkflow<S> {
    backend: S,
    cache: ProductCache,
    in_flight: Mutex<()>,
}

impl<S: StoreBackend> OrderWorkflow<S> {
    pub fn new(backend: S, cache: ProductCache) -> Self {
        Self {
            backend,
            cache,
            in_flight: Mutex::new(()),
        }
    }

    /// The product cache this workflow reconciles into.
    #[must_use]
    pub const fn cache(&self) -> &ProductCache {
        &self.cache
    }

    /// Display total for a draft, rounded to two decimal places.
    #[must_use]
    pub fn display_total(product: &Product, quantity: Decimal) -> Decimal {
        product.display_price(quantity)
    }

    /// Place an order for `quantity` kilograms of a product.
    ///
    /// # Errors
    ///
    /// - [`OrderError::InFlight`] when a submission is already pending.
    /// - [`OrderError::Validation`] before any network call when the
    ///   quantity is out of bounds or a contact field is empty.
    /// - [`OrderError::Remote`] when the store rejects the order; local
    ///   product state is left untouched.
    pub async fn place_order(
        &self,
        product_id: &ProductId,
        quantity: Decimal,
        contact: &Contact,
    ) -> Result<OrderReceipt, OrderError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Err(OrderError::InFlight);
        };

        let product = match self.cache.get(product_id).await {
            Some(product) => product,
            None => {
                let product = self.backend.fetch_product(product_id).await?;
                self.cache.insert(product.clone()).await;
                product
            }
        };

        validate_contact(contact)?;
        validate_quantity(quantity, product.stock)?;

        let request = OrderRequest {
            product_id: product_id.clone(),
            quantity,
            mobile: contact.mobile.clone(),
            address: contact.address.clone(),
        };

        // No optimistic decrement: the cache changes only after the store
        // confirms, and then only to the store's own number.
        let receipt = self.backend.submit_order(&request).await?;
        self.cache
            .patch_stock(product_id, receipt.remaining_stock)
            .await;

        tracing::debug!(
            product = %product_id,
            %quantity,
            remaining = %receipt.remaining_stock,
            "order placed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal_macros::dec;
    use tokio::sync::Notify;

    use farmstall_core::{
        Order, UserId, VendorApplication, VendorApplicationId, VendorStatus,
    };

    use crate::api::VendorApplicationRequest;
    use crate::error::RemoteError;

    /// Fake backend that counts submissions and can be made slow or
    /// failing.
    #[derive(Clone)]
    struct FakeBackend {
        remaining: Decimal,
        fail_message: Option<String>,
        submits: Arc<AtomicUsize>,
        fetches: Arc<AtomicUsize>,
        hold: Option<Arc<Notify>>,
    }

    impl FakeBackend {
        fn returning(remaining: Decimal) -> Self {
            Self {
                remaining,
                fail_message: None,
                submits: Arc::new(AtomicUsize::new(0)),
                fetches: Arc::new(AtomicUsize::new(0)),
                hold: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_message: Some(message.to_owned()),
                ..Self::returning(Decimal::ZERO)
            }
        }

        fn held(remaining: Decimal, hold: Arc<Notify>) -> Self {
            Self {
                hold: Some(hold),
                ..Self::returning(remaining)
            }
        }
    }

    impl StoreBackend for FakeBackend {
        async fn vendor_status(&self, _user_id: &UserId) -> Result<VendorStatus, RemoteError> {
            Ok(VendorStatus::Pending)
        }

        async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
            Ok(vec![])
        }

        async fn fetch_product(&self, id: &ProductId) -> Result<Product, RemoteError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(carrots_with_id(id.as_str(), dec!(12.0)))
        }

        async fn submit_order(&self, _request: &OrderRequest) -> Result<OrderReceipt, RemoteError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            if let Some(message) = &self.fail_message {
                return Err(RemoteError::Api {
                    status: 422,
                    message: message.clone(),
                });
            }
            Ok(OrderReceipt {
                remaining_stock: self.remaining,
            })
        }

        async fn fetch_orders(&self) -> Result<Vec<Order>, RemoteError> {
            Ok(vec![])
        }

        async fn apply_vendor(
            &self,
            _application: &VendorApplicationRequest,
        ) -> Result<(), RemoteError> {
            Ok(())
        }

        async fn pending_vendors(&self) -> Result<Vec<VendorApplication>, RemoteError> {
            Ok(vec![])
        }

        async fn approve_vendor(&self, _id: &VendorApplicationId) -> Result<(), RemoteError> {
            Ok(())
        }

        async fn reject_vendor(&self, _id: &VendorApplicationId) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    fn carrots_with_id(id: &str, stock: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: "Carrots".to_owned(),
            description: String::new(),
            price: dec!(3.50),
            stock,
            vendor_id: UserId::new("v1"),
            image: None,
        }
    }

    fn contact() -> Contact {
        Contact {
            mobile: "+27 82 000 0000".to_owned(),
            address: "1 Farm Rd".to_owned(),
        }
    }

    #[test]
    fn test_validate_quantity_bounds() {
        // In range and strictly under stock.
        assert!(validate_quantity(dec!(0.1), dec!(5)).is_ok());
        assert!(validate_quantity(dec!(4.9), dec!(5)).is_ok());
        assert!(validate_quantity(dec!(20), dec!(30)).is_ok());

        assert!(matches!(
            validate_quantity(dec!(0.05), dec!(5)),
            Err(ValidationError::BelowMinimum { .. })
        ));
        assert!(matches!(
            validate_quantity(dec!(20.5), dec!(30)),
            Err(ValidationError::AboveCeiling { .. })
        ));
        assert!(matches!(
            validate_quantity(dec!(5), dec!(5)),
            Err(ValidationError::ExceedsStock { .. })
        ));
        assert!(matches!(
            validate_quantity(dec!(2.5), dec!(2.0)),
            Err(ValidationError::ExceedsStock { .. })
        ));
    }

    #[tokio::test]
    async fn test_out_of_stock_draft_never_reaches_the_store() {
        let backend = FakeBackend::returning(dec!(0));
        let cache = ProductCache::new();
        cache.insert(carrots_with_id("p1", dec!(2.0))).await;
        let workflow = OrderWorkflow::new(backend.clone(), cache);

        let result = workflow
            .place_order(&ProductId::new("p1"), dec!(2.5), &contact())
            .await;

        assert!(matches!(
            result,
            Err(OrderError::Validation(ValidationError::ExceedsStock { .. }))
        ));
        assert_eq!(backend.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_contact_blocks_before_network() {
        let backend = FakeBackend::returning(dec!(1));
        let cache = ProductCache::new();
        cache.insert(carrots_with_id("p1", dec!(5))).await;
        let workflow = OrderWorkflow::new(backend.clone(), cache);

        let result = workflow
            .place_order(
                &ProductId::new("p1"),
                dec!(1),
                &Contact {
                    mobile: String::new(),
                    address: "1 Farm Rd".to_owned(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(OrderError::Validation(ValidationError::MissingContact("mobile")))
        ));
        assert_eq!(backend.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_reconciles_server_stock_verbatim() {
        // Prior stock 12.0, order 2.0; a concurrent buyer means the
        // server reports 9.7, not the locally computable 10.0.
        let backend = FakeBackend::returning(dec!(9.7));
        let cache = ProductCache::new();
        cache.insert(carrots_with_id("p1", dec!(12.0))).await;
        let workflow = OrderWorkflow::new(backend.clone(), cache);

        let receipt = workflow
            .place_order(&ProductId::new("p1"), dec!(2.0), &contact())
            .await
            .expect("order placed");

        assert_eq!(receipt.remaining_stock, dec!(9.7));
        let cached = workflow
            .cache()
            .get(&ProductId::new("p1"))
            .await
            .expect("cached");
        assert_eq!(cached.stock, dec!(9.7));
    }

    #[tokio::test]
    async fn test_remote_failure_leaves_stock_untouched() {
        let backend = FakeBackend::failing("Not enough stock");
        let cache = ProductCache::new();
        cache.insert(carrots_with_id("p1", dec!(12.0))).await;
        let workflow = OrderWorkflow::new(backend.clone(), cache);

        let result = workflow
            .place_order(&ProductId::new("p1"), dec!(2.0), &contact())
            .await;

        match result {
            Err(OrderError::Remote(RemoteError::Api { message, .. })) => {
                assert_eq!(message, "Not enough stock");
            }
            other => panic!("expected verbatim store error, got {other:?}"),
        }
        let cached = workflow
            .cache()
            .get(&ProductId::new("p1"))
            .await
            .expect("cached");
        assert_eq!(cached.stock, dec!(12.0));
    }

    #[tokio::test]
    async fn test_uncached_product_is_fetched_once() {
        let backend = FakeBackend::returning(dec!(11.0));
        let workflow = OrderWorkflow::new(backend.clone(), ProductCache::new());

        workflow
            .place_order(&ProductId::new("p9"), dec!(1.0), &contact())
            .await
            .expect("order placed");

        assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(backend.submits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_fails_fast() {
        let hold = Arc::new(Notify::new());
        let backend = FakeBackend::held(dec!(9.0), hold.clone());
        let cache = ProductCache::new();
        cache.insert(carrots_with_id("p1", dec!(12.0))).await;
        let workflow = Arc::new(OrderWorkflow::new(backend, cache));

        let first = {
            let workflow = workflow.clone();
            tokio::spawn(async move {
                workflow
                    .place_order(&ProductId::new("p1"), dec!(1.0), &contact())
                    .await
            })
        };

        // Give the first submission time to take the guard and park in
        // the held backend.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let second = workflow
            .place_order(&ProductId::new("p1"), dec!(1.0), &contact())
            .await;
        assert!(matches!(second, Err(OrderError::InFlight)));

        hold.notify_one();
        let first = first.await.expect("join");
        assert!(first.is_ok());
    }
}
