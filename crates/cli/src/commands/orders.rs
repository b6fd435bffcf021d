//! Order commands.

use clap::Subcommand;
use rust_decimal::Decimal;

use farmstall_client::{AppError, OrderWorkflow, Route, StoreBackend};
use farmstall_core::{Contact, ProductId};

use super::{Context, gate};

#[derive(Subcommand)]
pub enum OrderAction {
    /// Place an order for a product
    Place {
        /// Product ID
        product_id: String,

        /// Quantity in kilograms (0.1 - 20)
        #[arg(short, long)]
        quantity: Decimal,

        /// Contact mobile number
        #[arg(short, long)]
        mobile: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,
    },
    /// List your orders
    List,
}

pub async fn run(ctx: &Context, action: OrderAction) -> Result<(), AppError> {
    match action {
        OrderAction::Place {
            product_id,
            quantity,
            mobile,
            address,
        } => {
            // Ordering inside product details requires a session.
            ctx.require_session().await?;

            let product_id = ProductId::new(product_id);
            let workflow = OrderWorkflow::new(ctx.api.clone(), ctx.cache.clone());

            if let Some(product) = preview(ctx, &product_id).await {
                tracing::info!(
                    "Ordering {quantity} kg of {} (display total: {})",
                    product.name,
                    product.display_price(quantity)
                );
            }

            let receipt = workflow
                .place_order(&product_id, quantity, &Contact { mobile, address })
                .await?;
            tracing::info!(
                "Order placed; {} kg remaining in stock",
                receipt.remaining_stock
            );
        }
        OrderAction::List => {
            let session = ctx.session().await;
            if !gate(session.as_ref(), &Route::Account) {
                return Ok(());
            }

            let orders = ctx.api.fetch_orders().await?;
            tracing::info!("{} order(s)", orders.len());
            for order in &orders {
                let total = order
                    .total_price
                    .map_or_else(|| "-".to_owned(), |t| t.round_dp(2).to_string());
                tracing::info!(
                    "  {} - {} x {} kg, total {}, status {}",
                    order.id,
                    order.product_name,
                    order.quantity,
                    total,
                    order.status.as_deref().unwrap_or("unknown")
                );
            }
        }
    }
    Ok(())
}

/// Best-effort product preview for the price line; ordering proceeds
/// even if this fetch fails (the workflow fetches again as needed).
async fn preview(ctx: &Context, product_id: &ProductId) -> Option<farmstall_core::Product> {
    if let Some(product) = ctx.cache.get(product_id).await {
        return Some(product);
    }
    match ctx.api.fetch_product(product_id).await {
        Ok(product) => {
            ctx.cache.insert(product.clone()).await;
            Some(product)
        }
        Err(e) => {
            tracing::debug!(error = %e, "product preview unavailable");
            None
        }
    }
}
