//! Product browsing and vendor product management commands.

use std::path::PathBuf;

use clap::Subcommand;
use rust_decimal::Decimal;

use farmstall_client::api::{ImageUpload, ProductUpdate};
use farmstall_client::{AppError, Route, StoreBackend};
use farmstall_core::{Product, ProductId};

use super::{Context, gate};

#[derive(Subcommand)]
pub enum ProductAction {
    /// List all products
    List,
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
    /// Update one of your products (vendors only)
    Update {
        /// Product ID
        id: String,

        /// Product name
        #[arg(long)]
        name: String,

        /// Product description
        #[arg(long, default_value = "")]
        description: String,

        /// Price per kilogram
        #[arg(long)]
        price: Decimal,

        /// Stock in kilograms
        #[arg(long)]
        stock: Decimal,

        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

pub async fn run(ctx: &Context, action: ProductAction) -> Result<(), AppError> {
    match action {
        ProductAction::List => {
            let products = ctx.api.fetch_products().await?;
            ctx.cache.refresh(products.clone()).await;
            tracing::info!("{} product(s)", products.len());
            for product in &products {
                describe(product);
            }
        }
        ProductAction::Show { id } => {
            let id = ProductId::new(id);
            let product = ctx.api.fetch_product(&id).await?;
            ctx.cache.insert(product.clone()).await;
            describe(&product);
        }
        ProductAction::Update {
            id,
            name,
            description,
            price,
            stock,
            image,
        } => {
            let id = ProductId::new(id);
            let session = ctx.require_session().await?;
            if !gate(Some(&session), &Route::EditProduct(id.clone())) {
                return Ok(());
            }

            let image = match image {
                Some(path) => Some(load_image(&path)?),
                None => None,
            };

            let updated = ctx
                .api
                .update_product(
                    &id,
                    ProductUpdate {
                        name,
                        description,
                        price,
                        stock,
                        image,
                    },
                )
                .await?;
            ctx.cache.insert(updated.clone()).await;
            tracing::info!("Updated:");
            describe(&updated);
        }
    }
    Ok(())
}

fn load_image(path: &PathBuf) -> Result<ImageUpload, AppError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_owned(), |name| name.to_string_lossy().into_owned());
    Ok(ImageUpload { file_name, bytes })
}

fn describe(product: &Product) {
    tracing::info!(
        "  {} - {} @ {}/kg, {} kg in stock [{}]",
        product.id,
        product.name,
        product.price.round_dp(2),
        product.stock,
        product.vendor_id
    );
}
