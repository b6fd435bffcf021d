//! Vendor lifecycle commands.

use clap::Subcommand;

use farmstall_client::{AppError, Route, VendorWorkflow};
use farmstall_core::{VendorApplication, VendorApplicationId};

use super::{Context, gate};

#[derive(Subcommand)]
pub enum VendorAction {
    /// Apply to become a vendor (customers only)
    Apply {
        /// Shop name
        #[arg(short, long)]
        shop_name: String,

        /// Contact number
        #[arg(short, long)]
        contact: String,

        /// Shop description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List pending applications (admins only)
    Pending,
    /// Approve an application (admins only)
    Approve {
        /// Application ID
        id: String,
    },
    /// Reject an application (admins only)
    Reject {
        /// Application ID
        id: String,
    },
}

pub async fn run(ctx: &Context, action: VendorAction) -> Result<(), AppError> {
    let session = ctx.require_session().await?;
    let workflow = VendorWorkflow::new(ctx.api.clone());

    match action {
        VendorAction::Apply {
            shop_name,
            contact,
            description,
        } => {
            if !gate(Some(&session), &Route::ApplyVendor) {
                return Ok(());
            }
            workflow
                .apply(&session, shop_name, contact, description)
                .await?;
            tracing::info!("Application submitted; an admin will review it");
        }
        VendorAction::Pending => {
            if !gate(Some(&session), &Route::Admin) {
                return Ok(());
            }
            let pending = workflow.pending(&session).await?;
            list(&pending);
        }
        VendorAction::Approve { id } => {
            if !gate(Some(&session), &Route::Admin) {
                return Ok(());
            }
            let remaining = workflow
                .approve(&session, &VendorApplicationId::new(id))
                .await?;
            tracing::info!("Approved; pending list refreshed");
            list(&remaining);
        }
        VendorAction::Reject { id } => {
            if !gate(Some(&session), &Route::Admin) {
                return Ok(());
            }
            let remaining = workflow
                .reject(&session, &VendorApplicationId::new(id))
                .await?;
            tracing::info!("Rejected; pending list refreshed");
            list(&remaining);
        }
    }
    Ok(())
}

fn list(applications: &[VendorApplication]) {
    tracing::info!("{} pending application(s)", applications.len());
    for application in applications {
        tracing::info!(
            "  {} - {} by {} ({})",
            application.id,
            application.shop_name,
            application.user_id,
            application.contact
        );
    }
}
