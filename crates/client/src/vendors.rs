//! Vendor application lifecycle.
//!
//! Customers apply; admins approve or reject. Both transitions are
//! fire-and-forget remote calls followed by a full re-fetch of the
//! pending list - the store is authoritative for list membership and
//! ordering, so nothing is removed optimistically and no order stability
//! is assumed across re-fetches.

use farmstall_core::{Role, Session, VendorApplication, VendorApplicationId};

use crate::api::{StoreBackend, VendorApplicationRequest};
use crate::error::{AppError, ValidationError};

/// Vendor lifecycle operations over a [`StoreBackend`].
pub struct VendorWorkflow<S> {
    backend: S,
}

impl<S: StoreBackend> VendorWorkflow<S> {
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Submit a vendor application. Customer-only; approval stays `false`
    /// on the session until an admin transitions the application and the
    /// next resolution cycle picks it up.
    ///
    /// # Errors
    ///
    /// Rejects locally for non-customer sessions; otherwise surfaces the
    /// store's answer.
    pub async fn apply(
        &self,
        session: &Session,
        shop_name: String,
        contact: String,
        description: Option<String>,
    ) -> Result<(), AppError> {
        require_role(session, Role::Customer)?;

        let request = VendorApplicationRequest {
            shop_name,
            whatsapp: contact,
            description,
        };
        self.backend.apply_vendor(&request).await?;
        tracing::debug!(user = %session.user_id, "vendor application submitted");
        Ok(())
    }

    /// Pending applications, in whatever order the store returns them.
    ///
    /// # Errors
    ///
    /// Rejects locally for non-admin sessions; otherwise surfaces the
    /// store's answer.
    pub async fn pending(&self, session: &Session) -> Result<Vec<VendorApplication>, AppError> {
        require_role(session, Role::Admin)?;
        Ok(self.backend.pending_vendors().await?)
    }

    /// Approve an application, then re-fetch the authoritative pending
    /// list.
    ///
    /// # Errors
    ///
    /// Rejects locally for non-admin sessions; otherwise surfaces the
    /// store's answer.
    pub async fn approve(
        &self,
        session: &Session,
        id: &VendorApplicationId,
    ) -> Result<Vec<VendorApplication>, AppError> {
        require_role(session, Role::Admin)?;
        self.backend.approve_vendor(id).await?;
        tracing::debug!(application = %id, "vendor application approved");
        Ok(self.backend.pending_vendors().await?)
    }

    /// Reject an application, then re-fetch the authoritative pending
    /// list.
    ///
    /// # Errors
    ///
    /// Rejects locally for non-admin sessions; otherwise surfaces the
    /// store's answer.
    pub async fn reject(
        &self,
        session: &Session,
        id: &VendorApplicationId,
    ) -> Result<Vec<VendorApplication>, AppError> {
        require_role(session, Role::Admin)?;
        self.backend.reject_vendor(id).await?;
        tracing::debug!(application = %id, "vendor application rejected");
        Ok(self.backend.pending_vendors().await?)
    }
}

fn require_role(session: &Session, required: Role) -> Result<(), ValidationError> {
    if session.role == required {
        Ok(())
    } else {
        Err(ValidationError::RequiresRole { required })
    }
}
