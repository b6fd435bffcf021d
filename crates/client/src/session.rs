//! Session resolution and the vendor-approval poll.
//!
//! A [`SessionResolver`] turns the stored token into a [`Session`]:
//! decode the claims, then (for customer and vendor roles) confirm vendor
//! approval with one remote status lookup. Resolution may be re-run at
//! any time - on startup, after login or signup, and on a timer - and its
//! result always replaces the previous session wholesale.
//!
//! The poll exists so a customer whose vendor application is approved
//! while the shell is open sees the change without re-logging-in. It is
//! tied to an explicit [`VendorPollHandle`]; dropping or cancelling the
//! handle stops the task, so no orphaned timer keeps mutating state after
//! the owning view is gone.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use farmstall_core::{Role, Session};

use crate::api::StoreBackend;
use crate::store::TokenStore;
use crate::token;

/// How often an active customer session re-checks vendor approval.
pub const VENDOR_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Derives sessions from the token slot plus one remote status lookup.
#[derive(Clone)]
pub struct SessionResolver<S> {
    backend: S,
    store: TokenStore,
}

impl<S: StoreBackend> SessionResolver<S> {
    pub const fn new(backend: S, store: TokenStore) -> Self {
        Self { backend, store }
    }

    /// Resolve the current session, or `None` for anonymous.
    ///
    /// An unreadable slot resolves to anonymous. A token that fails to
    /// decode (malformed or expired) also clears the slot, so a dead
    /// token is not re-tried on every cycle. The vendor-status lookup is
    /// consulted for vendor and customer roles; any failure there leaves
    /// `vendor_approved` at `false` - approval is never assumed.
    pub async fn resolve(&self) -> Option<Session> {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "token slot unreadable; resolving as anonymous");
                return None;
            }
        };

        let claims = match token::decode(&token, Utc::now()) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "stored token is dead; clearing the slot");
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "failed to clear dead token");
                }
                return None;
            }
        };

        let session = Session::from_claims(&claims);

        let approved = match session.role {
            // Admins have no vendor standing to look up.
            Role::Admin => false,
            Role::Customer | Role::Vendor => {
                match self.backend.vendor_status(&session.user_id).await {
                    Ok(status) => status.is_approved(),
                    Err(e) => {
                        tracing::warn!(error = %e, user = %session.user_id,
                            "vendor status lookup failed; treating as not approved");
                        false
                    }
                }
            }
        };

        Some(session.with_vendor_approved(approved))
    }
}

/// Handle to the periodic vendor-approval poll.
///
/// The poll re-resolves the session on a fixed interval and publishes
/// each result wholesale through a watch channel. It stops on `cancel()`,
/// on drop, and on its own when the published role is no longer
/// `customer` (an approved vendor or a logout both end the reason to
/// poll).
pub struct VendorPollHandle {
    task: JoinHandle<()>,
}

impl VendorPollHandle {
    /// Spawn the poll with the default 30-second interval.
    pub fn spawn<S>(resolver: SessionResolver<S>) -> (watch::Receiver<Option<Session>>, Self)
    where
        S: StoreBackend + Clone + 'static,
    {
        Self::spawn_with_interval(resolver, VENDOR_POLL_INTERVAL)
    }

    /// Spawn the poll with a caller-chosen interval (tests use short
    /// ones).
    pub fn spawn_with_interval<S>(
        resolver: SessionResolver<S>,
        interval: Duration,
    ) -> (watch::Receiver<Option<Session>>, Self)
    where
        S: StoreBackend + Clone + 'static,
    {
        let (tx, rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let session = resolver.resolve().await;
                let keep_polling = matches!(
                    &session,
                    Some(s) if s.role == Role::Customer
                );

                // Wholesale replacement: observers never see a partial
                // session.
                if tx.send(session).is_err() {
                    tracing::debug!("session watchers gone; stopping vendor poll");
                    break;
                }
                if !keep_polling {
                    tracing::debug!("session left customer role; stopping vendor poll");
                    break;
                }
            }
        });

        (rx, Self { task })
    }

    /// Stop the poll now. Safe to call more than once.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for VendorPollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
