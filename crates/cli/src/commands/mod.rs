//! Command implementations and shared wiring.

pub mod auth;
pub mod orders;
pub mod products;
pub mod vendors;

use farmstall_client::{
    AppError, ClientConfig, ProductCache, Route, RouteDecision, SessionResolver, StoreApi,
    TokenStore, ValidationError, permitted_view, route_for_path,
};
use farmstall_core::Session;

/// Everything a command needs: the API client, the shared token slot,
/// and the product cache.
pub struct Context {
    pub api: StoreApi,
    pub store: TokenStore,
    pub cache: ProductCache,
}

impl Context {
    /// Build the context from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when configuration is missing or the HTTP client
    /// cannot be built.
    pub fn from_env() -> Result<Self, AppError> {
        let config = ClientConfig::from_env()?;
        let store = TokenStore::new(config.token_path.clone());
        let api = StoreApi::new(&config, store.clone())?;
        Ok(Self {
            api,
            store,
            cache: ProductCache::new(),
        })
    }

    fn resolver(&self) -> SessionResolver<StoreApi> {
        SessionResolver::new(self.api.clone(), self.store.clone())
    }

    /// Resolve the current session, anonymous allowed.
    pub async fn session(&self) -> Option<Session> {
        self.resolver().resolve().await
    }

    /// Resolve the current session, erroring for anonymous callers.
    pub async fn require_session(&self) -> Result<Session, AppError> {
        self.session()
            .await
            .ok_or(AppError::Validation(ValidationError::RequiresSession))
    }
}

/// Apply the router's decision for a view-backed command. A redirect is
/// reported and the command is skipped - mirroring what the navigation
/// layer does, a redirect is not a failure.
pub fn gate(session: Option<&Session>, requested: &Route) -> bool {
    match permitted_view(session, requested) {
        RouteDecision::Allow(_) => true,
        RouteDecision::Redirect(target) => {
            tracing::warn!("view not available for this session; redirecting to {target:?}");
            false
        }
    }
}

/// `route` command: show the decision for a raw path.
pub async fn route(ctx: &Context, path: &str) {
    let session = ctx.session().await;
    match route_for_path(session.as_ref(), path) {
        RouteDecision::Allow(view) => tracing::info!("{path} -> show {view:?}"),
        RouteDecision::Redirect(target) => tracing::info!("{path} -> redirect to {target:?}"),
    }
}
