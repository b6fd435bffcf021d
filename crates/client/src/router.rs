//! Role-gated route decisions.
//!
//! [`permitted_view`] is a pure function of `(session, route)` - no
//! navigation side effects, no I/O - so every gating rule is unit
//! testable. The decision is advisory UX only: the remote store is the
//! enforcement point and re-checks permissions on every state-changing
//! call.

use farmstall_core::{ProductId, Role, Session};

/// A navigable view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Product browsing; open to everyone.
    Home,
    /// Login / signup; only reachable while anonymous.
    Auth,
    /// Vendor application form; customers only.
    ApplyVendor,
    /// Pending-application review; admins only.
    Admin,
    /// A vendor's own product listing; vendors only.
    VendorProducts,
    /// The signed-in user's orders and profile.
    Account,
    /// One product; open to everyone (ordering inside requires a
    /// session).
    ProductDetails(ProductId),
    /// Product edit form; vendors only.
    EditProduct(ProductId),
}

/// Outcome of asking for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show the requested view.
    Allow(Route),
    /// Navigate elsewhere instead.
    Redirect(Route),
}

/// Decide which view a session may see for a requested route.
#[must_use]
pub fn permitted_view(session: Option<&Session>, requested: &Route) -> RouteDecision {
    let role = session.map(|s| s.role);

    match requested {
        Route::Home | Route::ProductDetails(_) => RouteDecision::Allow(requested.clone()),

        Route::Auth => match role {
            None => RouteDecision::Allow(Route::Auth),
            Some(Role::Admin) => RouteDecision::Redirect(Route::Admin),
            Some(_) => RouteDecision::Redirect(Route::Home),
        },

        Route::ApplyVendor => match role {
            Some(Role::Customer) => RouteDecision::Allow(Route::ApplyVendor),
            _ => RouteDecision::Redirect(Route::Home),
        },

        Route::Admin => match role {
            Some(Role::Admin) => RouteDecision::Allow(Route::Admin),
            _ => RouteDecision::Redirect(Route::Home),
        },

        Route::VendorProducts | Route::EditProduct(_) => match role {
            Some(Role::Vendor) => RouteDecision::Allow(requested.clone()),
            _ => RouteDecision::Redirect(Route::Home),
        },

        Route::Account => match role {
            Some(_) => RouteDecision::Allow(Route::Account),
            None => RouteDecision::Redirect(Route::Auth),
        },
    }
}

/// Parse a path and decide in one step; unmatched paths redirect home.
#[must_use]
pub fn route_for_path(session: Option<&Session>, path: &str) -> RouteDecision {
    parse_path(path).map_or(RouteDecision::Redirect(Route::Home), |route| {
        permitted_view(session, &route)
    })
}

/// Map a request path onto a route. Unknown paths are `None`.
#[must_use]
pub fn parse_path(path: &str) -> Option<Route> {
    let trimmed = path.trim_matches('/');
    let mut segments = trimmed.split('/').filter(|s| !s.is_empty());

    match (segments.next(), segments.next(), segments.next()) {
        (None, ..) => Some(Route::Home),
        (Some("auth"), None, _) => Some(Route::Auth),
        (Some("apply-vendor"), None, _) => Some(Route::ApplyVendor),
        (Some("admin"), None, _) => Some(Route::Admin),
        (Some("vendor"), Some("products"), None) => Some(Route::VendorProducts),
        (Some("account"), None, _) => Some(Route::Account),
        (Some("products"), Some(id), None) => Some(Route::ProductDetails(ProductId::new(id))),
        (Some("products"), Some(id), Some("edit")) => Some(Route::EditProduct(ProductId::new(id))),
        _ => None,
    }
}
