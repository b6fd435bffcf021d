//! Error taxonomy for the client engine.
//!
//! Three families, with distinct recovery policies:
//!
//! - [`DecodeError`] - malformed or expired token. Recovered silently:
//!   the caller falls back to an anonymous session.
//! - [`RemoteError`] - the remote store rejected or failed a call. The
//!   message is surfaced to the user; local cached state is never mutated
//!   on the failure path.
//! - [`ValidationError`] - a local precondition failed. The operation is
//!   blocked before any network call is made.
//!
//! No operation is retried automatically; retries are user-initiated.

use rust_decimal::Decimal;
use thiserror::Error;

use farmstall_core::Role;

use crate::config::ConfigError;

/// Token decode failures. All of these are treated as "no session".
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Token does not have exactly three dot-separated segments.
    #[error("token does not have three segments")]
    Segments,

    /// Payload segment is not valid base64url.
    #[error("payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Payload is not the expected JSON structure (including a missing
    /// subject id).
    #[error("payload is not a valid claims object: {0}")]
    Payload(#[from] serde_json::Error),

    /// Subject id present but empty.
    #[error("claims subject is empty")]
    EmptySubject,

    /// `exp` is in the past.
    #[error("token expired")]
    Expired,
}

/// Failures talking to the Remote Store API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned 401. The stored token has already been cleared
    /// by the time this surfaces.
    #[error("session rejected by the store (401)")]
    Unauthorized,

    /// Non-2xx response; `message` is the store's own wording, surfaced
    /// verbatim.
    #[error("store error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the normalized contract.
    #[error("unexpected response shape: {0}")]
    Shape(String),

    /// Response body was not valid JSON for the expected type.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The token slot could not be updated during an auth flow.
    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),
}

/// Local precondition failures, checked before any network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Quantity below the order minimum.
    #[error("quantity {quantity} kg is below the {minimum} kg minimum")]
    BelowMinimum { quantity: Decimal, minimum: Decimal },

    /// Quantity above the hard per-order ceiling.
    #[error("quantity {quantity} kg exceeds the {ceiling} kg per-order limit")]
    AboveCeiling { quantity: Decimal, ceiling: Decimal },

    /// Quantity not strictly below available stock.
    #[error("quantity {quantity} kg is not available (stock: {stock} kg)")]
    ExceedsStock { quantity: Decimal, stock: Decimal },

    /// Required contact field is empty.
    #[error("missing contact field: {0}")]
    MissingContact(&'static str),

    /// The action requires a session with a specific role.
    #[error("action requires {required} role")]
    RequiresRole { required: Role },

    /// The action requires any session.
    #[error("action requires a signed-in session")]
    RequiresSession,
}

/// Order workflow outcome errors.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A submission for this draft is already in flight.
    #[error("an order submission is already in flight")]
    InFlight,
}

/// Aggregate error for front ends that thread everything through one type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Order(#[from] OrderError),

    /// Token store I/O failure.
    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),
}
