//! Farmstall client engine.
//!
//! Everything between the remote store and a front end lives here:
//!
//! - [`token`] - bearer-token payload codec (no signature verification)
//! - [`store`] - single-slot persisted token store
//! - [`session`] - session resolver and the cancellable vendor-status poll
//! - [`router`] - pure role-gated route decisions
//! - [`api`] - Remote Store API collaborator (HTTP/JSON, bearer auth)
//! - [`products`] - read-mostly product cache with verbatim stock patches
//! - [`orders`] - order placement workflow
//! - [`vendors`] - vendor application lifecycle workflow
//!
//! # Trust model
//!
//! The client decodes token claims for UI gating only. Authorization is
//! enforced by the remote store on every state-changing request; a 401 on
//! any authenticated call clears the stored token and drops the caller
//! back to an anonymous state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod orders;
pub mod products;
pub mod router;
pub mod session;
pub mod store;
pub mod token;
pub mod vendors;

pub use api::{StoreApi, StoreBackend};
pub use config::{ClientConfig, ConfigError};
pub use error::{AppError, DecodeError, OrderError, RemoteError, ValidationError};
pub use orders::OrderWorkflow;
pub use products::ProductCache;
pub use router::{Route, RouteDecision, permitted_view, route_for_path};
pub use session::{SessionResolver, VendorPollHandle};
pub use store::TokenStore;
pub use vendors::VendorWorkflow;
