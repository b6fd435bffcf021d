//! Farmstall Core - Shared types library.
//!
//! This crate provides common types used across all Farmstall components:
//! - `client` - Engine for sessions, routing, and storefront workflows
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no token
//! handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, roles, claims, sessions, and storefront entities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
