//! Customer Desk Core - Shared domain types.
//!
//! This crate provides the customer record types used by every Customer Desk
//! component:
//! - `client` - Remote API client and view-models (store, refresh, forms)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no runtime.
//! The serde mapping matches the remote service's JSON field names, so these
//! types are sent and received as-is.
//!
//! # Modules
//!
//! - [`types`] - Customer, address and phone records plus the type-safe [`CustomerId`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
