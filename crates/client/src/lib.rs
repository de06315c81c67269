//! Customer Desk Client - Remote access and view-models for customer records.
//!
//! # Architecture
//!
//! - [`api`] - `reqwest` client for the remote customer service
//! - [`store`] - Shared in-memory collection the list renders from
//! - [`refresh`] - Periodic full-list refresh as a scoped subscription
//! - [`view`] - Search filtering and pagination
//! - [`forms`] - Create, update and delete view-models
//! - [`directory`] - The list screen tying the pieces together
//! - [`config`] - Environment-based configuration
//!
//! The remote service is the source of truth. The store is a cache that is
//! replaced on every refresh and patched only after a write is confirmed.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod directory;
pub mod forms;
pub mod refresh;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{ApiError, CustomerApi, CustomerRemote};
pub use config::{ApiConfig, ClientConfig, ConfigError};
pub use directory::CustomerDirectory;
pub use forms::{
    CreateForm, CustomerDraft, DeleteForm, FormError, FormStatus, UpdateForm, ValidationError,
};
pub use refresh::RefreshLoop;
pub use store::CollectionStore;
pub use view::{ListView, PageView};
