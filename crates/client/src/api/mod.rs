//! Remote customer service access.
//!
//! This module provides:
//! - [`CustomerRemote`], the five logical operations the view-models depend on
//! - [`CustomerApi`], the `reqwest` implementation against the REST service
//! - [`ApiError`], the single normalized error type for all failures
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list | GET | `/clientes/` |
//! | get | GET | `/cliente/{id}/` |
//! | create | POST | `/cliente/cadastrar/` |
//! | update | PUT | `/cliente/atualizar` |
//! | delete | DELETE | `/cliente/excluir` |

mod client;
mod error;

use std::future::Future;

use customer_desk_core::{Customer, CustomerId};

pub use client::CustomerApi;
pub use error::ApiError;

/// The remote source of truth for customer records.
///
/// Implementations perform one round trip per call and never retry.
pub trait CustomerRemote: Send + Sync {
    /// Fetch every customer.
    fn list(&self) -> impl Future<Output = Result<Vec<Customer>, ApiError>> + Send;

    /// Fetch one customer by id.
    fn get(&self, id: CustomerId) -> impl Future<Output = Result<Customer, ApiError>> + Send;

    /// Create a customer. Any id on `customer` is ignored; the returned record
    /// carries the server-assigned id.
    fn create(&self, customer: &Customer)
    -> impl Future<Output = Result<Customer, ApiError>> + Send;

    /// Replace a customer with the full edited record.
    fn update(&self, customer: &Customer)
    -> impl Future<Output = Result<Customer, ApiError>> + Send;

    /// Delete a customer by id.
    fn delete(&self, id: CustomerId) -> impl Future<Output = Result<(), ApiError>> + Send;
}
