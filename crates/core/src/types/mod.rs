//! Core types for Customer Desk.
//!
//! This module provides the customer record and its type-safe identifier.

pub mod customer;
pub mod id;

pub use customer::{Address, Customer, Phone, PhoneParseError};
pub use id::*;
