//! In-memory [`CustomerRemote`] used by unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use customer_desk_core::{Address, Customer, CustomerId, Phone};

use crate::api::{ApiError, CustomerRemote};

/// Build a persisted customer with one phone.
pub fn customer(id: i64, first_name: &str, last_name: &str) -> Customer {
    Customer {
        id: Some(CustomerId::new(id)),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: None,
        address: Address {
            state: "SP".to_string(),
            city: "Campinas".to_string(),
            neighborhood: "Centro".to_string(),
            street: "Rua das Flores".to_string(),
            number: "100".to_string(),
            postal_code: None,
            additional_info: None,
        },
        phones: vec![Phone::new("19", "99999-0000")],
    }
}

#[derive(Default)]
struct FakeState {
    customers: Vec<Customer>,
    next_id: i64,
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, ApiError>,
}

/// Records every call and serves an in-memory collection.
#[derive(Clone, Default)]
pub struct FakeRemote {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRemote {
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let next_id = customers
            .iter()
            .filter_map(|c| c.id.map(|id| id.as_i64()))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            state: Arc::new(Mutex::new(FakeState {
                customers,
                next_id,
                ..FakeState::default()
            })),
        }
    }

    /// Make every subsequent call to `operation` fail with `error`.
    pub fn fail(&self, operation: &'static str, error: ApiError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    /// Let `operation` succeed again.
    pub fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failures.remove(operation);
    }

    /// Replace the server-side collection.
    pub fn set_customers(&self, customers: Vec<Customer>) {
        self.state.lock().unwrap().customers = customers;
    }

    /// Operations called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, operation: &'static str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation);
        state.failures.get(operation).cloned().map_or(Ok(()), Err)
    }
}

fn not_found() -> ApiError {
    ApiError::Server {
        status: 404,
        message: "Not Found".to_string(),
    }
}

impl CustomerRemote for FakeRemote {
    async fn list(&self) -> Result<Vec<Customer>, ApiError> {
        self.record("list")?;
        Ok(self.state.lock().unwrap().customers.clone())
    }

    async fn get(&self, id: CustomerId) -> Result<Customer, ApiError> {
        self.record("get")?;
        let state = self.state.lock().unwrap();
        state
            .customers
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create(&self, customer: &Customer) -> Result<Customer, ApiError> {
        self.record("create")?;
        let mut state = self.state.lock().unwrap();
        let mut created = customer.without_id();
        created.id = Some(CustomerId::new(state.next_id));
        state.next_id += 1;
        state.customers.push(created.clone());
        Ok(created)
    }

    async fn update(&self, customer: &Customer) -> Result<Customer, ApiError> {
        self.record("update")?;
        let mut state = self.state.lock().unwrap();
        let slot = state
            .customers
            .iter_mut()
            .find(|c| c.id.is_some() && c.id == customer.id)
            .ok_or_else(not_found)?;
        *slot = customer.clone();
        Ok(customer.clone())
    }

    async fn delete(&self, id: CustomerId) -> Result<(), ApiError> {
        self.record("delete")?;
        let mut state = self.state.lock().unwrap();
        let before = state.customers.len();
        state.customers.retain(|c| c.id != Some(id));
        if state.customers.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
