//! Integration tests for Customer Desk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p customer-desk-integration-tests
//! ```
//!
//! Tests run the real [`CustomerApi`] against [`MockServer`], an in-process
//! `axum` implementation of the customer service bound to an ephemeral port.
//! No external services are needed.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use customer_desk_client::{ApiConfig, CustomerApi};
use customer_desk_core::{Customer, CustomerId};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Field the mock adds to every record it returns, to check that clients
/// ignore unknown fields.
pub const SERVER_ADDED_FIELD: &str = "dataCadastro";

#[derive(Debug, Default)]
struct MockState {
    customers: Vec<Customer>,
    next_id: i64,
    requests: Vec<String>,
    redirect_writes: bool,
    list_failure: Option<(StatusCode, String)>,
    delete_failure: Option<(StatusCode, String)>,
}

type SharedState = Arc<Mutex<MockState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process customer service.
///
/// The server task is aborted on drop.
pub struct MockServer {
    addr: SocketAddr,
    state: SharedState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Start an empty server on `127.0.0.1` with an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::with_customers(Vec::new()).await
    }

    /// Start a server seeded with `customers`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn with_customers(customers: Vec<Customer>) -> std::io::Result<Self> {
        let next_id = customers
            .iter()
            .filter_map(|c| c.id.map(|id| id.as_i64()))
            .max()
            .unwrap_or(0)
            + 1;
        let state: SharedState = Arc::new(Mutex::new(MockState {
            customers,
            next_id,
            ..MockState::default()
        }));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL of the server, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client pointed at this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn api(&self) -> Result<CustomerApi, Box<dyn std::error::Error>> {
        let config = ApiConfig::new(&self.base_url())?;
        Ok(CustomerApi::new(&config)?)
    }

    /// Answer create and update with `302 Found` (and the usual body).
    pub fn redirect_writes(&self, enabled: bool) {
        lock(&self.state).redirect_writes = enabled;
    }

    /// Make the list endpoint fail until cleared with `None`.
    pub fn fail_list(&self, failure: Option<(StatusCode, &str)>) {
        lock(&self.state).list_failure = failure.map(|(s, m)| (s, m.to_string()));
    }

    /// Make the delete endpoint fail until cleared with `None`.
    pub fn fail_delete(&self, failure: Option<(StatusCode, &str)>) {
        lock(&self.state).delete_failure = failure.map(|(s, m)| (s, m.to_string()));
    }

    /// Server-side records.
    #[must_use]
    pub fn customers(&self) -> Vec<Customer> {
        lock(&self.state).customers.clone()
    }

    /// Replace the server-side records.
    pub fn set_customers(&self, customers: Vec<Customer>) {
        lock(&self.state).customers = customers;
    }

    /// Requests received so far, as `METHOD path`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/clientes/", get(list_customers))
        .route("/cliente/{id}/", get(get_customer))
        .route("/cliente/cadastrar/", post(create_customer))
        .route("/cliente/atualizar", put(update_customer))
        .route("/cliente/excluir", delete(delete_customer))
        .with_state(state)
}

fn with_server_fields(customer: &Customer) -> Value {
    let mut value = json!(customer);
    if let Some(object) = value.as_object_mut() {
        object.insert(SERVER_ADDED_FIELD.to_string(), json!("2024-01-01T00:00:00Z"));
    }
    value
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn write_response(redirect: bool, customer: &Customer) -> Response {
    let body = Json(with_server_fields(customer));
    if redirect {
        (StatusCode::FOUND, [(header::LOCATION, "/clientes/")], body).into_response()
    } else {
        body.into_response()
    }
}

async fn list_customers(State(state): State<SharedState>) -> Response {
    let mut state = lock(&state);
    state.requests.push("GET /clientes/".to_string());

    if let Some((status, message)) = &state.list_failure {
        return error_response(*status, message);
    }
    let body: Vec<Value> = state.customers.iter().map(with_server_fields).collect();
    Json(body).into_response()
}

async fn get_customer(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let mut state = lock(&state);
    state.requests.push(format!("GET /cliente/{id}/"));

    state
        .customers
        .iter()
        .find(|c| c.id == Some(CustomerId::new(id)))
        .map_or_else(
            || error_response(StatusCode::NOT_FOUND, "customer not found"),
            |c| Json(with_server_fields(c)).into_response(),
        )
}

async fn create_customer(
    State(state): State<SharedState>,
    Json(mut customer): Json<Customer>,
) -> Response {
    let mut state = lock(&state);
    state.requests.push("POST /cliente/cadastrar/".to_string());

    if customer.id.is_some() {
        return error_response(StatusCode::BAD_REQUEST, "id must not be sent on create");
    }
    customer.id = Some(CustomerId::new(state.next_id));
    state.next_id += 1;
    state.customers.push(customer.clone());
    write_response(state.redirect_writes, &customer)
}

async fn update_customer(
    State(state): State<SharedState>,
    Json(customer): Json<Customer>,
) -> Response {
    let mut state = lock(&state);
    state.requests.push("PUT /cliente/atualizar".to_string());

    let redirect = state.redirect_writes;
    let Some(slot) = state
        .customers
        .iter_mut()
        .find(|c| c.id.is_some() && c.id == customer.id)
    else {
        return error_response(StatusCode::NOT_FOUND, "customer not found");
    };
    *slot = customer.clone();
    write_response(redirect, &customer)
}

#[derive(Deserialize)]
struct DeleteRequest {
    id: i64,
}

async fn delete_customer(
    State(state): State<SharedState>,
    Json(request): Json<DeleteRequest>,
) -> Response {
    let mut state = lock(&state);
    state.requests.push(format!("DELETE /cliente/excluir {}", request.id));

    if let Some((status, message)) = &state.delete_failure {
        return error_response(*status, message);
    }
    let before = state.customers.len();
    state
        .customers
        .retain(|c| c.id != Some(CustomerId::new(request.id)));
    if state.customers.len() == before {
        return error_response(StatusCode::NOT_FOUND, "customer not found");
    }
    StatusCode::OK.into_response()
}
