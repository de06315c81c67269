//! HTTP client for the customer service.
//!
//! Every operation performs exactly one round trip with the configured timeout.
//! Redirects are never followed: the service answers some mutations with
//! `302 Found` and the record in the body, which is accepted as a success.

use std::sync::Arc;

use customer_desk_core::{Customer, CustomerId};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::ApiConfig;

use super::CustomerRemote;
use super::error::ApiError;

const LIST_PATH: &str = "clientes/";
const CREATE_PATH: &str = "cliente/cadastrar/";
const UPDATE_PATH: &str = "cliente/atualizar";
const DELETE_PATH: &str = "cliente/excluir";

/// Customer service API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CustomerApi {
    inner: Arc<CustomerApiInner>,
}

struct CustomerApiInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for CustomerApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerApi")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(serde::Serialize)]
struct DeleteRequest {
    id: CustomerId,
}

impl CustomerApi {
    /// Create a new customer service client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner: Arc::new(CustomerApiInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and accept 2xx or 302 responses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            let err = ApiError::from(e);
            warn!(error = %err, "Customer service request failed");
            err
        })?;

        let status = response.status();
        if is_accepted(status) {
            if status == StatusCode::FOUND {
                debug!(%status, "Treating redirect response as success");
            }
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = ApiError::from_response(status, &body);
        error!(error = %err, "Customer service returned an error");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.bytes().await.map_err(|e| {
            let err = ApiError::from(e);
            warn!(error = %err, "Failed to read customer service response");
            err
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            error!(error = %e, "Failed to decode customer service response");
            ApiError::Decode(e.to_string())
        })
    }
}

impl CustomerRemote for CustomerApi {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Customer>, ApiError> {
        let url = self.endpoint(LIST_PATH)?;
        let response = self.send(self.inner.client.get(url)).await?;
        let customers: Vec<Customer> = Self::decode(response).await?;

        debug!(count = customers.len(), "Fetched customer list");
        Ok(customers)
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn get(&self, id: CustomerId) -> Result<Customer, ApiError> {
        let url = self.endpoint(&format!("cliente/{id}/"))?;
        let response = self.send(self.inner.client.get(url)).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, customer))]
    async fn create(&self, customer: &Customer) -> Result<Customer, ApiError> {
        let url = self.endpoint(CREATE_PATH)?;
        let payload = customer.without_id();
        let response = self
            .send(self.inner.client.post(url).json(&payload))
            .await?;
        let created: Customer = Self::decode(response).await?;

        debug!(customer_id = ?created.id, "Customer created");
        Ok(created)
    }

    #[instrument(skip(self, customer), fields(customer_id = ?customer.id))]
    async fn update(&self, customer: &Customer) -> Result<Customer, ApiError> {
        let url = self.endpoint(UPDATE_PATH)?;
        let response = self.send(self.inner.client.put(url).json(customer)).await?;
        let updated: Customer = Self::decode(response).await?;

        debug!("Customer updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn delete(&self, id: CustomerId) -> Result<(), ApiError> {
        let url = self.endpoint(DELETE_PATH)?;
        self.send(self.inner.client.delete(url).json(&DeleteRequest { id }))
            .await?;

        debug!("Customer deleted");
        Ok(())
    }
}

/// Whether a response status counts as success.
///
/// Any 2xx and `302 Found` are accepted; other redirects are not followed.
fn is_accepted(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::FOUND
}
