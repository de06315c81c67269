//! Delete confirmation.

use customer_desk_core::CustomerId;
use tracing::{error, info, instrument};

use super::FormStatus;
use super::error::FormError;
use crate::api::CustomerRemote;
use crate::store::CollectionStore;

/// Message shown after a successful delete.
pub const DELETED_MESSAGE: &str = "Customer deleted successfully";

/// Confirmation dialog for deleting one customer.
#[derive(Debug)]
pub struct DeleteForm<R> {
    remote: R,
    store: CollectionStore,
    id: CustomerId,
    status: FormStatus,
    closed: bool,
}

impl<R: CustomerRemote> DeleteForm<R> {
    #[must_use]
    pub const fn new(remote: R, store: CollectionStore, id: CustomerId) -> Self {
        Self {
            remote,
            store,
            id,
            status: FormStatus::Editing,
            closed: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    #[must_use]
    pub const fn status(&self) -> &FormStatus {
        &self.status
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Delete the customer and wait for the result.
    ///
    /// The record leaves the store only after the service confirms.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Api` if the service rejects the request.
    #[instrument(skip(self), fields(customer_id = %self.id))]
    pub async fn submit(&mut self) -> Result<(), FormError> {
        self.status = FormStatus::Submitting;
        match self.remote.delete(self.id).await {
            Ok(()) => {
                info!("Customer deleted");
                self.store.remove_by_id(self.id);
                self.status = FormStatus::Done(DELETED_MESSAGE.to_string());
                self.closed = true;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to delete customer");
                self.status = FormStatus::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Close without sending anything.
    pub fn cancel(&mut self) {
        self.closed = true;
    }
}
