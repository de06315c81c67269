//! Update form.

use customer_desk_core::{Customer, CustomerId};
use tracing::{error, info, instrument};

use super::FormStatus;
use super::buffer::CustomerDraft;
use super::error::FormError;
use crate::api::CustomerRemote;
use crate::store::CollectionStore;

/// Message shown after a successful update.
pub const UPDATED_MESSAGE: &str = "Customer updated successfully";

/// Form for editing an existing customer.
///
/// Built with [`UpdateForm::load`], which fetches the record once. The form is
/// closed after a confirmed update or an explicit [`cancel`](Self::cancel).
#[derive(Debug)]
pub struct UpdateForm<R> {
    remote: R,
    store: CollectionStore,
    id: CustomerId,
    draft: CustomerDraft,
    status: FormStatus,
    closed: bool,
}

impl<R: CustomerRemote> UpdateForm<R> {
    /// Fetch customer `id` and seed the buffer with it.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Api` if the record cannot be fetched.
    #[instrument(skip(remote, store), fields(customer_id = %id))]
    pub async fn load(
        remote: R,
        store: CollectionStore,
        id: CustomerId,
    ) -> Result<Self, FormError> {
        let customer = remote
            .get(id)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to load customer for editing"))?;

        let mut draft = CustomerDraft::from_customer(customer);
        draft.set_id(id);

        Ok(Self {
            remote,
            store,
            id,
            draft,
            status: FormStatus::Editing,
            closed: false,
        })
    }

    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    #[must_use]
    pub const fn draft(&self) -> &CustomerDraft {
        &self.draft
    }

    /// Mutable access to the buffer. Editing returns the form to `Editing`.
    pub fn draft_mut(&mut self) -> &mut CustomerDraft {
        self.status = FormStatus::Editing;
        &mut self.draft
    }

    #[must_use]
    pub const fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Whether the parent should dismiss this form.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Validate and send the full edited record.
    ///
    /// Only a confirmed success updates the store and closes the form.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Validation` without any network call if a local
    /// check fails, or `FormError::Api` if the service rejects the request.
    #[instrument(skip(self), fields(customer_id = %self.id))]
    pub async fn submit(&mut self) -> Result<Customer, FormError> {
        if let Err(e) = self.draft.validate_for_update() {
            self.status = FormStatus::Failed(e.to_string());
            return Err(e.into());
        }

        self.status = FormStatus::Submitting;
        match self.remote.update(self.draft.customer()).await {
            Ok(updated) => {
                info!("Customer updated");
                self.store.upsert_from_update(updated.clone());
                self.status = FormStatus::Done(UPDATED_MESSAGE.to_string());
                self.closed = true;
                Ok(updated)
            }
            Err(e) => {
                error!(error = %e, "Failed to update customer");
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
