//! Create form.

use customer_desk_core::Customer;
use tracing::{error, info, instrument};

use super::FormStatus;
use super::buffer::CustomerDraft;
use super::error::FormError;
use crate::api::CustomerRemote;
use crate::store::CollectionStore;

/// Message shown after a successful create.
pub const CREATED_MESSAGE: &str = "Customer created successfully";

/// Form for registering a new customer.
///
/// The buffer starts empty with one blank phone and is reset after every
/// successful submit, so the same form can register several customers.
#[derive(Debug)]
pub struct CreateForm<R> {
    remote: R,
    store: CollectionStore,
    draft: CustomerDraft,
    status: FormStatus,
}

impl<R: CustomerRemote> CreateForm<R> {
    #[must_use]
    pub fn new(remote: R, store: CollectionStore) -> Self {
        Self {
            remote,
            store,
            draft: CustomerDraft::blank(),
            status: FormStatus::Editing,
        }
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

    /// Validate and send the buffer.
    ///
    /// On success the created record is inserted into the store and the buffer
    /// is reset. On failure the buffer is kept and the message is recorded in
    /// [`status`](Self::status).
    ///
    /// # Errors
    ///
    /// Returns `FormError::Validation` without any network call if a local
    /// check fails, or `FormError::Api` if the service rejects the request.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Customer, FormError> {
        if let Err(e) = self.draft.validate_for_create() {
            self.status = FormStatus::Failed(e.to_string());
            return Err(e.into());
        }

        self.status = FormStatus::Submitting;
        match self.remote.create(self.draft.customer()).await {
            Ok(created) => {
                info!(customer_id = ?created.id, "Customer created");
                self.store.insert(created.clone());
                self.draft = CustomerDraft::blank();
                self.status = FormStatus::Done(CREATED_MESSAGE.to_string());
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "Failed to create customer");
                self.status = FormStatus::Failed(e.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::forms::ValidationError;
    use crate::testing::{FakeRemote, customer};

    fn fill(form: &mut CreateForm<FakeRemote>) {
        let draft = form.draft_mut();
        draft.set_field("first_name", "Eva").unwrap();
        draft.set_field("last_name", "Melo").unwrap();
        draft.set_field("city", "Recife").unwrap();
        draft.set_phone_area_code(0, "81").unwrap();
        draft.set_phone_number(0, "98888-1111").unwrap();
    }

    #[tokio::test]
    async fn test_incomplete_phone_rejected_without_network_call() {
        let remote = FakeRemote::default();
        let store = CollectionStore::new();
        let mut form = CreateForm::new(remote.clone(), store.clone());
        fill(&mut form);
        form.draft_mut().set_phone_number(0, "").unwrap();

        let err = form.submit().await.unwrap_err();

        assert!(matches!(
            err,
            FormError::Validation(ValidationError::IncompletePhone { index: 0 })
        ));
        assert!(form.status().is_failed());
        assert!(remote.calls().is_empty());
        assert!(store.is_empty());
        assert_eq!(form.draft().customer().first_name, "Eva");
    }

    #[tokio::test]
    async fn test_missing_names_rejected_locally() {
        let remote = FakeRemote::default();
        let mut form = CreateForm::new(remote.clone(), CollectionStore::new());

        let err = form.submit().await.unwrap_err();

        assert!(matches!(
            err,
            FormError::Validation(ValidationError::MissingFirstName)
        ));
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_name_is_sent() {
        let remote = FakeRemote::default();
        let mut form = CreateForm::new(remote.clone(), CollectionStore::new());
        fill(&mut form);
        form.draft_mut().set_field("first_name", " ").unwrap();

        let created = form.submit().await.unwrap();

        assert_eq!(created.first_name, " ");
        assert_eq!(remote.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_success_inserts_and_resets() {
        let remote = FakeRemote::with_customers(vec![customer(1, "Ana", "Souza")]);
        let store = CollectionStore::with_customers(vec![customer(1, "Ana", "Souza")]);
        let mut form = CreateForm::new(remote.clone(), store.clone());
        fill(&mut form);

        let created = form.submit().await.unwrap();

        assert_eq!(created.id.map(|id| id.as_i64()), Some(2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot()[1], created);
        assert_eq!(form.draft(), &CustomerDraft::blank());
        assert_eq!(form.status().message(), Some(CREATED_MESSAGE));
        assert_eq!(remote.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_buffer_and_store() {
        let remote = FakeRemote::default();
        remote.fail(
            "create",
            ApiError::Server {
                status: 500,
                message: "database unavailable".to_string(),
            },
        );
        let store = CollectionStore::new();
        let mut form = CreateForm::new(remote, store.clone());
        fill(&mut form);
        let before = form.draft().clone();

        let err = form.submit().await.unwrap_err();

        assert!(matches!(err, FormError::Api(ApiError::Server { status: 500, .. })));
        assert_eq!(form.draft(), &before);
        assert!(store.is_empty());
        assert!(
            form.status()
                .message()
                .is_some_and(|m| m.contains("database unavailable"))
        );
    }

    #[tokio::test]
    async fn test_editing_after_failure_returns_to_editing() {
        let mut form = CreateForm::new(FakeRemote::default(), CollectionStore::new());
        let _ = form.submit().await;
        assert!(form.status().is_failed());

        form.draft_mut().set_field("first_name", "Eva").unwrap();
        assert_eq!(form.status(), &FormStatus::Editing);
    }
}
