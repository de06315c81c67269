//! The customer directory screen: list, search, pagination and the forms
//! opened from it.
//!
//! The directory wires a [`CollectionStore`] to a [`RefreshLoop`] while mounted
//! and keeps at most one update form and one delete confirmation open.

use std::time::Duration;

use customer_desk_core::{Customer, CustomerId};
use tracing::{debug, info};

use crate::api::CustomerRemote;
use crate::config::ClientConfig;
use crate::forms::{CreateForm, DeleteForm, FormError, UpdateForm};
use crate::refresh::RefreshLoop;
use crate::store::CollectionStore;
use crate::view::{ListView, PageView};

/// Customer list screen state.
#[derive(Debug)]
pub struct CustomerDirectory<R> {
    remote: R,
    store: CollectionStore,
    view: ListView,
    refresh_interval: Duration,
    refresh: Option<RefreshLoop>,
    edit: Option<UpdateForm<R>>,
    delete: Option<DeleteForm<R>>,
}

impl<R> CustomerDirectory<R>
where
    R: CustomerRemote + Clone + 'static,
{
    /// Create an unmounted directory with an empty store.
    #[must_use]
    pub fn new(remote: R, config: &ClientConfig) -> Self {
        Self {
            remote,
            store: CollectionStore::new(),
            view: ListView::new(config.page_size),
            refresh_interval: config.refresh_interval,
            refresh: None,
            edit: None,
            delete: None,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &CollectionStore {
        &self.store
    }

    #[must_use]
    pub const fn view(&self) -> &ListView {
        &self.view
    }

    /// Start refreshing the store. No-op if already mounted.
    ///
    /// A store closed by [`teardown`](Self::teardown) is reopened first.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            debug!("Directory already mounted");
            return;
        }
        self.store.reopen();
        self.refresh = Some(RefreshLoop::start(
            self.remote.clone(),
            self.store.clone(),
            self.refresh_interval,
        ));
    }

    /// Stop refreshing and close the store.
    ///
    /// Requests still in flight complete against a closed store and are
    /// dropped.
    pub fn teardown(&mut self) {
        if let Some(mut refresh) = self.refresh.take() {
            refresh.stop();
        }
        self.store.close();
        info!("Directory torn down");
    }

    /// Whether the refresh loop is running.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.refresh.as_ref().is_some_and(RefreshLoop::is_running)
    }

    /// Current page of the list.
    #[must_use]
    pub fn render(&self) -> PageView {
        self.store.with_customers_ref(|customers| self.view.render(customers))
    }

    /// Change the search term and go back to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.view.set_search(term);
    }

    /// Navigate to `page`, clamped to the available pages.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let view = &mut self.view;
        self.store
            .with_customers_ref(|customers| view.go_to_page(page, customers))
    }

    pub fn next_page(&mut self) -> usize {
        let view = &mut self.view;
        self.store
            .with_customers_ref(|customers| view.next_page(customers))
    }

    pub fn previous_page(&mut self) -> usize {
        let view = &mut self.view;
        self.store
            .with_customers_ref(|customers| view.previous_page(customers))
    }

    /// A fresh create form bound to this directory's store.
    #[must_use]
    pub fn create_form(&self) -> CreateForm<R> {
        CreateForm::new(self.remote.clone(), self.store.clone())
    }

    /// Load customer `id` into the update form, replacing any open one.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Api` if the record cannot be fetched. No form is
    /// open afterwards.
    pub async fn open_edit(&mut self, id: CustomerId) -> Result<(), FormError> {
        self.edit = None;
        let form = UpdateForm::load(self.remote.clone(), self.store.clone(), id).await?;
        self.edit = Some(form);
        Ok(())
    }

    #[must_use]
    pub const fn edit_form(&self) -> Option<&UpdateForm<R>> {
        self.edit.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut UpdateForm<R>> {
        self.edit.as_mut()
    }

    /// Submit the open update form. Closes it on confirmed success.
    ///
    /// # Errors
    ///
    /// Returns `FormError::NotOpen` if no form is open, or the submit error.
    /// The form stays open on failure.
    pub async fn submit_edit(&mut self) -> Result<Customer, FormError> {
        let form = self.edit.as_mut().ok_or(FormError::NotOpen)?;
        let updated = form.submit().await?;
        if form.is_closed() {
            self.edit = None;
        }
        Ok(updated)
    }

    pub fn cancel_edit(&mut self) {
        if let Some(form) = self.edit.as_mut() {
            form.cancel();
        }
        self.edit = None;
    }

    /// Ask for confirmation before deleting customer `id`.
    pub fn open_delete(&mut self, id: CustomerId) {
        self.delete = Some(DeleteForm::new(
            self.remote.clone(),
            self.store.clone(),
            id,
        ));
    }

    #[must_use]
    pub const fn delete_form(&self) -> Option<&DeleteForm<R>> {
        self.delete.as_ref()
    }

    /// Confirm the open delete. Closes the dialog on confirmed success.
    ///
    /// # Errors
    ///
    /// Returns `FormError::NotOpen` if no confirmation is open, or the delete
    /// error. The dialog stays open on failure.
    pub async fn confirm_delete(&mut self) -> Result<(), FormError> {
        let form = self.delete.as_mut().ok_or(FormError::NotOpen)?;
        form.submit().await?;
        if form.is_closed() {
            self.delete = None;
        }
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        if let Some(form) = self.delete.as_mut() {
            form.cancel();
        }
        self.delete = None;
    }
}
