//! In-memory collection of customers backing the list view.
//!
//! The store is the single source of truth for what the list shows. It is
//! replaced wholesale by the refresh loop and patched by successful writes.
//! Every operation takes the lock once and releases it before returning, so no
//! caller can observe a half-applied mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use customer_desk_core::{Customer, CustomerId};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Shared, ordered, id-unique collection of customers.
///
/// Cloning yields another handle to the same collection.
#[derive(Clone)]
pub struct CollectionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    customers: RwLock<Vec<Customer>>,
    revision: watch::Sender<u64>,
    closed: AtomicBool,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("len", &self.len())
            .field("revision", &self.revision())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl CollectionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                customers: RwLock::new(Vec::new()),
                revision,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Create a store seeded with `customers`.
    #[must_use]
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let store = Self::new();
        *store.write() = customers;
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Customer>> {
        self.inner
            .customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Customer>> {
        self.inner
            .customers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `mutate` under the write lock unless the store is closed, then
    /// publish a new revision.
    fn mutate(&self, operation: &'static str, mutate: impl FnOnce(&mut Vec<Customer>)) -> bool {
        if self.is_closed() {
            debug!(operation, "Ignoring mutation on closed store");
            return false;
        }

        {
            let mut customers = self.write();
            mutate(&mut customers);
        }

        self.inner.revision.send_modify(|rev| *rev += 1);
        true
    }

    /// Replace the whole collection.
    pub fn replace_all(&self, customers: Vec<Customer>) {
        self.mutate("replace_all", |current| *current = customers);
    }

    /// Replace the element whose id matches `updated`.
    ///
    /// No-op if `updated` has no id or no element matches.
    pub fn upsert_from_update(&self, updated: Customer) {
        let Some(id) = updated.id else {
            warn!("Ignoring update for customer without id");
            return;
        };

        self.mutate("upsert_from_update", |current| {
            match current.iter_mut().find(|c| c.id == Some(id)) {
                Some(slot) => *slot = updated,
                None => debug!(customer_id = %id, "Updated customer not in store"),
            }
        });
    }

    /// Append a newly created record.
    ///
    /// If a refresh already brought in a record with the same id, that element
    /// is replaced in place instead so ids stay unique.
    pub fn insert(&self, created: Customer) {
        self.mutate("insert", |current| {
            let existing = created
                .id
                .and_then(|id| current.iter_mut().find(|c| c.id == Some(id)));
            match existing {
                Some(slot) => *slot = created,
                None => current.push(created),
            }
        });
    }

    /// Remove the element with `id`. No-op if absent.
    pub fn remove_by_id(&self, id: CustomerId) {
        self.mutate("remove_by_id", |current| {
            current.retain(|c| c.id != Some(id));
        });
    }

    /// Copy of the current contents, in store order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Customer> {
        self.read().clone()
    }

    /// Run `f` against the current contents without copying them.
    pub fn with_customers_ref<T>(&self, f: impl FnOnce(&[Customer]) -> T) -> T {
        f(&self.read())
    }

    /// Look up a customer by id.
    #[must_use]
    pub fn get(&self, id: CustomerId) -> Option<Customer> {
        self.read().iter().find(|c| c.id == Some(id)).cloned()
    }

    /// Number of customers held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no customers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Monotonic counter bumped by every applied mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Subscribe to revision changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Stop accepting mutations.
    ///
    /// Called when the owning view is torn down; results of requests that
    /// complete afterwards are dropped.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    /// Accept mutations again after [`close`](Self::close).
    pub fn reopen(&self) {
        self.inner.closed.store(false, Ordering::Release);
    }

    /// Whether the store is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::customer;

    fn ids(store: &CollectionStore) -> Vec<i64> {
        store
            .snapshot()
            .iter()
            .filter_map(|c| c.id.map(|id| id.as_i64()))
            .collect()
    }

    #[test]
    fn test_replace_all_is_total() {
        let store = CollectionStore::with_customers(vec![customer(1, "Ana", "Souza")]);
        store.replace_all(vec![customer(2, "Bia", "Lima"), customer(3, "Caio", "Reis")]);
        assert_eq!(ids(&store), vec![2, 3]);
    }

    #[test]
    fn test_upsert_replaces_matching_element_only() {
        let store = CollectionStore::with_customers(vec![
            customer(1, "Ana", "Souza"),
            customer(2, "Bia", "Lima"),
        ]);
        store.upsert_from_update(customer(2, "Beatriz", "Lima"));

        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(
            store.get(CustomerId::new(2)).map(|c| c.first_name),
            Some("Beatriz".to_string())
        );
    }

    #[test]
    fn test_upsert_absent_is_noop() {
        let store = CollectionStore::with_customers(vec![customer(1, "Ana", "Souza")]);
        store.upsert_from_update(customer(9, "Zed", "Zero"));
        assert_eq!(ids(&store), vec![1]);
    }

    #[test]
    fn test_insert_appends() {
        let store = CollectionStore::with_customers(vec![customer(1, "Ana", "Souza")]);
        store.insert(customer(5, "Eva", "Melo"));
        assert_eq!(ids(&store), vec![1, 5]);
    }

    #[test]
    fn test_insert_keeps_ids_unique() {
        let store = CollectionStore::with_customers(vec![
            customer(5, "Eva", "Melo"),
            customer(6, "Fabio", "Dias"),
        ]);
        store.insert(customer(5, "Eva", "Melo Neto"));

        assert_eq!(ids(&store), vec![5, 6]);
        assert_eq!(store.snapshot()[0].last_name, "Melo Neto");
    }

    #[test]
    fn test_remove_by_id() {
        let store = CollectionStore::with_customers(vec![
            customer(1, "Ana", "Souza"),
            customer(2, "Bia", "Lima"),
        ]);
        store.remove_by_id(CustomerId::new(1));
        assert_eq!(ids(&store), vec![2]);

        store.remove_by_id(CustomerId::new(42));
        assert_eq!(ids(&store), vec![2]);
    }

    #[test]
    fn test_revision_bumps_on_each_mutation() {
        let store = CollectionStore::new();
        let rx = store.subscribe();
        assert_eq!(store.revision(), 0);

        store.insert(customer(1, "Ana", "Souza"));
        store.remove_by_id(CustomerId::new(1));

        assert_eq!(store.revision(), 2);
        assert_eq!(*rx.borrow(), 2);
    }

    #[test]
    fn test_closed_store_ignores_mutations() {
        let store = CollectionStore::with_customers(vec![customer(1, "Ana", "Souza")]);
        store.close();

        store.replace_all(Vec::new());
        store.insert(customer(2, "Bia", "Lima"));
        store.remove_by_id(CustomerId::new(1));

        assert!(store.is_closed());
        assert_eq!(ids(&store), vec![1]);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_reopen_accepts_mutations_again() {
        let store = CollectionStore::with_customers(vec![customer(1, "Ana", "Souza")]);
        store.close();
        store.insert(customer(2, "Bia", "Lima"));
        assert_eq!(ids(&store), vec![1]);

        store.reopen();
        store.insert(customer(2, "Bia", "Lima"));
        assert!(!store.is_closed());
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_clones_share_state() {
        let store = CollectionStore::new();
        let other = store.clone();
        other.insert(customer(1, "Ana", "Souza"));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
