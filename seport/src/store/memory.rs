//! In-memory policy store for tests and offline use.
//!
//! [`MemoryStore`] mimics the observable behavior of the semanage-backed
//! store, including the backend error text emitted for duplicate adds and
//! missing removals, and records every call for assertions.

use std::collections::HashSet;

use crate::binding::{Binding, BindingKey};

use super::{BindingStore, StoreError};

/// A record of one call made against a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// The full listing was queried.
    ListAll,
    /// The reload policy was set.
    SetReload(bool),
    /// An add was attempted.
    Add(Binding),
    /// A removal was attempted.
    Remove(BindingKey),
}

/// An in-memory [`BindingStore`] holding a mutable set of binding keys.
///
/// Duplicate adds and removals of absent keys fail with the same message
/// shapes the real backend produces, so the reconciler's race-window
/// classification can be exercised without a live policy store.
///
/// # Examples
///
/// ```
/// use seport::{Binding, BindingKey, MemoryStore, PortRange, Protocol};
/// use seport::store::BindingStore;
///
/// let mut store = MemoryStore::new();
/// let key = BindingKey::new(PortRange::parse("8888").unwrap(), Protocol::Tcp);
/// let binding = Binding::new(key, "http_port_t").unwrap();
///
/// store.add(&binding).unwrap();
/// assert!(store.contains(&key));
///
/// // A second add fails the way the real backend does.
/// let err = store.add(&binding).unwrap_err();
/// assert!(err.to_string().contains("already defined"));
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    bindings: HashSet<BindingKey>,
    calls: Vec<RecordedCall>,
    reload: bool,
    fail_next: Option<StoreError>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashSet::new(),
            calls: Vec::new(),
            reload: true,
            fail_next: None,
        }
    }

    /// Creates a store pre-populated with the given keys.
    #[must_use]
    pub fn with_bindings(keys: impl IntoIterator<Item = BindingKey>) -> Self {
        let mut store = Self::new();
        store.bindings = keys.into_iter().collect();
        store
    }

    /// Returns `true` if the store currently holds `key`.
    #[must_use]
    pub fn contains(&self, key: &BindingKey) -> bool {
        self.bindings.contains(key)
    }

    /// Returns every call recorded so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Returns the number of mutating calls (adds and removals) recorded.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, RecordedCall::Add(_) | RecordedCall::Remove(_)))
            .count()
    }

    /// Returns the currently configured reload policy.
    #[must_use]
    pub const fn reload(&self) -> bool {
        self.reload
    }

    /// Makes the next store call fail with `error`, once.
    pub fn fail_next(&mut self, error: StoreError) {
        self.fail_next = Some(error);
    }

    /// Inserts a key directly, bypassing call recording.
    ///
    /// Simulates an external actor racing the reconciler between its read
    /// and its write.
    pub fn insert_external(&mut self, key: BindingKey) {
        self.bindings.insert(key);
    }

    /// Removes a key directly, bypassing call recording.
    ///
    /// Simulates an external actor racing the reconciler between its read
    /// and its write.
    pub fn remove_external(&mut self, key: &BindingKey) {
        self.bindings.remove(key);
    }

    fn take_injected_failure(&mut self) -> Result<(), StoreError> {
        match self.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingStore for MemoryStore {
    fn list_all(&mut self) -> Result<HashSet<BindingKey>, StoreError> {
        self.calls.push(RecordedCall::ListAll);
        self.take_injected_failure()?;
        Ok(self.bindings.clone())
    }

    fn set_reload(&mut self, reload: bool) {
        self.calls.push(RecordedCall::SetReload(reload));
        self.reload = reload;
    }

    fn add(&mut self, binding: &Binding) -> Result<(), StoreError> {
        self.calls.push(RecordedCall::Add(binding.clone()));
        self.take_injected_failure()?;
        if !self.bindings.insert(binding.key) {
            return Err(StoreError::Backend {
                message: format!("ValueError: Port {} already defined", binding.key),
            });
        }
        Ok(())
    }

    fn remove(&mut self, key: &BindingKey) -> Result<(), StoreError> {
        self.calls.push(RecordedCall::Remove(*key));
        self.take_injected_failure()?;
        if !self.bindings.remove(key) {
            return Err(StoreError::Backend {
                message: format!("ValueError: Port {key} is not defined"),
            });
        }
        Ok(())
    }
}
