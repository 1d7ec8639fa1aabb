//! Policy store abstraction.
//!
//! The SELinux policy store is an external, host-wide system of record.
//! The reconciler only ever talks to it through the [`BindingStore`]
//! trait: one full listing, at most one mutation per reconciliation, and a
//! reload policy toggle scoped to the mutating call.

use std::collections::HashSet;

use thiserror::Error;

use crate::binding::{Binding, BindingKey};

pub mod memory;
pub mod semanage;

pub use memory::{MemoryStore, RecordedCall};
pub use semanage::SemanageStore;

/// Error type for policy store operations.
///
/// `Backend` failures carry the backend's own message text verbatim; the
/// reconciler's classifier matches against it to distinguish "already in
/// the desired state" from real failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store backend could not be invoked at all.
    #[error("failed to run '{command}': {source}")]
    Io {
        /// The command that could not be run.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store backend rejected the operation.
    #[error("policy store error: {message}")]
    Backend {
        /// The backend's own error text.
        message: String,
    },

    /// A line of the store's listing could not be parsed.
    #[error("unparseable policy listing line: '{line}'")]
    Listing {
        /// The offending listing line.
        line: String,
    },
}

/// Interface to the SELinux port binding store.
///
/// Implementations must guarantee that [`list_all`](Self::list_all) is
/// read-only and that [`set_reload`](Self::set_reload) only affects
/// subsequent mutations. The trait assumes exclusive, single-invocation
/// access for the duration of one reconciliation; concurrent external
/// mutation is tolerated reactively by the reconciler, not prevented here.
pub trait BindingStore {
    /// Returns the full set of currently defined binding keys.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be queried or its
    /// listing cannot be parsed.
    fn list_all(&mut self) -> Result<HashSet<BindingKey>, StoreError>;

    /// Sets whether the active policy is reloaded after a mutation.
    fn set_reload(&mut self, reload: bool);

    /// Adds a binding to the store.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend rejects the addition. A
    /// rejection naming this exact binding as already defined is folded
    /// away by the reconciler's classifier.
    fn add(&mut self, binding: &Binding) -> Result<(), StoreError>;

    /// Removes the binding identified by `key` from the store.
    ///
    /// The type label is irrelevant to removal; identity is the key alone.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend rejects the removal. A
    /// rejection naming this exact binding as not defined is folded away
    /// by the reconciler's classifier.
    fn remove(&mut self, key: &BindingKey) -> Result<(), StoreError>;
}
