//! # seport
//!
//! A library for reconciling declared SELinux port bindings against the
//! active policy store.
//!
//! A binding maps a network port (or inclusive port range) and protocol
//! to an SELinux type. Reconciliation compares one desired binding with
//! the store's current state and applies at most one mutation to close
//! the gap, so repeated runs converge without churning the policy.
//!
//! ## Features
//!
//! - **Declarative**: state what should exist, not the steps to get there
//! - **Idempotent**: a no-op when the store already matches
//! - **Dry-run**: report what would change without touching the store
//! - **Race tolerant**: a concurrent actor reaching the desired state
//!   first yields an unchanged outcome, not an error
//!
//! ## Example
//!
//! ```no_run
//! use seport::{reconcile, Protocol, ReconcileOptions, SemanageStore};
//!
//! # fn main() -> seport::Result<()> {
//! let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");
//! let mut store = SemanageStore::new();
//!
//! let outcome = reconcile(&options, &mut store)?;
//! if outcome.changed {
//!     println!("bound {}", outcome.binding);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binding;
pub mod config;
pub mod error;
pub mod logging;
pub mod port;
pub mod reconcile;
pub mod store;

pub use binding::{Binding, BindingKey, Protocol, DEFAULT_MLS_RANGE};
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use port::{Port, PortRange};
pub use reconcile::{
    classify, reconcile, Classification, OperationPlan, PlanAction, PlanExecutor,
    ReconcileOptions, ReconcileOutcome, ReconcilePlan,
};
pub use store::{BindingStore, MemoryStore, SemanageStore, StoreError};
