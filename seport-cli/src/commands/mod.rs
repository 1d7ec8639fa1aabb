//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `apply`: Reconcile a declared port binding against the policy store
//! - `list`: List currently defined port bindings

pub mod apply;
pub mod list;

pub use apply::ApplyCommand;
pub use list::ListCommand;
