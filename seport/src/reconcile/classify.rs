//! Classification of store failures raised by a mutating call.
//!
//! The existence check performed during planning is the primary
//! idempotence mechanism; this classifier only covers the race window
//! between the store read and the store write, where another actor may
//! have applied the same mutation first. Matching the backend's message
//! text is best-effort: a failure must name both the condition and the
//! exact binding to be folded away, and anything unrecognized is fatal,
//! never guessed.

use crate::store::StoreError;

use super::plan::PlanAction;

/// The outcome of classifying a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The store already matches the desired state; not an error.
    AlreadyInDesiredState,

    /// A retryable failure. Nothing currently maps here: the store is
    /// local and synchronous and there is no retry policy. The variant
    /// exists for callers wrapping a remote store backend.
    Transient,

    /// A real failure to surface to the caller.
    Fatal,
}

/// Classifies a failure raised while applying `action`.
///
/// An add rejected because this exact binding is already defined, or a
/// removal rejected because it is not defined, means a concurrent actor
/// already performed the mutation; both classify as
/// [`Classification::AlreadyInDesiredState`]. Everything else is
/// [`Classification::Fatal`].
#[must_use]
pub fn classify(action: &PlanAction, error: &StoreError) -> Classification {
    let StoreError::Backend { message } = error else {
        return Classification::Fatal;
    };

    // The backend phrases these failures as "Port proto/portspec already
    // defined" / "Port proto/portspec is not defined". Require the full
    // phrase, with the condition directly after the key, so a failure
    // about some other binding whose key merely shares a prefix
    // (tcp/8888 vs tcp/8888-8890) is never folded away.
    let key = action.key();
    let already = match action {
        PlanAction::AddBinding(_) => message.contains(&format!("Port {key} already defined")),
        PlanAction::RemoveBinding(_) => message.contains(&format!("Port {key} is not defined")),
    };

    if already {
        Classification::AlreadyInDesiredState
    } else {
        Classification::Fatal
    }
}
