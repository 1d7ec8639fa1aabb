//! Plan types for reconciliation.
//!
//! A plan describes the single mutation (if any) needed to bring the
//! policy store in line with the desired binding, without performing it.

use crate::binding::{Binding, BindingKey};

/// The store mutation a plan will apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Add the binding to the store.
    AddBinding(Binding),

    /// Remove the binding identified by this key from the store.
    RemoveBinding(BindingKey),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::AddBinding(binding) => {
                format!(
                    "Add binding {} (mls range {})",
                    binding, binding.mls_range
                )
            }
            Self::RemoveBinding(key) => format!("Remove binding {key}"),
        }
    }

    /// Returns the key this action operates on.
    #[must_use]
    pub const fn key(&self) -> &BindingKey {
        match self {
            Self::AddBinding(binding) => &binding.key,
            Self::RemoveBinding(key) => key,
        }
    }
}

/// A reconciliation plan: the normalized binding that was evaluated, the
/// reload policy to apply, and at most one action.
///
/// No-op plans (the store already matches the desired state) carry no
/// actions and a warning explaining why nothing will be done. At most one
/// mutating action is ever planned per reconciliation.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the reconciliation.
    pub description: String,

    /// The normalized binding the plan evaluated.
    pub binding: Binding,

    /// Whether the active policy is reloaded after the mutation.
    pub reload: bool,

    /// The mutation to perform, if any.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the caller.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates an empty plan for the given binding.
    #[must_use]
    pub fn new(description: impl Into<String>, binding: Binding, reload: bool) -> Self {
        Self {
            description: description.into(),
            binding,
            reload,
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the plan's single action, if it has one.
    #[must_use]
    pub fn action(&self) -> Option<&PlanAction> {
        self.actions.first()
    }
}
