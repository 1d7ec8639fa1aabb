//! Plan execution against the policy store.
//!
//! The executor applies a reconciliation plan: nothing for a no-op,
//! a prediction for a dry-run, or the plan's single mutation otherwise.
//! Mutation failures are routed through the classifier so that a race
//! with a concurrent actor folds into "unchanged" instead of failing.

use crate::binding::Binding;
use crate::error::{Error, Result};
use crate::store::BindingStore;

use super::classify::{classify, Classification};
use super::plan::{OperationPlan, PlanAction};

/// The result of one reconciliation.
///
/// Constructed fresh per call and consumed immediately by the caller;
/// there is no persistent lifecycle.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// Whether the store was (or, for a dry-run, would be) changed.
    pub changed: bool,

    /// Whether this was a dry-run.
    pub dry_run: bool,

    /// The normalized binding that was evaluated.
    pub binding: Binding,

    /// Descriptions of actions applied (or predicted, for a dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings accumulated during planning and execution.
    pub warnings: Vec<String>,
}

impl ReconcileOutcome {
    fn unchanged(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            changed: false,
            dry_run,
            binding: plan.binding.clone(),
            actions_taken: Vec::new(),
            warnings: plan.warnings.clone(),
        }
    }

    fn changed(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            changed: true,
            dry_run,
            binding: plan.binding.clone(),
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
        }
    }
}

/// Executes reconciliation plans against a [`BindingStore`].
///
/// In dry-run mode the executor reports what would change without calling
/// the store's mutating operations.
///
/// # Examples
///
/// ```
/// use seport::{MemoryStore, PlanExecutor, Protocol, ReconcileOptions, ReconcilePlan};
///
/// let mut store = MemoryStore::new();
/// let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");
/// let plan = ReconcilePlan::new(options).build_plan(&mut store).unwrap();
///
/// let outcome = PlanExecutor::new(&mut store).dry_run().execute(&plan).unwrap();
/// assert!(outcome.changed);
/// assert!(outcome.dry_run);
/// assert_eq!(store.mutation_count(), 0);
/// ```
pub struct PlanExecutor<'a, S: BindingStore> {
    store: &'a mut S,
    dry_run: bool,
}

impl<'a, S: BindingStore> PlanExecutor<'a, S> {
    /// Creates a new executor over the given store.
    #[must_use]
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// A dry-run never invokes the store's `add`, `remove`, or
    /// `set_reload`; the prediction comes entirely from the plan.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// Issues at most one mutating call and never retries it. A mutation
    /// rejected because a concurrent actor already brought the store into
    /// the desired state yields `changed = false` with a warning, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreFailure`] if the mutating call fails for any
    /// reason other than "already in the desired state".
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ReconcileOutcome> {
        debug_assert!(plan.actions.len() <= 1, "plans carry at most one action");

        if self.dry_run {
            log::debug!("dry-run: {}", plan.description);
            return Ok(if plan.is_empty() {
                ReconcileOutcome::unchanged(plan, true)
            } else {
                ReconcileOutcome::changed(plan, true)
            });
        }

        let Some(action) = plan.action() else {
            log::debug!("no-op: {}", plan.description);
            return Ok(ReconcileOutcome::unchanged(plan, false));
        };

        // The reload policy is scoped to the mutating call; no-ops and
        // dry-runs never touch it.
        self.store.set_reload(plan.reload);
        log::debug!("applying: {}", action.description());

        let result = match action {
            PlanAction::AddBinding(binding) => self.store.add(binding),
            PlanAction::RemoveBinding(key) => self.store.remove(key),
        };

        match result {
            Ok(()) => Ok(ReconcileOutcome::changed(plan, false)),
            Err(error) => match classify(action, &error) {
                Classification::AlreadyInDesiredState => {
                    log::debug!("store already in desired state: {error}");
                    let mut outcome = ReconcileOutcome::unchanged(plan, false);
                    outcome.warnings.push(format!(
                        "Binding {} was changed by another actor; already in the desired state",
                        action.key()
                    ));
                    Ok(outcome)
                }
                Classification::Transient | Classification::Fatal => Err(Error::StoreFailure {
                    action: action.description(),
                    source: error,
                }),
            },
        }
    }
}
