//! Port binding reconciliation using the plan-execute pattern.
//!
//! Reconciliation is split into two phases:
//! 1. **Planning**: normalize the desired binding, snapshot the store's
//!    current bindings, and decide the minimal mutation (add, remove, or
//!    nothing).
//! 2. **Execution**: apply the plan's single mutation, or just report it
//!    in dry-run mode.
//!
//! The existence check during planning is the idempotence guarantee:
//! reconciling the same desired state twice mutates the store at most
//! once. The race window between the read and the write is covered
//! reactively by [`classify`](classify::classify).
//!
//! # Examples
//!
//! ```
//! use seport::{reconcile, MemoryStore, Protocol, ReconcileOptions};
//!
//! let mut store = MemoryStore::new();
//! let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");
//!
//! let outcome = reconcile(&options, &mut store).unwrap();
//! assert!(outcome.changed);
//!
//! // Reconciling again is a no-op.
//! let outcome = reconcile(&options, &mut store).unwrap();
//! assert!(!outcome.changed);
//! ```

pub mod classify;
pub mod executor;
pub mod plan;

pub use classify::{classify, Classification};
pub use executor::{PlanExecutor, ReconcileOutcome};
pub use plan::{OperationPlan, PlanAction};

use crate::binding::{Binding, BindingKey, Protocol};
use crate::error::{Error, Result};
use crate::port::PortRange;
use crate::store::BindingStore;

/// The desired state of one port binding.
///
/// `present = true` means "ensure existence", `present = false` means
/// "ensure absence". The port spec is kept as the raw user string and
/// normalized during planning, so validation failures surface from
/// [`ReconcilePlan::build_plan`] without touching the store.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// The raw port spec (`"8888"` or `"10000-10100"`).
    pub port: String,

    /// The network protocol.
    pub protocol: Protocol,

    /// The SELinux type label to bind.
    pub setype: String,

    /// The MLS/MCS range for additions.
    pub mls_range: String,

    /// Whether the binding should exist.
    pub present: bool,

    /// Whether to reload the active policy after a mutation.
    pub reload: bool,

    /// Whether to predict without mutating.
    pub dry_run: bool,
}

impl ReconcileOptions {
    /// Creates options ensuring presence, with reload on and dry-run off.
    ///
    /// # Examples
    ///
    /// ```
    /// use seport::{Protocol, ReconcileOptions};
    ///
    /// let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");
    /// assert!(options.present);
    /// assert!(options.reload);
    /// assert!(!options.dry_run);
    /// ```
    #[must_use]
    pub fn new(port: impl Into<String>, protocol: Protocol, setype: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            protocol,
            setype: setype.into(),
            mls_range: crate::binding::DEFAULT_MLS_RANGE.into(),
            present: true,
            reload: true,
            dry_run: false,
        }
    }

    /// Sets whether the binding should exist.
    #[must_use]
    pub fn with_present(mut self, present: bool) -> Self {
        self.present = present;
        self
    }

    /// Sets whether to reload the active policy after a mutation.
    #[must_use]
    pub fn with_reload(mut self, reload: bool) -> Self {
        self.reload = reload;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Overrides the MLS/MCS range used for additions.
    #[must_use]
    pub fn with_mls_range(mut self, mls_range: impl Into<String>) -> Self {
        self.mls_range = mls_range.into();
        self
    }

    /// Normalizes the desired binding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPortSpec`] for a malformed port spec and
    /// [`Error::Validation`] for an empty type label.
    pub fn desired_binding(&self) -> Result<Binding> {
        let range = PortRange::parse(&self.port)?;
        let key = BindingKey::new(range, self.protocol);
        let binding = Binding::new(key, self.setype.clone())?;
        Ok(binding.with_mls_range(self.mls_range.clone()))
    }
}

/// A reconciliation plan generator.
///
/// Analyzes the desired state against the store's current bindings and
/// produces an [`OperationPlan`] with at most one action.
pub struct ReconcilePlan {
    options: ReconcileOptions,
}

impl ReconcilePlan {
    /// Creates a planner for the given desired state.
    #[must_use]
    pub const fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    /// Builds the reconciliation plan.
    ///
    /// Existence is decided by exact structural membership of the desired
    /// key in the store's full listing; ranges are matched whole, never by
    /// overlap or containment. An existing binding for the same key with a
    /// different type label counts as present: label drift is a documented
    /// scope limit, not a conflict.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPortSpec`] / [`Error::Validation`] if the desired
    ///   binding does not normalize; the store is never queried in that
    ///   case.
    /// - [`Error::StoreUnavailable`] if the store listing fails.
    pub fn build_plan<S: BindingStore>(&self, store: &mut S) -> Result<OperationPlan> {
        let binding = self.options.desired_binding()?;
        let desired = if self.options.present {
            "present"
        } else {
            "absent"
        };

        let current = store.list_all().map_err(Error::StoreUnavailable)?;
        let present_now = current.contains(&binding.key);
        log::debug!(
            "binding {} is {} ({} bindings defined), desired {desired}",
            binding.key,
            if present_now { "present" } else { "absent" },
            current.len(),
        );

        let mut plan = OperationPlan::new(
            format!("Ensure binding {} is {desired}", binding.key),
            binding.clone(),
            self.options.reload,
        );

        match (self.options.present, present_now) {
            (true, false) => plan = plan.add_action(PlanAction::AddBinding(binding)),
            (false, true) => plan = plan.add_action(PlanAction::RemoveBinding(binding.key)),
            (true, true) => {
                plan = plan.add_warning(format!(
                    "Binding {} already present (nothing to do)",
                    binding.key
                ));
            }
            (false, false) => {
                plan = plan.add_warning(format!(
                    "Binding {} not present (nothing to do)",
                    binding.key
                ));
            }
        }

        Ok(plan)
    }
}

/// Reconciles one desired binding against the store.
///
/// Plans and executes in one call: parse and normalize, snapshot the
/// store, decide the minimal mutation, then apply it (or predict it, for
/// a dry-run). Issues at most one mutating call per invocation and never
/// retries.
///
/// # Errors
///
/// Returns the planning or execution error; see
/// [`ReconcilePlan::build_plan`] and [`PlanExecutor::execute`].
pub fn reconcile<S: BindingStore>(
    options: &ReconcileOptions,
    store: &mut S,
) -> Result<ReconcileOutcome> {
    let plan = ReconcilePlan::new(options.clone()).build_plan(store)?;
    let mut executor = PlanExecutor::new(store);
    if options.dry_run {
        executor = executor.dry_run();
    }
    executor.execute(&plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, RecordedCall, StoreError};
    use std::collections::HashSet;

    fn key(spec: &str, protocol: Protocol) -> BindingKey {
        BindingKey::new(PortRange::parse(spec).unwrap(), protocol)
    }

    // Spelled with the two-parameter Result: this module imports the
    // crate's one-parameter alias, which the generated impl must not pick
    // up.
    mockall::mock! {
        Store {}

        impl BindingStore for Store {
            fn list_all(&mut self) -> std::result::Result<HashSet<BindingKey>, StoreError>;
            fn set_reload(&mut self, reload: bool);
            fn add(&mut self, binding: &Binding) -> std::result::Result<(), StoreError>;
            fn remove(&mut self, key: &BindingKey) -> std::result::Result<(), StoreError>;
        }
    }

    #[test]
    fn test_add_against_empty_store() {
        // Desired present, empty store: one set_reload(true), one add.
        let mut store = MemoryStore::new();
        let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");

        let outcome = reconcile(&options, &mut store).unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.binding.key, key("8888", Protocol::Tcp));
        assert_eq!(outcome.binding.mls_range, "s0");
        assert_eq!(
            store.calls(),
            &[
                RecordedCall::ListAll,
                RecordedCall::SetReload(true),
                RecordedCall::Add(outcome.binding.clone()),
            ]
        );
    }

    #[test]
    fn test_present_binding_is_noop() {
        // Same desired state against a store already holding the key:
        // no add, no remove, unchanged.
        let mut store = MemoryStore::with_bindings([key("8888", Protocol::Tcp)]);
        let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");

        let outcome = reconcile(&options, &mut store).unwrap();

        assert!(!outcome.changed);
        assert_eq!(store.mutation_count(), 0);
    }

    #[test]
    fn test_remove_range() {
        let mut store = MemoryStore::with_bindings([key("10000-10100", Protocol::Tcp)]);
        let options = ReconcileOptions::new("10000-10100", Protocol::Tcp, "http_port_t")
            .with_present(false);

        let outcome = reconcile(&options, &mut store).unwrap();

        assert!(outcome.changed);
        assert!(!store.contains(&key("10000-10100", Protocol::Tcp)));
        assert_eq!(store.mutation_count(), 1);
    }

    #[test]
    fn test_absent_binding_is_noop() {
        let mut store = MemoryStore::new();
        let options =
            ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t").with_present(false);

        let outcome = reconcile(&options, &mut store).unwrap();

        assert!(!outcome.changed);
        assert_eq!(store.mutation_count(), 0);
        assert!(!outcome.warnings.is_empty());
    }

    #[test]
    fn test_idempotence() {
        // changed at most on the first call, unchanged on the second.
        let mut store = MemoryStore::new();
        let options = ReconcileOptions::new("8991", Protocol::Tcp, "ssh_port_t");

        assert!(reconcile(&options, &mut store).unwrap().changed);
        assert!(!reconcile(&options, &mut store).unwrap().changed);
        assert_eq!(store.mutation_count(), 1);

        let options = options.with_present(false);
        assert!(reconcile(&options, &mut store).unwrap().changed);
        assert!(!reconcile(&options, &mut store).unwrap().changed);
        assert_eq!(store.mutation_count(), 2);
    }

    #[test]
    fn test_exact_match_existence() {
        // (8080,8080,tcp) in the store does not satisfy (8080,8090,tcp).
        let mut store = MemoryStore::with_bindings([key("8080", Protocol::Tcp)]);
        let options = ReconcileOptions::new("8080-8090", Protocol::Tcp, "http_port_t");

        let outcome = reconcile(&options, &mut store).unwrap();

        assert!(outcome.changed);
        assert!(store.contains(&key("8080-8090", Protocol::Tcp)));
        assert!(store.contains(&key("8080", Protocol::Tcp)));
    }

    #[test]
    fn test_protocol_distinguishes_bindings() {
        let mut store = MemoryStore::with_bindings([key("514", Protocol::Udp)]);
        let options = ReconcileOptions::new("514", Protocol::Tcp, "syslogd_port_t");

        let outcome = reconcile(&options, &mut store).unwrap();
        assert!(outcome.changed);
    }

    #[test]
    fn test_validation_failure_never_touches_store() {
        let mut store = MockStore::new();
        // No expectations at all: any store call would panic.
        for spec in ["70000", "10100-10000", "80-90-100", ""] {
            let options = ReconcileOptions::new(spec, Protocol::Tcp, "http_port_t");
            let error = reconcile(&options, &mut store).unwrap_err();
            assert!(matches!(error, Error::InvalidPortSpec(_)), "spec {spec:?}");
        }
    }

    #[test]
    fn test_empty_setype_never_touches_store() {
        let mut store = MockStore::new();
        let options = ReconcileOptions::new("8888", Protocol::Tcp, " ");
        let error = reconcile(&options, &mut store).unwrap_err();
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn test_dry_run_reads_but_never_mutates() {
        let mut store = MockStore::new();
        store
            .expect_list_all()
            .times(1)
            .returning(|| Ok(HashSet::new()));
        // expect_add / expect_remove / expect_set_reload deliberately
        // absent: a mutation would panic the mock.

        let options =
            ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t").with_dry_run(true);
        let outcome = reconcile(&options, &mut store).unwrap();

        assert!(outcome.changed);
        assert!(outcome.dry_run);
        assert_eq!(outcome.actions_taken.len(), 1);
    }

    #[test]
    fn test_dry_run_predicts_noop() {
        let mut store = MemoryStore::with_bindings([key("8888", Protocol::Tcp)]);
        let options =
            ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t").with_dry_run(true);

        let outcome = reconcile(&options, &mut store).unwrap();

        assert!(!outcome.changed);
        assert_eq!(store.mutation_count(), 0);
    }

    #[test]
    fn test_listing_failure_is_store_unavailable() {
        let mut store = MemoryStore::new();
        store.fail_next(StoreError::Backend {
            message: "could not establish semanage connection".into(),
        });

        let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");
        let error = reconcile(&options, &mut store).unwrap_err();

        assert!(matches!(error, Error::StoreUnavailable(_)));
        assert_eq!(store.mutation_count(), 0);
    }

    #[test]
    fn test_race_between_read_and_write_tolerated() {
        let mut store = MemoryStore::new();
        let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");
        let plan = ReconcilePlan::new(options).build_plan(&mut store).unwrap();

        // Another actor adds the binding between the read and the write.
        store.insert_external(key("8888", Protocol::Tcp));

        let outcome = PlanExecutor::new(&mut store).execute(&plan).unwrap();
        assert!(!outcome.changed);
    }

    #[test]
    fn test_label_drift_counts_as_present() {
        // The store holds tcp/8888 under some other label; presence is
        // keyed on (range, protocol) only, so this is a no-op.
        let mut store = MemoryStore::with_bindings([key("8888", Protocol::Tcp)]);
        let options = ReconcileOptions::new("8888", Protocol::Tcp, "ssh_port_t");

        let outcome = reconcile(&options, &mut store).unwrap();
        assert!(!outcome.changed);
    }

    #[test]
    fn test_reload_disabled_passed_through() {
        let mut store = MemoryStore::new();
        let options =
            ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t").with_reload(false);

        reconcile(&options, &mut store).unwrap();

        assert!(store
            .calls()
            .contains(&RecordedCall::SetReload(false)));
    }

    #[test]
    fn test_mls_range_override() {
        let options = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t")
            .with_mls_range("s0-s0:c0.c255");
        let binding = options.desired_binding().unwrap();
        assert_eq!(binding.mls_range, "s0-s0:c0.c255");
    }
}
