//! Integration tests for binding reconciliation.
//!
//! This test suite exercises the public API end to end:
//! - Full lifecycle (add, converge, remove, converge)
//! - Dry-run prediction followed by a real apply
//! - Tolerance of concurrent actors racing the reconciler
//! - Store construction from resolved configuration

use seport::{
    reconcile, Binding, BindingKey, Config, MemoryStore, PlanExecutor, PortRange, Protocol,
    ReconcileOptions, ReconcilePlan, SemanageStore,
};
use std::path::PathBuf;

fn key(spec: &str, protocol: Protocol) -> BindingKey {
    BindingKey::new(PortRange::parse(spec).unwrap(), protocol)
}

#[test]
fn test_full_lifecycle_converges() {
    // Present twice, then absent twice: exactly one mutation per state
    // change, none for the repeats.

    let mut store = MemoryStore::new();
    let present = ReconcileOptions::new("8888", Protocol::Tcp, "http_port_t");

    assert!(reconcile(&present, &mut store).unwrap().changed);
    assert!(store.contains(&key("8888", Protocol::Tcp)));
    assert!(!reconcile(&present, &mut store).unwrap().changed);
    assert_eq!(store.mutation_count(), 1);

    let absent = present.clone().with_present(false);
    assert!(reconcile(&absent, &mut store).unwrap().changed);
    assert!(!store.contains(&key("8888", Protocol::Tcp)));
    assert!(!reconcile(&absent, &mut store).unwrap().changed);
    assert_eq!(store.mutation_count(), 2);
}

#[test]
fn test_bindings_are_independent() {
    // Reconciling one binding never disturbs others, including the same
    // port under the other protocol.

    let mut store = MemoryStore::with_bindings([
        key("514", Protocol::Udp),
        key("80", Protocol::Tcp),
    ]);

    let options = ReconcileOptions::new("514", Protocol::Tcp, "syslogd_port_t");
    assert!(reconcile(&options, &mut store).unwrap().changed);

    assert!(store.contains(&key("514", Protocol::Tcp)));
    assert!(store.contains(&key("514", Protocol::Udp)));
    assert!(store.contains(&key("80", Protocol::Tcp)));
}

#[test]
fn test_dry_run_then_apply() {
    // A dry-run predicts the mutation without applying it; the real run
    // then performs exactly that mutation.

    let mut store = MemoryStore::new();
    let options = ReconcileOptions::new("10000-10100", Protocol::Udp, "my_app_port_t")
        .with_dry_run(true);

    let predicted = reconcile(&options, &mut store).unwrap();
    assert!(predicted.changed);
    assert!(predicted.dry_run);
    assert_eq!(store.mutation_count(), 0);

    let options = options.with_dry_run(false);
    let applied = reconcile(&options, &mut store).unwrap();
    assert!(applied.changed);
    assert!(!applied.dry_run);
    assert_eq!(applied.actions_taken, predicted.actions_taken);
    assert!(store.contains(&key("10000-10100", Protocol::Udp)));
}

#[test]
fn test_concurrent_actor_between_plan_and_execute() {
    // A binding added by another actor between planning and execution
    // folds into an unchanged outcome with a warning instead of failing.

    let mut store = MemoryStore::new();
    let options = ReconcileOptions::new("9090", Protocol::Tcp, "http_port_t");
    let plan = ReconcilePlan::new(options).build_plan(&mut store).unwrap();

    store.insert_external(key("9090", Protocol::Tcp));

    let outcome = PlanExecutor::new(&mut store).execute(&plan).unwrap();
    assert!(!outcome.changed);
    assert!(outcome.warnings.iter().any(|w| w.contains("another actor")));

    // And the system has converged: a fresh reconciliation is a no-op.
    let options = ReconcileOptions::new("9090", Protocol::Tcp, "http_port_t");
    assert!(!reconcile(&options, &mut store).unwrap().changed);
}

#[test]
fn test_outcome_reports_normalized_binding() {
    let mut store = MemoryStore::new();
    let options = ReconcileOptions::new("8080-8090", Protocol::Tcp, "http_port_t")
        .with_mls_range("s0-s0:c0.c255");

    let outcome = reconcile(&options, &mut store).unwrap();

    assert_eq!(outcome.binding.key.range.to_string(), "8080-8090");
    assert_eq!(outcome.binding.setype, "http_port_t");
    assert_eq!(outcome.binding.mls_range, "s0-s0:c0.c255");
}

#[test]
fn test_semanage_store_from_config() {
    let config = Config {
        semanage_path: PathBuf::from("/opt/bin/semanage"),
        default_mls_range: "s0".to_string(),
        reload: false,
    };

    let store = SemanageStore::from_config(&config);
    assert_eq!(store.semanage_path(), PathBuf::from("/opt/bin/semanage"));
}

#[test]
fn test_binding_display_round_trip() {
    let binding = Binding::new(key("8888", Protocol::Tcp), "http_port_t").unwrap();
    assert_eq!(binding.to_string(), "tcp/8888 -> http_port_t");
    assert_eq!(binding.key.to_string(), "tcp/8888");
}
