//! Module lifecycle integration tests: start barrier, run phase, shutdown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map, Value};
use module_host::{
    run_with_shutdown, Collaborator, ConfigParam, Dependency, LifecycleState, Module, ModuleSpec,
};

mod common;

fn overrides(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn no_collaborators() -> HashMap<String, Arc<dyn Collaborator>> {
    HashMap::new()
}

#[tokio::test]
async fn test_all_components_running_before_module_reports_running() {
    let (logger, _) = common::test_logger("demo");
    let spec = ModuleSpec::new("demo")
        .component(common::TickingComponent::new("alpha"))
        .component(common::TickingComponent::new("beta"))
        .component(common::TickingComponent::new("gamma"));
    let mut module = Module::new(spec, &Map::new(), &no_collaborators(), Some(logger)).unwrap();

    module.start().await.unwrap();

    assert_eq!(module.state(), LifecycleState::Running);
    for (name, state) in module.component_states() {
        assert_eq!(state, LifecycleState::Running, "component {name}");
    }

    assert_eq!(module.stop().await, LifecycleState::Stopped);
    for (name, state) in module.component_states() {
        assert_eq!(state, LifecycleState::Stopped, "component {name}");
    }
}

#[tokio::test]
async fn test_component_states_preserve_registration_order() {
    let spec = ModuleSpec::new("demo")
        .component(common::TickingComponent::new("first"))
        .component(common::TickingComponent::new("second"))
        .component(common::TickingComponent::new("third"));
    let module = Module::new(spec, &Map::new(), &no_collaborators(), None).unwrap();

    let names: Vec<String> = module
        .component_states()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_natural_completion_ends_the_run_phase() {
    let (logger, _) = common::test_logger("demo");
    let spec = ModuleSpec::new("demo")
        .component(common::OneShotComponent {
            name: "quick",
            iterations: 2,
        })
        .component(common::OneShotComponent {
            name: "quicker",
            iterations: 1,
        });
    let mut module = Module::new(spec, &Map::new(), &no_collaborators(), Some(logger)).unwrap();

    module.start().await.unwrap();
    // No external trigger: wait() resolves once every component finishes.
    tokio::time::timeout(Duration::from_secs(2), module.wait())
        .await
        .expect("run phase should end on its own");

    assert_eq!(module.stop().await, LifecycleState::Stopped);
    for (_, state) in module.component_states() {
        assert_eq!(state, LifecycleState::Stopped);
    }
}

#[tokio::test]
async fn test_shutdown_drives_every_component_terminal() {
    let (logger, sink) = common::test_logger("demo");
    let ticker = common::TickingComponent::new("ticker");
    let ticks = ticker.ticks.clone();
    let spec = ModuleSpec::new("demo").component(ticker);

    let outcome = run_with_shutdown(
        spec,
        &Map::new(),
        &no_collaborators(),
        logger,
        tokio::time::sleep(Duration::from_millis(100)),
    )
    .await
    .unwrap();

    assert!(outcome.is_clean());
    assert_eq!(outcome.state, LifecycleState::Stopped);
    assert!(outcome.error.is_none());
    assert_eq!(
        outcome.component_states,
        vec![("ticker".to_string(), LifecycleState::Stopped)]
    );
    assert!(ticks.load(std::sync::atomic::Ordering::SeqCst) > 0);

    // Component messages carry the nested module.component prefix.
    assert!(sink.contains("demo.ticker: Component running"));
    assert!(sink.contains("demo: Module stopped"));
}

#[tokio::test]
async fn test_module_without_components_idles_until_shutdown() {
    let (logger, _) = common::test_logger("empty");
    let outcome = run_with_shutdown(
        ModuleSpec::new("empty"),
        &Map::new(),
        &no_collaborators(),
        logger,
        tokio::time::sleep(Duration::from_millis(50)),
    )
    .await
    .unwrap();

    assert_eq!(outcome.state, LifecycleState::Stopped);
    assert!(outcome.component_states.is_empty());
}

#[tokio::test]
async fn test_components_read_validated_config_through_context() {
    let (logger, _) = common::test_logger("demo");
    let (probe, seen) = common::ConfigProbe::new("probe");
    let spec = ModuleSpec::new("demo")
        .param(
            ConfigParam::new("interval", "Seconds between runs")
                .default_value(json!(5))
                .validator(module_host::config::validators::positive()),
        )
        .dependency(
            Dependency::new("storage", "Key/value store")
                .method("save")
                .method("load"),
        )
        .component(probe);

    let mut collaborators: HashMap<String, Arc<dyn Collaborator>> = HashMap::new();
    collaborators.insert("storage".to_string(), Arc::new(common::MemoryStore));

    let mut module = Module::new(
        spec,
        &overrides(&[("interval", json!(2))]),
        &collaborators,
        Some(logger),
    )
    .unwrap();

    assert_eq!(module.config().get_i64("interval"), Some(2));
    assert!(module.dependencies().is_present("storage"));

    module.start().await.unwrap();
    module.stop().await;
    // The probe's run body always reads the config before observing
    // cancellation.
    assert_eq!(*seen.lock().unwrap(), Some(2));
}

#[tokio::test]
async fn test_log_threshold_applies_end_to_end() {
    let sink = Arc::new(module_host::MemorySink::new());
    let logger =
        module_host::Logger::with_sink(module_host::LogLevel::Warning, "demo", sink.clone());
    let spec = ModuleSpec::new("demo").component(common::TickingComponent::new("ticker"));

    let outcome = run_with_shutdown(
        spec,
        &Map::new(),
        &no_collaborators(),
        logger,
        tokio::time::sleep(Duration::from_millis(50)),
    )
    .await
    .unwrap();

    assert!(outcome.is_clean());
    // Everything in a clean run logs below WARNING.
    assert!(sink.entries().is_empty());
}
