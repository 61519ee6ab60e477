//! Heartbeat demo binary.
//!
//! Wires a small module through the host: a `ticker` component that logs a
//! configurable message on an interval and records its beat count through a
//! `storage` collaborator. Mostly useful as a worked example of the
//! declaration → validation → supervision flow:
//!
//! ```text
//! config.json (optional)
//!     → loader (module section "heartbeat")
//!     → ModuleSpec { message, interval, count; storage: save/load; ticker }
//!     → run_module (stops on ctrl-c, or after `count` beats)
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use serde_json::{json, Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use module_host::config::{loader, validators};
use module_host::{
    run_module, Collaborator, Component, ComponentContext, ConfigParam, Dependency, LogLevel,
    ModuleSpec, OperationError,
};

#[derive(Parser)]
#[command(name = "module-host", about = "Run the heartbeat demo module")]
struct Args {
    /// Path to a JSON config file; searches the working directory for
    /// `config.json` when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log threshold: debug, verbose, info, warning, error.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// In-memory key/value collaborator satisfying the `storage` contract.
struct MemoryStore {
    cells: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    fn save(&self, key: &str, value: Value) {
        if let Ok(mut cells) = self.cells.lock() {
            cells.insert(key.to_string(), value);
        }
    }

    fn load(&self, key: &str) -> Option<Value> {
        self.cells.lock().ok()?.get(key).cloned()
    }
}

impl Collaborator for MemoryStore {
    fn methods(&self) -> &[&'static str] {
        &["save", "load"]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Logs the configured message every interval and persists the beat count.
struct Ticker {
    beats: u64,
}

#[async_trait]
impl Component for Ticker {
    fn name(&self) -> &str {
        "ticker"
    }

    async fn on_start(&mut self, ctx: &ComponentContext) -> Result<(), OperationError> {
        // Resume the count a previous run left behind, if any.
        if let Some(store) = ctx.dependencies().downcast_ref::<MemoryStore>("storage") {
            if let Some(beats) = store.load("beats").and_then(|v| v.as_u64()) {
                self.beats = beats;
            }
        }
        Ok(())
    }

    async fn on_run(&mut self, ctx: &ComponentContext) -> Result<(), OperationError> {
        let message = ctx
            .config()
            .get_str("message")
            .unwrap_or("heartbeat")
            .to_string();
        let interval_secs = ctx.config().get_f64("interval").unwrap_or(1.0);
        let count = ctx.config().get_i64("count").unwrap_or(0);

        let mut ticker = tokio::time::interval(Duration::from_secs_f64(interval_secs));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.beats += 1;
                    ctx.logger().info(format!("{message} ({})", self.beats));
                    if let Some(store) = ctx.dependencies().downcast_ref::<MemoryStore>("storage") {
                        store.save("beats", json!(self.beats));
                    }
                    if count > 0 && self.beats >= count as u64 {
                        break;
                    }
                }
                _ = ctx.cancelled() => break,
            }
        }
        Ok(())
    }

    async fn on_stop(&mut self, ctx: &ComponentContext) -> Result<(), OperationError> {
        ctx.logger().info(format!("{} beats recorded", self.beats));
        Ok(())
    }
}

fn heartbeat_spec() -> ModuleSpec {
    ModuleSpec::new("heartbeat")
        .param(
            ConfigParam::new("message", "Message logged on every beat")
                .default_value(json!("heartbeat")),
        )
        .param(
            ConfigParam::new("interval", "Seconds between beats")
                .default_value(json!(1.0))
                .validator(validators::positive()),
        )
        .param(
            ConfigParam::new("count", "Beats before stopping (0 = run until interrupted)")
                .default_value(json!(0))
                .validator(validators::non_negative()),
        )
        .dependency(
            Dependency::new("storage", "Key/value store for the beat counter")
                .method("save")
                .method("load"),
        )
        .component(Ticker { beats: 0 })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "module_host=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let log_level = LogLevel::from_name(&args.log_level);

    let config_path = match args.config {
        Some(path) => Some(path),
        None => loader::find_config_file("config.json", &[std::env::current_dir()?]),
    };
    let overrides = match config_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Configuration loaded");
            loader::module_section(&loader::load_overrides(&path)?, "heartbeat")
        }
        None => Map::new(),
    };

    let mut collaborators: HashMap<String, Arc<dyn Collaborator>> = HashMap::new();
    collaborators.insert("storage".to_string(), Arc::new(MemoryStore::new()));

    let outcome = run_module(heartbeat_spec(), &overrides, &collaborators, log_level).await?;

    if outcome.is_clean() {
        tracing::info!("Shutdown complete");
        Ok(())
    } else {
        let detail = outcome
            .error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "component failure".to_string());
        tracing::error!(error = %detail, "Module ended in error");
        std::process::exit(1);
    }
}
