//! Shared components and collaborators for lifecycle integration tests.
#![allow(dead_code)]

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use module_host::{
    Collaborator, Component, ComponentContext, LogLevel, Logger, MemorySink, OperationError,
};

/// Debug-threshold logger writing into a shared in-memory sink.
pub fn test_logger(prefix: &str) -> (Logger, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Logger::with_sink(LogLevel::Debug, prefix, sink.clone()), sink)
}

/// Loops until cancelled, counting ticks.
pub struct TickingComponent {
    pub name: &'static str,
    pub ticks: Arc<AtomicU64>,
}

impl TickingComponent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }
}

#[async_trait]
impl Component for TickingComponent {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_run(&mut self, ctx: &ComponentContext) -> Result<(), OperationError> {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(10)) => {
                    self.ticks.fetch_add(1, Ordering::SeqCst);
                }
                _ = ctx.cancelled() => return Ok(()),
            }
        }
    }
}

/// Finishes on its own after a fixed number of iterations.
pub struct OneShotComponent {
    pub name: &'static str,
    pub iterations: u32,
}

#[async_trait]
impl Component for OneShotComponent {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_run(&mut self, ctx: &ComponentContext) -> Result<(), OperationError> {
        for _ in 0..self.iterations {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(5)) => {}
                _ = ctx.cancelled() => return Ok(()),
            }
        }
        Ok(())
    }
}

/// Fails immediately in the run body.
pub struct FaultyComponent {
    pub name: &'static str,
    pub message: &'static str,
}

#[async_trait]
impl Component for FaultyComponent {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_run(&mut self, _ctx: &ComponentContext) -> Result<(), OperationError> {
        Err(OperationError::new(self.message))
    }
}

/// Fails during setup, before ever entering the run body.
pub struct FailingStartComponent {
    pub name: &'static str,
}

#[async_trait]
impl Component for FailingStartComponent {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_start(&mut self, _ctx: &ComponentContext) -> Result<(), OperationError> {
        Err(OperationError::new("setup exploded"))
    }

    async fn on_run(&mut self, _ctx: &ComponentContext) -> Result<(), OperationError> {
        Ok(())
    }
}

/// Never suspends on the cancellation signal; stalls shutdown on purpose.
pub struct StubbornComponent {
    pub name: &'static str,
}

#[async_trait]
impl Component for StubbornComponent {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_run(&mut self, _ctx: &ComponentContext) -> Result<(), OperationError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Panics in the run body.
pub struct PanickyComponent {
    pub name: &'static str,
}

#[async_trait]
impl Component for PanickyComponent {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_run(&mut self, _ctx: &ComponentContext) -> Result<(), OperationError> {
        panic!("wild panic in run body");
    }
}

/// Runs until cancelled and records that its cleanup hook fired.
pub struct CleanupProbe {
    pub name: &'static str,
    pub stopped: Arc<AtomicBool>,
}

impl CleanupProbe {
    pub fn new(name: &'static str) -> (Self, Arc<AtomicBool>) {
        let stopped = Arc::new(AtomicBool::new(false));
        (
            Self {
                name,
                stopped: stopped.clone(),
            },
            stopped,
        )
    }
}

#[async_trait]
impl Component for CleanupProbe {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_run(&mut self, ctx: &ComponentContext) -> Result<(), OperationError> {
        ctx.cancelled().await;
        Ok(())
    }

    async fn on_stop(&mut self, _ctx: &ComponentContext) -> Result<(), OperationError> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Records the `interval` config value it observed, then idles.
pub struct ConfigProbe {
    pub name: &'static str,
    pub seen: Arc<Mutex<Option<i64>>>,
}

impl ConfigProbe {
    pub fn new(name: &'static str) -> (Self, Arc<Mutex<Option<i64>>>) {
        let seen = Arc::new(Mutex::new(None));
        (
            Self {
                name,
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl Component for ConfigProbe {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_run(&mut self, ctx: &ComponentContext) -> Result<(), OperationError> {
        *self.seen.lock().unwrap() = ctx.config().get_i64("interval");
        ctx.cancelled().await;
        Ok(())
    }
}

/// Collaborator satisfying a save/load storage contract.
pub struct MemoryStore;

impl Collaborator for MemoryStore {
    fn methods(&self) -> &[&'static str] {
        &["save", "load"]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Collaborator that only knows how to save.
pub struct WriteOnlyStore;

impl Collaborator for WriteOnlyStore {
    fn methods(&self) -> &[&'static str] {
        &["save"]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
