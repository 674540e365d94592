//! Runtime executor for batches of binding headers.

use super::scheduler::{PriorityScheduler, WorkItem};
use crate::error::{BindingError, Result};
use crate::stage::{BindingUnit, StageId, StageRegistry};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime as TokioRuntime;
use tracing::{debug, info, warn};

/// Configuration for the runtime.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Cancel the remaining work once a unit fails.
    pub stop_on_error: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            stop_on_error: false,
        }
    }
}

/// Summary passed to the completion callback of [`Runtime::run_async`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Drives binding units through the registered stages.
pub struct Runtime {
    config: RuntimeConfig,
    registry: Arc<StageRegistry>,
    pending: Vec<BindingUnit>,
    completed: Mutex<Vec<BindingUnit>>,
    failed: Mutex<Vec<BindingUnit>>,
    tokio_runtime: TokioRuntime,
    cancelled: Arc<AtomicBool>,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        Self::with_registry(config, StageRegistry::new_with_defaults())
    }

    pub fn with_registry(config: RuntimeConfig, registry: StageRegistry) -> Result<Self> {
        let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.worker_count.max(1))
            .enable_all()
            .build()
            .map_err(BindingError::Worker)?;

        Ok(Self {
            config,
            registry: Arc::new(registry),
            pending: Vec::new(),
            completed: Mutex::new(Vec::new()),
            failed: Mutex::new(Vec::new()),
            tokio_runtime,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn add_unit(&mut self, unit: BindingUnit) {
        self.pending.push(unit);
    }

    pub fn add_units(&mut self, units: impl IntoIterator<Item = BindingUnit>) {
        self.pending.extend(units);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn completed_count(&self) -> usize {
        lock(&self.completed).len()
    }

    pub fn failed_count(&self) -> usize {
        lock(&self.failed).len()
    }

    /// Take the units that finished without error.
    pub fn take_completed(&self) -> Vec<BindingUnit> {
        std::mem::take(&mut *lock(&self.completed))
    }

    /// Take the units that failed; each carries its error.
    pub fn take_failed(&self) -> Vec<BindingUnit> {
        std::mem::take(&mut *lock(&self.failed))
    }

    /// Run the batch on the calling thread, stage by stage across all units.
    pub fn run_sync(&mut self) {
        self.cancelled.store(false, Ordering::SeqCst);
        let registry = self.registry.clone();
        let mut scheduler = PriorityScheduler::new(registry);

        info!(units = self.pending.len(), "processing binding headers");
        for unit in self.pending.drain(..) {
            scheduler.enqueue(WorkItem::new(unit, StageId::Parse));
        }

        while !self.cancelled.load(Ordering::SeqCst) {
            let Some(result) = scheduler.process_next() else {
                break;
            };
            if let Some(unit) = scheduler.enqueue_requests(result) {
                self.finish(unit);
            }
        }

        if !scheduler.is_empty() {
            debug!(left = scheduler.len(), "run cancelled with work left");
        }
        for mut unit in scheduler.drain_units() {
            unit.fail("cancelled after an earlier failure");
            lock(&self.failed).push(unit);
        }
    }

    /// Run every unit through all of its stages in parallel on a rayon pool.
    pub fn run_parallel(&mut self) -> Result<()> {
        self.cancelled.store(false, Ordering::SeqCst);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_count.max(1))
            .build()
            .map_err(|e| BindingError::Config(format!("unable to build worker pool: {}", e)))?;

        let units: Vec<BindingUnit> = self.pending.drain(..).collect();
        info!(units = units.len(), workers = self.config.worker_count, "processing binding headers in parallel");

        let registry = self.registry.clone();
        let cancelled = self.cancelled.clone();
        let stop_on_error = self.config.stop_on_error;
        let finished: Vec<BindingUnit> = pool.install(|| {
            units
                .into_par_iter()
                .map(|mut unit| {
                    if cancelled.load(Ordering::SeqCst) {
                        unit.fail("cancelled after an earlier failure");
                        return unit;
                    }
                    let unit = registry.run_to_completion(unit);
                    if unit.is_failed() && stop_on_error {
                        cancelled.store(true, Ordering::SeqCst);
                    }
                    unit
                })
                .collect()
        });

        for unit in finished {
            self.finish(unit);
        }
        Ok(())
    }

    /// Run the batch on the tokio runtime and report through callbacks.
    ///
    /// Returns immediately. `on_unit` is called for every finished unit,
    /// `on_progress` with `(finished, total)`, and `on_complete` once at the end.
    pub fn run_async<F, P, U>(&mut self, on_complete: F, on_progress: P, on_unit: U)
    where
        F: FnOnce(RunSummary) + Send + 'static,
        P: Fn(usize, usize) + Send + Sync + 'static,
        U: Fn(&BindingUnit) + Send + Sync + 'static,
    {
        self.cancelled.store(false, Ordering::SeqCst);

        let units: Vec<BindingUnit> = self.pending.drain(..).collect();
        let total = units.len();
        let registry = self.registry.clone();
        let cancelled = self.cancelled.clone();
        let stop_on_error = self.config.stop_on_error;

        self.tokio_runtime.spawn(async move {
            let mut tasks = tokio::task::JoinSet::new();
            for unit in units {
                let registry = registry.clone();
                tasks.spawn_blocking(move || registry.run_to_completion(unit));
            }

            let mut summary = RunSummary::default();
            while let Some(joined) = tasks.join_next().await {
                let unit = match joined {
                    Ok(unit) => unit,
                    Err(e) => {
                        warn!(error = %e, "binding worker panicked");
                        summary.failed += 1;
                        continue;
                    }
                };

                if unit.is_failed() {
                    summary.failed += 1;
                    if stop_on_error {
                        cancelled.store(true, Ordering::SeqCst);
                    }
                } else {
                    summary.completed += 1;
                }
                on_unit(&unit);
                on_progress(summary.completed + summary.failed, total);

                if cancelled.load(Ordering::SeqCst) {
                    tasks.abort_all();
                    summary.cancelled = true;
                    break;
                }
            }

            on_complete(summary);
        });
    }

    /// Cancel all pending operations.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Reset the runtime for reuse.
    pub fn reset(&mut self) {
        self.pending.clear();
        lock(&self.completed).clear();
        lock(&self.failed).clear();
        self.cancelled.store(false, Ordering::SeqCst);
    }

    fn finish(&self, unit: BindingUnit) {
        match &unit.error {
            Some(error) => {
                warn!(unit = %unit.name, %error, "binding header failed");
                lock(&self.failed).push(unit);
                if self.config.stop_on_error {
                    self.cancel();
                }
            }
            None => {
                debug!(unit = %unit.name, stages = unit.stage_num, "binding header done");
                lock(&self.completed).push(unit);
            }
        }
    }
}

/// Lock a result list, recovering the data if a callback panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
