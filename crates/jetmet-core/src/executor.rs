//! Path execution over events

use crate::error::ExecutorError;
use crate::event::{Collection, Event};
use crate::module::{FilterDecision, ModuleOutput};
use crate::registry::{Registry, TriggerPath};
use crate::{Context, ExecutionMode};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of one path on one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOutcome {
    pub name: String,
    pub accept: bool,

    /// Label of the module that stopped the path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
}

/// Everything the menu decided about one event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventResult {
    pub event_id: u64,
    pub paths: Vec<PathOutcome>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub decisions: BTreeMap<String, FilterDecision>,

    /// Produced collections, only filled when the context keeps products
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub products: BTreeMap<String, Collection>,
}

impl EventResult {
    pub fn path(&self, name: &str) -> Option<&PathOutcome> {
        self.paths.iter().find(|p| p.name == name)
    }

    pub fn accepted(&self, path: &str) -> bool {
        self.path(path).is_some_and(|p| p.accept)
    }
}

/// Runs every path of a menu over single events.
///
/// Each module runs at most once per event even when several paths share
/// it; producer outputs are visible to every later module of every path.
pub struct PathExecutor {
    context: Context,
    paths: Vec<TriggerPath>,
}

impl PathExecutor {
    pub fn new(registry: &Registry) -> Self {
        Self {
            context: Context::default(),
            paths: registry.paths().to_vec(),
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn path_names(&self) -> Vec<&str> {
        self.paths.iter().map(|p| p.name.as_str()).collect()
    }

    /// Run all paths over one event. Never fails: module errors are logged
    /// and reject the path that hit them.
    pub fn run_event(&self, event: &Event) -> EventResult {
        let mut working = event.clone();
        let mut outcomes: HashMap<String, bool> = HashMap::with_capacity(16);
        let mut result = EventResult {
            event_id: event.id,
            paths: Vec::with_capacity(self.paths.len()),
            ..Default::default()
        };

        for path in &self.paths {
            let mut rejected_by = None;

            for module in &path.modules {
                let label = module.label();
                let passed = match outcomes.get(label) {
                    Some(passed) => *passed,
                    None => {
                        let passed = match module.process(&self.context, &working) {
                            Ok(ModuleOutput::Product(collection)) => {
                                if self.context.keep_products {
                                    result
                                        .products
                                        .insert(label.to_string(), collection.clone());
                                }
                                working.insert(label, collection);
                                true
                            }
                            Ok(ModuleOutput::Nothing) => true,
                            Ok(ModuleOutput::Decision(decision)) => {
                                let accept = decision.accept;
                                result.decisions.insert(label.to_string(), decision);
                                accept
                            }
                            Err(e) => {
                                warn!("Event {}: module {} failed: {}", event.id, label, e);
                                false
                            }
                        };
                        if self.context.mode == ExecutionMode::Debug {
                            info!(
                                "Event {} [{}] {}: {}",
                                event.id,
                                path.name,
                                label,
                                if passed { "pass" } else { "reject" }
                            );
                        }
                        outcomes.insert(label.to_string(), passed);
                        passed
                    }
                };

                if !passed {
                    rejected_by = Some(label.to_string());
                    break;
                }
            }

            debug!(
                "Event {} path {}: {}",
                event.id,
                path.name,
                if rejected_by.is_none() { "accept" } else { "reject" }
            );
            result.paths.push(PathOutcome {
                name: path.name.clone(),
                accept: rejected_by.is_none(),
                rejected_by,
            });
        }

        result
    }
}

/// Accept counter for one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSummary {
    pub name: String,
    pub events: usize,
    pub accepted: usize,
}

impl PathSummary {
    pub fn efficiency(&self) -> f64 {
        if self.events == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.events as f64
    }
}

/// Result of a bulk run
#[derive(Debug, Clone)]
pub struct BulkResult {
    /// Per-event results in input order
    pub results: Vec<EventResult>,

    /// Per-path counters in menu order
    pub summary: Vec<PathSummary>,

    pub duration: Duration,
}

impl BulkResult {
    pub fn path_summary(&self, name: &str) -> Option<&PathSummary> {
        self.summary.iter().find(|s| s.name == name)
    }
}

/// Bulk executor - events spread across a worker pool
pub struct BulkExecutor {
    /// Worker threads
    threads: usize,
}

impl BulkExecutor {
    /// One worker per CPU
    pub fn new() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }

    /// Set the worker count; zero means one per CPU
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = if threads == 0 { num_cpus::get() } else { threads };
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run every path over every event. Results keep the input order.
    pub fn run(
        &self,
        executor: &PathExecutor,
        events: &[Event],
    ) -> Result<BulkResult, ExecutorError> {
        let start = Instant::now();

        info!("=== Bulk Executor Started ===");
        info!("Total events: {}", events.len());
        info!("Worker threads: {}", self.threads);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()?;

        let results: Vec<EventResult> =
            pool.install(|| events.par_iter().map(|e| executor.run_event(e)).collect());

        let summary = summarize(&executor.path_names(), &results);
        let duration = start.elapsed();

        info!("=== Bulk Executor Completed ===");
        info!("Total time: {:.3}s", duration.as_secs_f64());
        for path in &summary {
            info!("{}: {}/{} accepted", path.name, path.accepted, path.events);
        }

        Ok(BulkResult {
            results,
            summary,
            duration,
        })
    }
}

impl Default for BulkExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(path_names: &[&str], results: &[EventResult]) -> Vec<PathSummary> {
    path_names
        .iter()
        .map(|name| PathSummary {
            name: name.to_string(),
            events: results.len(),
            accepted: results.iter().filter(|r| r.accepted(name)).count(),
        })
        .collect()
}
