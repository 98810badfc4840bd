//! Concurrent work item execution
//!
//! Items are fanned out over a fixed-size pool. Each item gets one tool
//! invocation per attempt, retried under the configured `RetryPolicy`. The
//! collecting loop owns the completion counter and the failure report, so
//! no locking is needed for either.

use crate::planner::WorkItem;
use crate::report::FailureReport;
use crate::tool::{PackTool, ToolError};
use futures::stream::{FuturesUnordered, StreamExt};
use packsmith_core::retry::{RetryError, RetryExecutorBuilder, TracingObserver};
use packsmith_core::types::{RetryPolicy, RuntimeConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info};

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Final state of one work item
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub item: WorkItem,
    pub success: bool,
    /// Invocations made; zero when the target directory was missing
    pub attempts_used: u32,
    pub error: Option<String>,
}

impl TaskOutcome {
    /// Retries beyond the first attempt
    pub fn retries(&self) -> u32 {
        self.attempts_used.saturating_sub(1)
    }
}

/// Receives one call per finished item, in completion order
pub trait ProgressSink: Send + Sync {
    fn item_finished(&self, completed: usize, total: usize, outcome: &TaskOutcome);
}

/// Outcomes in completion order plus the aggregated failures
#[derive(Debug, Clone, Default)]
pub struct ExecutionSummary {
    pub outcomes: Vec<TaskOutcome>,
    pub report: FailureReport,
}

impl ExecutionSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Runs work items through a `PackTool` on a bounded pool
pub struct TaskExecutor {
    tool: Arc<dyn PackTool>,
    policy: RetryPolicy,
    concurrency: usize,
    timeout: Duration,
}

impl TaskExecutor {
    pub fn new(tool: Arc<dyn PackTool>) -> Self {
        Self {
            tool,
            policy: RetryPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Pool size, timeout and retry policy from the runtime configuration
    pub fn from_config(tool: Arc<dyn PackTool>, config: &RuntimeConfig) -> Self {
        Self::new(tool)
            .with_policy(config.retry.clone())
            .with_concurrency(config.executor.concurrency)
            .with_timeout(Duration::from_secs(config.executor.timeout_secs))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Values below one are raised to one
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run a single item to completion, retrying per policy
    pub async fn run_one(&self, item: WorkItem) -> TaskOutcome {
        if !item.target.path.is_dir() {
            return TaskOutcome {
                error: Some(format!(
                    "target directory not found: {}",
                    item.target.path.display()
                )),
                item,
                success: false,
                attempts_used: 0,
            };
        }

        let observer = TracingObserver::new(format!("{}: {}", item.group, item.action));
        let retry = RetryExecutorBuilder::new()
            .with_policy(self.policy.clone())
            .with_observer(observer)
            .with_jitter(false)
            .build();

        let dir = item.target.path.as_path();
        let result = retry
            .execute_counted(|| self.tool.invoke(dir, &item.action, self.timeout))
            .await;

        match result {
            Ok(((), attempts)) => TaskOutcome {
                item,
                success: true,
                attempts_used: attempts,
                error: None,
            },
            Err(err) => TaskOutcome {
                attempts_used: err.attempts(),
                error: Some(describe_failure(err)),
                item,
                success: false,
            },
        }
    }

    /// Run every item, at most `concurrency` at a time
    ///
    /// Never fails: each item ends up as a `TaskOutcome`, and failures are
    /// collected into the summary's report under the item's group.
    pub async fn run(&self, items: Vec<WorkItem>, progress: &dyn ProgressSink) -> ExecutionSummary {
        let total = items.len();
        let mut summary = ExecutionSummary {
            outcomes: Vec::with_capacity(total),
            report: FailureReport::new(),
        };
        if total == 0 {
            return summary;
        }

        info!(
            "Running {} item(s) with {} worker(s) via {}",
            total,
            self.concurrency.min(total),
            self.tool.name()
        );

        let semaphore = Semaphore::new(self.concurrency);
        let mut pending = FuturesUnordered::new();

        for item in items {
            let semaphore = &semaphore;
            pending.push(async move {
                let _permit = semaphore.acquire().await.ok();
                self.run_one(item).await
            });
        }

        let mut completed = 0;
        while let Some(outcome) = pending.next().await {
            completed += 1;
            debug!(
                "[{}/{}] {} [{}] success={} attempts={}",
                completed,
                total,
                outcome.item.label(),
                outcome.item.group,
                outcome.success,
                outcome.attempts_used
            );
            progress.item_finished(completed, total, &outcome);
            summary.report.record_outcome(&outcome);
            summary.outcomes.push(outcome);
        }

        summary
    }
}

fn describe_failure(err: RetryError<ToolError>) -> String {
    let fallback = err.to_string();
    err.into_error().map_or(fallback, |e| e.to_string())
}
