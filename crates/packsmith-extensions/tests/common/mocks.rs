//! Mock packaging tool
//!
//! Responses are scripted per work item label. Each invocation pops the next
//! scripted response; once a script runs out the last response repeats, and
//! labels without a script use the default response.

#![allow(dead_code)]

use async_trait::async_trait;
use packsmith_extensions::executor::{ProgressSink, TaskOutcome};
use packsmith_extensions::planner::WorkAction;
use packsmith_extensions::tool::{PackTool, ToolError};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What a single mocked invocation does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockResponse {
    Succeed,
    Fail(i32),
    Timeout,
}

/// Record of one invocation
#[derive(Clone, Debug)]
pub struct MockInvocation {
    pub dir: PathBuf,
    pub action: WorkAction,
}

pub struct MockTool {
    scripts: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    default_response: MockResponse,
    invocations: Mutex<Vec<MockInvocation>>,
    latency: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Default for MockTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTool {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            default_response: MockResponse::Succeed,
            invocations: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_default(mut self, response: MockResponse) -> Self {
        self.default_response = response;
        self
    }

    /// Every invocation sleeps this long before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Script the responses for the item labelled `label`
    pub fn script(self, label: &str, responses: &[MockResponse]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(label.to_string(), responses.iter().copied().collect());
        self
    }

    pub fn invocations(&self) -> Vec<MockInvocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    /// Invocations whose action has label `label`
    pub fn calls_for(&self, label: &str) -> usize {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.action.label() == label)
            .count()
    }

    /// Highest number of simultaneous invocations observed
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_response(&self, label: &str) -> MockResponse {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(label) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(self.default_response),
            Some(queue) => queue.front().copied().unwrap_or(self.default_response),
            None => self.default_response,
        }
    }
}

#[async_trait]
impl PackTool for MockTool {
    fn name(&self) -> &str {
        "mock-packwiz"
    }

    async fn invoke(&self, dir: &Path, action: &WorkAction, timeout: Duration) -> Result<(), ToolError> {
        self.invocations.lock().unwrap().push(MockInvocation {
            dir: dir.to_path_buf(),
            action: action.clone(),
        });
        let response = self.next_response(&action.label());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match response {
            MockResponse::Succeed => Ok(()),
            MockResponse::Fail(code) => Err(ToolError::Failed {
                program: "mock-packwiz".to_string(),
                code: Some(code),
                stderr: "scripted failure".to_string(),
            }),
            MockResponse::Timeout => Err(ToolError::Timeout {
                program: "mock-packwiz".to_string(),
                timeout,
            }),
        }
    }
}

/// Discards progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn item_finished(&self, _completed: usize, _total: usize, _outcome: &TaskOutcome) {}
}
