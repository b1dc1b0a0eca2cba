//! Ad-hoc diagnostic checks over tracked renders.
//!
//! Each check waits a configured period on the tracker's clock, then reads a
//! fresh [`MetricsSnapshot`] and classifies it. Waiting is cooperative: the
//! host calls [`Diagnostics::poll`] from its frame loop or timer, and any
//! check whose deadline has passed completes during that call.
//!
//! ```
//! use renderscope_core::{
//!     Diagnostics, DiagnosticsConfig, ManualClock, RenderTracker, TestKind, TestStatus,
//!     TrackerConfig, UnavailableMemory,
//! };
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new());
//! let tracker = Arc::new(RenderTracker::new(TrackerConfig::default(), clock.clone()));
//! let mut diagnostics = Diagnostics::new(
//!     Arc::clone(&tracker),
//!     DiagnosticsConfig::default(),
//!     Arc::new(UnavailableMemory),
//! );
//!
//! diagnostics.run_render_count_test();
//! tracker.track_render("Header");
//! clock.advance(3000.0);
//! diagnostics.poll();
//!
//! let result = diagnostics.result(TestKind::RenderCount).unwrap();
//! assert_eq!(result.status, TestStatus::Passed);
//! ```

use crate::config::{DiagnosticsConfig, UnavailableMemoryPolicy};
use crate::memory::MemoryProbe;
use crate::metrics::MetricsSnapshot;
use crate::tracker::RenderTracker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// The available checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// No component rendered more often than the excessive threshold
    RenderCount,
    /// Memory did not grow past the budget during the wait
    MemoryLeak,
    /// The average render interval fits in the frame budget
    Performance,
}

impl TestKind {
    /// Every kind, in the order `run_all_tests` starts them.
    pub const ALL: [Self; 3] = [Self::RenderCount, Self::MemoryLeak, Self::Performance];

    /// Display name, also used as the result name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RenderCount => "Render Count Test",
            Self::MemoryLeak => "Memory Leak Test",
            Self::Performance => "Performance Test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Waiting for the deadline
    Running,
    /// Completed within thresholds
    Passed,
    /// Completed outside thresholds
    Failed,
    /// Completed without the data needed for a verdict
    Inconclusive,
}

impl TestStatus {
    /// Whether the check has finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Display name
    pub name: String,
    /// Which check produced this result
    pub kind: TestKind,
    /// Current status
    pub status: TestStatus,
    /// Clock time from start to completion
    pub duration_ms: Option<f64>,
    /// Explanation of the verdict
    pub details: Option<String>,
}

impl TestResult {
    fn running(kind: TestKind) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
            status: TestStatus::Running,
            duration_ms: None,
            details: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingRun {
    kind: TestKind,
    started_ms: f64,
    deadline_ms: f64,
    memory_before: Option<u64>,
}

/// Runs checks against a [`RenderTracker`].
///
/// Results are kept one per kind, in the order the kinds were started.
/// Starting a kind again replaces its result and supersedes its pending
/// wait. Cancelled or cleared waits never report.
pub struct Diagnostics {
    tracker: Arc<RenderTracker>,
    config: DiagnosticsConfig,
    probe: Arc<dyn MemoryProbe>,
    pending: Vec<PendingRun>,
    results: Vec<TestResult>,
}

impl Diagnostics {
    /// Create a runner with no results.
    pub fn new(
        tracker: Arc<RenderTracker>,
        config: DiagnosticsConfig,
        probe: Arc<dyn MemoryProbe>,
    ) -> Self {
        Self {
            tracker,
            config,
            probe,
            pending: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Start the render-count check.
    pub fn run_render_count_test(&mut self) {
        self.start(TestKind::RenderCount);
    }

    /// Start the memory check.
    pub fn run_memory_leak_test(&mut self) {
        self.start(TestKind::MemoryLeak);
    }

    /// Start the performance check.
    pub fn run_performance_test(&mut self) {
        self.start(TestKind::Performance);
    }

    /// Start every check. They wait independently.
    pub fn run_all_tests(&mut self) {
        for kind in TestKind::ALL {
            self.start(kind);
        }
    }

    /// Start (or restart) one check.
    pub fn start(&mut self, kind: TestKind) {
        let now = self.tracker.clock().now_ms();
        let memory_before = match kind {
            TestKind::MemoryLeak => self.probe.used_bytes(),
            TestKind::RenderCount | TestKind::Performance => None,
        };

        self.pending.retain(|run| run.kind != kind);
        self.pending.push(PendingRun {
            kind,
            started_ms: now,
            deadline_ms: now + self.wait_ms(kind),
            memory_before,
        });

        let running = TestResult::running(kind);
        match self.results.iter_mut().find(|r| r.kind == kind) {
            Some(slot) => *slot = running,
            None => self.results.push(running),
        }

        tracing::debug!(test = %kind, started_ms = now, "diagnostic started");
    }

    /// Complete every check whose wait has elapsed.
    ///
    /// Returns the results that finished during this call.
    pub fn poll(&mut self) -> Vec<TestResult> {
        let now = self.tracker.clock().now_ms();
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .iter()
            .copied()
            .partition(|run| run.deadline_ms <= now);
        self.pending = waiting;

        if due.is_empty() {
            return Vec::new();
        }

        let metrics = self.tracker.metrics();
        let memory_after = if due.iter().any(|run| run.kind == TestKind::MemoryLeak) {
            self.probe.used_bytes()
        } else {
            None
        };

        let mut finished = Vec::with_capacity(due.len());
        for run in due {
            let (status, details) = self.evaluate(&run, &metrics, memory_after);
            tracing::info!(test = %run.kind, ?status, %details, "diagnostic finished");

            if let Some(slot) = self.results.iter_mut().find(|r| r.kind == run.kind) {
                slot.status = status;
                slot.duration_ms = Some(now - run.started_ms);
                slot.details = Some(details);
                finished.push(slot.clone());
            }
        }
        finished
    }

    /// Cancel one check and drop its result. Returns whether it was running.
    pub fn cancel(&mut self, kind: TestKind) -> bool {
        let before = self.pending.len();
        self.pending.retain(|run| run.kind != kind);
        self.results.retain(|r| r.kind != kind);
        self.pending.len() != before
    }

    /// Cancel every pending check and drop every result.
    pub fn clear_results(&mut self) {
        self.pending.clear();
        self.results.clear();
    }

    /// Every result, in start order.
    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// The result of one kind, if it has been started.
    #[must_use]
    pub fn result(&self, kind: TestKind) -> Option<&TestResult> {
        self.results.iter().find(|r| r.kind == kind)
    }

    /// Whether no check is waiting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline on the tracker's clock.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|run| run.deadline_ms)
            .min_by(f64::total_cmp)
    }

    /// The runner's configuration.
    #[must_use]
    pub const fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    fn wait_ms(&self, kind: TestKind) -> f64 {
        let wait = match kind {
            TestKind::RenderCount => self.config.render_count_wait_ms,
            TestKind::MemoryLeak => self.config.memory_wait_ms,
            TestKind::Performance => self.config.performance_wait_ms,
        };
        wait as f64
    }

    fn evaluate(
        &self,
        run: &PendingRun,
        metrics: &MetricsSnapshot,
        memory_after: Option<u64>,
    ) -> (TestStatus, String) {
        match run.kind {
            TestKind::RenderCount => self.evaluate_render_count(metrics),
            TestKind::MemoryLeak => self.evaluate_memory(run.memory_before, memory_after),
            TestKind::Performance => self.evaluate_performance(metrics),
        }
    }

    fn evaluate_render_count(&self, metrics: &MetricsSnapshot) -> (TestStatus, String) {
        let threshold = self.tracker.config().excessive_render_threshold;
        if metrics.has_excessive_renders() {
            (
                TestStatus::Failed,
                format!(
                    "Components with more than {threshold} renders: {}",
                    metrics.excessive_render_components.join(", ")
                ),
            )
        } else {
            (
                TestStatus::Passed,
                format!("No component rendered more than {threshold} times"),
            )
        }
    }

    fn evaluate_memory(&self, before: Option<u64>, after: Option<u64>) -> (TestStatus, String) {
        let budget_mb = self.config.memory_budget_bytes as f64 / BYTES_PER_MB;
        let (Some(before), Some(after)) = (before, after) else {
            let status = match self.config.unavailable_memory {
                UnavailableMemoryPolicy::Inconclusive => TestStatus::Inconclusive,
                UnavailableMemoryPolicy::Pass => TestStatus::Passed,
            };
            return (status, "Memory usage is not available on this host".to_string());
        };

        let increase = after.saturating_sub(before);
        let increase_mb = increase as f64 / BYTES_PER_MB;
        if increase < self.config.memory_budget_bytes {
            (
                TestStatus::Passed,
                format!("Memory grew by {increase_mb:.2}MB (budget {budget_mb:.2}MB)"),
            )
        } else {
            (
                TestStatus::Failed,
                format!("Memory grew by {increase_mb:.2}MB, over the {budget_mb:.2}MB budget"),
            )
        }
    }

    fn evaluate_performance(&self, metrics: &MetricsSnapshot) -> (TestStatus, String) {
        let average = metrics.average_render_time_ms;
        let budget = self.config.frame_budget_ms;
        if average < budget {
            (
                TestStatus::Passed,
                format!("Average render interval {average:.2}ms (budget {budget:.2}ms)"),
            )
        } else {
            (
                TestStatus::Failed,
                format!("Average render interval {average:.2}ms exceeds the {budget:.2}ms budget"),
            )
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("config", &self.config)
            .field("pending", &self.pending)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}
