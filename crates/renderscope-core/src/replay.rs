//! Offline replay of render traces.
//!
//! Replays drive a [`ManualClock`] to each event's timestamp, so waits and
//! intervals come out exactly as recorded.

use crate::clock::{Clock, ManualClock};
use crate::config::Config;
use crate::diagnostics::{Diagnostics, TestResult};
use crate::memory::MemoryProbe;
use crate::metrics::MetricsSnapshot;
use crate::store::ComponentStat;
use crate::trace::TraceEvent;
use crate::tracker::RenderTracker;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Replay settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Start every diagnostic at the first event and run them to completion
    pub run_diagnostics: bool,
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Events fed to the tracker
    pub events: usize,
    /// Clock reading after the last event (or the last diagnostic)
    pub end_ms: f64,
    /// Notifications delivered to the report's subscriber
    pub notifications: u64,
    /// Metrics after the last event
    pub metrics: MetricsSnapshot,
    /// Per-component stats after the last event
    pub stats: Vec<ComponentStat>,
    /// Diagnostic results, empty unless requested
    pub results: Vec<TestResult>,
}

/// Feed `events` through a fresh tracker built from `config`.
///
/// Tracking is enabled for the replay regardless of `start_enabled`.
pub fn replay(
    events: &[TraceEvent],
    config: &Config,
    probe: Arc<dyn MemoryProbe>,
    options: ReplayOptions,
) -> ReplayReport {
    let start_ms = events.first().map_or(0.0, |e| e.at_ms);
    let clock = Arc::new(ManualClock::starting_at(start_ms));
    let tracker = Arc::new(RenderTracker::new(config.tracker.clone(), clock.clone()));
    tracker.enable();

    let notifications = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&notifications);
    let subscription = tracker.subscribe(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let mut diagnostics = Diagnostics::new(
        Arc::clone(&tracker),
        config.diagnostics.clone(),
        probe,
    );
    if options.run_diagnostics {
        diagnostics.run_all_tests();
    }

    for event in events {
        // Waits that ran out between events finish at their own deadline.
        finish_due(&clock, &mut diagnostics, Some(event.at_ms));

        clock.set(event.at_ms);
        match &event.props {
            Some(props) => tracker.track_render_with_props(&event.component, props),
            None => tracker.track_render(&event.component),
        }
        diagnostics.poll();
    }

    let metrics = tracker.metrics();
    let stats = tracker.stats();

    finish_due(&clock, &mut diagnostics, None);

    subscription.unsubscribe();
    tracing::debug!(events = events.len(), "trace replay finished");

    ReplayReport {
        events: events.len(),
        end_ms: clock.now_ms(),
        notifications: notifications.load(Ordering::Relaxed),
        metrics,
        stats,
        results: diagnostics.results().to_vec(),
    }
}

/// Advance to and complete each pending deadline earlier than `before_ms`
/// (every pending deadline when `None`).
fn finish_due(clock: &ManualClock, diagnostics: &mut Diagnostics, before_ms: Option<f64>) {
    while let Some(deadline) = diagnostics.next_deadline_ms() {
        if before_ms.is_some_and(|limit| deadline >= limit) {
            break;
        }
        if deadline > clock.now_ms() {
            clock.set(deadline);
        }
        diagnostics.poll();
    }
}
