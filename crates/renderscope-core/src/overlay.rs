//! View model for an on-screen render inspector.
//!
//! The overlay keeps no stats of its own. It mirrors whatever the tracker
//! last published and forwards its controls to the tracker and to a
//! [`Diagnostics`] runner.

use crate::bus::Subscription;
use crate::config::DiagnosticsConfig;
use crate::diagnostics::Diagnostics;
use crate::memory::MemoryProbe;
use crate::metrics::MetricsSnapshot;
use crate::store::ComponentStat;
use crate::tracker::RenderTracker;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Mirror {
    stats: Vec<ComponentStat>,
    notifications: u64,
}

/// Live mirror of a tracker plus a diagnostics runner.
///
/// Dropping the overlay unsubscribes it.
#[derive(Debug)]
pub struct Overlay {
    tracker: Arc<RenderTracker>,
    mirror: Arc<Mutex<Mirror>>,
    subscription: Option<Subscription>,
    diagnostics: Diagnostics,
}

impl Overlay {
    /// Subscribe to `tracker` and seed the mirror with its current stats.
    pub fn attach(
        tracker: Arc<RenderTracker>,
        config: DiagnosticsConfig,
        probe: Arc<dyn MemoryProbe>,
    ) -> Self {
        let mirror = Arc::new(Mutex::new(Mirror {
            stats: tracker.stats(),
            notifications: 0,
        }));

        let sink = Arc::clone(&mirror);
        let subscription = tracker.subscribe(move |stats| {
            let mut mirror = sink.lock();
            mirror.stats = stats.to_vec();
            mirror.notifications += 1;
        });

        Self {
            diagnostics: Diagnostics::new(Arc::clone(&tracker), config, probe),
            tracker,
            mirror,
            subscription: Some(subscription),
        }
    }

    /// Start recording renders.
    pub fn open(&self) {
        self.tracker.enable();
    }

    /// Stop recording renders. Mirrored stats stay visible.
    pub fn close(&self) {
        self.tracker.disable();
    }

    /// Whether the tracker is recording.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.tracker.is_enabled()
    }

    /// Mirrored stats, most rendered first. Equal counts keep first-seen order.
    #[must_use]
    pub fn rows(&self) -> Vec<ComponentStat> {
        let mut rows = self.mirror.lock().stats.clone();
        rows.sort_by(|a, b| b.render_count.cmp(&a.render_count));
        rows
    }

    /// Number of updates received from the tracker.
    #[must_use]
    pub fn notifications(&self) -> u64 {
        self.mirror.lock().notifications
    }

    /// Fresh metrics from the tracker.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.tracker.metrics()
    }

    /// Reset the tracker's stats.
    pub fn clear_stats(&self) {
        self.tracker.clear();
    }

    /// The diagnostics runner.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The diagnostics runner, for starting and polling checks.
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Stop mirroring the tracker.
    pub fn detach(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
