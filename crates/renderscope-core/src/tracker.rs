//! The render tracker.
//!
//! A [`RenderTracker`] owns the aggregation store, the subscription bus, the
//! clock and the enabled flag. Build one at application start, share it by
//! `Arc`, and end its life with [`RenderTracker::teardown`]:
//!
//! ```
//! use renderscope_core::{ManualClock, RenderTracker, TrackerConfig};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new());
//! let tracker = RenderTracker::new(TrackerConfig::default(), clock.clone());
//!
//! tracker.track_render("Header");
//! clock.advance(16.0);
//! tracker.track_render("Header");
//!
//! let metrics = tracker.metrics();
//! assert_eq!(metrics.total_renders, 2);
//! assert_eq!(metrics.average_render_time_ms, 16.0);
//! ```

use crate::bus::{Subscription, SubscriptionBus};
use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::metrics::{summarize, MetricsSnapshot};
use crate::sample::{sanitize_props, Sample};
use crate::store::{AggregationStore, ComponentStat};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Records component renders and publishes the resulting stats.
///
/// Every mutation publishes the full stats list to subscribers, after the
/// store lock is released. Listeners therefore run on the rendering thread
/// and may call back into the tracker; a listener that itself tracks a render
/// receives a nested notification before the outer round finishes.
pub struct RenderTracker {
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    enabled: AtomicBool,
    store: Mutex<AggregationStore>,
    bus: SubscriptionBus,
}

impl RenderTracker {
    /// Create a tracker reading time from `clock`.
    pub fn new(config: TrackerConfig, clock: Arc<dyn Clock>) -> Self {
        tracing::debug!(
            window_size = config.window_size,
            excessive_render_threshold = config.excessive_render_threshold,
            "render tracker created"
        );
        Self {
            enabled: AtomicBool::new(config.start_enabled),
            store: Mutex::new(AggregationStore::new(config.window_size)),
            bus: SubscriptionBus::new(),
            clock,
            config,
        }
    }

    /// Create a tracker on a [`SystemClock`].
    #[must_use]
    pub fn with_system_clock(config: TrackerConfig) -> Self {
        Self::new(config, Arc::new(SystemClock::new()))
    }

    /// Record one render of `component_name`.
    ///
    /// Does nothing while tracking is disabled or when the name is empty.
    pub fn track_render(&self, component_name: &str) {
        if self.is_enabled() {
            self.record(component_name, None);
        }
    }

    /// Record one render of `component_name` along with its props.
    ///
    /// Props that fail to serialize are stored as a placeholder string.
    pub fn track_render_with_props<P>(&self, component_name: &str, props: &P)
    where
        P: Serialize + ?Sized,
    {
        if self.is_enabled() {
            self.record(component_name, Some(sanitize_props(props)));
        }
    }

    fn record(&self, component_name: &str, props: Option<Value>) {
        if component_name.is_empty() {
            tracing::debug!("ignoring render with empty component name");
            return;
        }

        let sample = Sample {
            component_name: component_name.to_owned(),
            timestamp_ms: self.clock.now_ms(),
            props,
        };

        let stats = {
            let mut store = self.store.lock();
            let stat = store.record(sample);
            tracing::trace!(
                component = %stat.component_name,
                render_count = stat.render_count,
                average_interval_ms = stat.average_interval_ms,
                "render tracked"
            );
            if self.bus.is_empty() {
                return;
            }
            store.stats().to_vec()
        };

        self.bus.publish(&stats);
    }

    /// Remove every stat and notify subscribers.
    pub fn clear(&self) {
        let stats = {
            let mut store = self.store.lock();
            store.clear();
            store.stats().to_vec()
        };
        tracing::debug!("render stats cleared");
        self.bus.publish(&stats);
    }

    /// Resume recording renders.
    pub fn enable(&self) {
        if !self.enabled.swap(true, Ordering::SeqCst) {
            tracing::debug!("render tracking enabled");
        }
    }

    /// Stop recording renders. Existing stats are kept.
    pub fn disable(&self) {
        if self.enabled.swap(false, Ordering::SeqCst) {
            tracing::debug!("render tracking disabled");
        }
    }

    /// Whether renders are currently recorded.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Register a listener for stats changes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[ComponentStat]) + Send + Sync + 'static,
    {
        self.bus.subscribe(listener)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.bus.len()
    }

    /// Derive process-wide metrics from the current stats.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        summarize(
            self.store.lock().stats(),
            self.config.excessive_render_threshold,
        )
    }

    /// Copy of every stat in first-seen order.
    #[must_use]
    pub fn stats(&self) -> Vec<ComponentStat> {
        self.store.lock().stats().to_vec()
    }

    /// Copy of one component's stat.
    #[must_use]
    pub fn stat(&self, component_name: &str) -> Option<ComponentStat> {
        self.store.lock().get(component_name).cloned()
    }

    /// Disable tracking, drop every stat, and drop every listener.
    ///
    /// Listeners are not notified of the final clear.
    pub fn teardown(&self) {
        self.disable();
        self.bus.clear();
        self.store.lock().clear();
        tracing::debug!("render tracker torn down");
    }

    /// The tracker's time source.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The tracker's configuration.
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl fmt::Debug for RenderTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTracker")
            .field("config", &self.config)
            .field("enabled", &self.is_enabled())
            .field("components", &self.store.lock().len())
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}
