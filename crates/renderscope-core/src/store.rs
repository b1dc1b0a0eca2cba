//! Per-component render statistics.
//!
//! The [`AggregationStore`] folds each [`Sample`] into a [`ComponentStat`]
//! keyed by component name. Stats are kept in first-seen order and are only
//! ever removed all at once by [`AggregationStore::clear`].

use crate::sample::Sample;
use crate::window::{IntervalWindow, DEFAULT_WINDOW_SIZE};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Rolling render statistics for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentStat {
    /// Component name
    pub component_name: String,
    /// Renders observed since the last clear (always at least 1)
    pub render_count: u64,
    /// Clock reading of the most recent render
    pub last_render_ms: f64,
    /// Most recent inter-render intervals, oldest first
    pub recent_intervals: IntervalWindow,
    /// Mean of `recent_intervals`, 0 until a second render is seen
    pub average_interval_ms: f64,
    /// Props passed with the most recent render
    pub last_props: Option<Value>,
}

impl ComponentStat {
    fn first(sample: Sample, window_size: usize) -> Self {
        Self {
            component_name: sample.component_name,
            render_count: 1,
            last_render_ms: sample.timestamp_ms,
            recent_intervals: IntervalWindow::new(window_size),
            average_interval_ms: 0.0,
            last_props: sample.props,
        }
    }

    fn observe(&mut self, sample: Sample) {
        // A clock that stepped backwards contributes a zero gap.
        let interval = (sample.timestamp_ms - self.last_render_ms).max(0.0);
        self.recent_intervals.push(interval);
        self.average_interval_ms = self.recent_intervals.mean();
        self.render_count += 1;
        self.last_render_ms = sample.timestamp_ms;
        self.last_props = sample.props;
    }

    /// Whether at least one interval has been measured.
    #[must_use]
    pub fn has_interval(&self) -> bool {
        self.average_interval_ms > 0.0
    }
}

/// Mapping from component name to [`ComponentStat`].
#[derive(Debug, Clone)]
pub struct AggregationStore {
    window_size: usize,
    stats: Vec<ComponentStat>,
    index: HashMap<String, usize>,
}

impl AggregationStore {
    /// Create an empty store whose interval windows hold `window_size` entries.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
            stats: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Fold a sample into its component's stat and return the updated stat.
    pub fn record(&mut self, sample: Sample) -> &ComponentStat {
        if let Some(&slot) = self.index.get(&sample.component_name) {
            let stat = &mut self.stats[slot];
            stat.observe(sample);
            return stat;
        }

        let slot = self.stats.len();
        self.index.insert(sample.component_name.clone(), slot);
        self.stats.push(ComponentStat::first(sample, self.window_size));
        &self.stats[slot]
    }

    /// Remove every stat.
    pub fn clear(&mut self) {
        self.stats.clear();
        self.index.clear();
    }

    /// All stats in first-seen order.
    #[must_use]
    pub fn stats(&self) -> &[ComponentStat] {
        &self.stats
    }

    /// Look up one component's stat.
    #[must_use]
    pub fn get(&self, component_name: &str) -> Option<&ComponentStat> {
        self.index.get(component_name).map(|&slot| &self.stats[slot])
    }

    /// Number of distinct components tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Whether nothing has been recorded since creation or the last clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Interval window capacity used for new stats.
    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }
}

impl Default for AggregationStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}
