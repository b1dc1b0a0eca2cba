//! Process-wide metrics derived from per-component stats.

use crate::store::ComponentStat;
use serde::{Deserialize, Serialize};

/// Render count above which a component is reported as excessive.
pub const DEFAULT_EXCESSIVE_RENDER_THRESHOLD: u64 = 10;

/// Point-in-time summary of the aggregation store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Sum of render counts across components
    pub total_renders: u64,
    /// Number of distinct components
    pub components_tracked: usize,
    /// Mean of the average intervals of components that have one
    pub average_render_time_ms: f64,
    /// Component with the largest average interval
    pub slowest_component: Option<String>,
    /// Component with the smallest average interval
    pub fastest_component: Option<String>,
    /// Components rendered more often than the threshold, first-seen order
    pub excessive_render_components: Vec<String>,
}

impl MetricsSnapshot {
    /// Whether any component crossed the excessive-render threshold.
    #[must_use]
    pub fn has_excessive_renders(&self) -> bool {
        !self.excessive_render_components.is_empty()
    }
}

/// Summarize `stats`.
///
/// Components that have rendered only once have no interval yet and are left
/// out of the average and of the slowest/fastest ranking. Ties go to the
/// component seen first.
#[must_use]
pub fn summarize(stats: &[ComponentStat], excessive_threshold: u64) -> MetricsSnapshot {
    let total_renders = stats.iter().map(|s| s.render_count).sum();

    let mut timed_sum = 0.0;
    let mut timed_count = 0usize;
    let mut slowest: Option<&ComponentStat> = None;
    let mut fastest: Option<&ComponentStat> = None;

    for stat in stats.iter().filter(|s| s.has_interval()) {
        timed_sum += stat.average_interval_ms;
        timed_count += 1;

        if slowest.map_or(true, |s| stat.average_interval_ms > s.average_interval_ms) {
            slowest = Some(stat);
        }
        if fastest.map_or(true, |f| stat.average_interval_ms < f.average_interval_ms) {
            fastest = Some(stat);
        }
    }

    let average_render_time_ms = if timed_count == 0 {
        0.0
    } else {
        timed_sum / timed_count as f64
    };

    MetricsSnapshot {
        total_renders,
        components_tracked: stats.len(),
        average_render_time_ms,
        slowest_component: slowest.map(|s| s.component_name.clone()),
        fastest_component: fastest.map(|s| s.component_name.clone()),
        excessive_render_components: stats
            .iter()
            .filter(|s| s.render_count > excessive_threshold)
            .map(|s| s.component_name.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::store::AggregationStore;

    fn store_with(renders: &[(&str, f64)]) -> AggregationStore {
        let mut store = AggregationStore::default();
        for (name, at) in renders {
            store.record(Sample::new(*name, *at));
        }
        store
    }

    #[test]
    fn test_empty_store_metrics() {
        let metrics = summarize(&[], DEFAULT_EXCESSIVE_RENDER_THRESHOLD);
        assert_eq!(metrics, MetricsSnapshot::default());
        assert!(!metrics.has_excessive_renders());
    }

    #[test]
    fn test_single_render_is_excluded_from_timing() {
        let store = store_with(&[("Bar", 3.0)]);
        let metrics = summarize(store.stats(), DEFAULT_EXCESSIVE_RENDER_THRESHOLD);
        assert_eq!(metrics.total_renders, 1);
        assert_eq!(metrics.components_tracked, 1);
        assert_eq!(metrics.average_render_time_ms, 0.0);
        assert_eq!(metrics.slowest_component, None);
        assert_eq!(metrics.fastest_component, None);
    }

    #[test]
    fn test_slowest_fastest_and_average() {
        let store = store_with(&[
            ("Fast", 0.0),
            ("Fast", 4.0),
            ("Slow", 0.0),
            ("Slow", 40.0),
            ("Once", 10.0),
        ]);
        let metrics = summarize(store.stats(), DEFAULT_EXCESSIVE_RENDER_THRESHOLD);
        assert_eq!(metrics.total_renders, 5);
        assert_eq!(metrics.components_tracked, 3);
        assert_eq!(metrics.average_render_time_ms, 22.0);
        assert_eq!(metrics.slowest_component.as_deref(), Some("Slow"));
        assert_eq!(metrics.fastest_component.as_deref(), Some("Fast"));
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let store = store_with(&[("A", 0.0), ("A", 5.0), ("B", 0.0), ("B", 5.0)]);
        let metrics = summarize(store.stats(), DEFAULT_EXCESSIVE_RENDER_THRESHOLD);
        assert_eq!(metrics.slowest_component.as_deref(), Some("A"));
        assert_eq!(metrics.fastest_component.as_deref(), Some("A"));
    }

    #[test]
    fn test_excessive_threshold_is_strict() {
        let mut renders = Vec::new();
        for i in 0..10 {
            renders.push(("Exactly", f64::from(i)));
        }
        for i in 0..11 {
            renders.push(("Over", f64::from(i)));
        }
        let store = store_with(&renders);
        let metrics = summarize(store.stats(), DEFAULT_EXCESSIVE_RENDER_THRESHOLD);
        assert_eq!(metrics.excessive_render_components, vec!["Over".to_string()]);
        assert!(metrics.has_excessive_renders());
    }

    #[test]
    fn test_custom_threshold() {
        let store = store_with(&[("A", 0.0), ("A", 1.0), ("A", 2.0)]);
        let metrics = summarize(store.stats(), 2);
        assert_eq!(metrics.excessive_render_components, vec!["A".to_string()]);
    }
}
