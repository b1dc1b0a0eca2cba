//! Bounded FIFO window of inter-render intervals.

use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Default number of intervals kept per component.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Rolling window of the most recent intervals, oldest first.
///
/// Pushing past capacity evicts the oldest entry. The mean is always taken
/// over exactly the entries currently held.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalWindow {
    capacity: usize,
    intervals: VecDeque<f64>,
}

impl IntervalWindow {
    /// Create an empty window. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            intervals: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an interval, returning the evicted one if the window was full.
    pub fn push(&mut self, interval_ms: f64) -> Option<f64> {
        self.intervals.push_back(interval_ms);
        if self.intervals.len() > self.capacity {
            self.intervals.pop_front()
        } else {
            None
        }
    }

    /// Arithmetic mean of the held intervals, or 0 when empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.intervals.is_empty() {
            return 0.0;
        }
        self.intervals.iter().sum::<f64>() / self.intervals.len() as f64
    }

    /// Maximum number of intervals held.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of intervals currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether no interval has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.intervals.iter().copied()
    }

    /// Copy the intervals out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

impl Default for IntervalWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

// Serialized as a plain list; capacity is a store setting, not data.
impl Serialize for IntervalWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.intervals.iter())
    }
}
