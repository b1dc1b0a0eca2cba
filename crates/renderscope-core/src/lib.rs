//! Render tracking and diagnostics for UI component trees.
//!
//! This crate provides:
//! - A [`RenderTracker`] that components report each render to, keeping
//!   rolling per-component stats ([`ComponentStat`])
//! - Synchronous change notification through [`Subscription`]s
//! - Derived process-wide metrics ([`MetricsSnapshot`])
//! - Time-boxed diagnostic checks ([`Diagnostics`]) driven by an injectable
//!   [`Clock`]
//! - An [`Overlay`] view model and offline [`replay()`] of recorded traces

mod bus;
mod clock;
mod config;
mod diagnostics;
mod error;
mod memory;
mod metrics;
mod overlay;
mod replay;
mod sample;
mod store;
mod trace;
mod tracker;
mod window;

pub use bus::{Listener, Subscription, SubscriptionBus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, DiagnosticsConfig, TrackerConfig, UnavailableMemoryPolicy};
pub use diagnostics::{Diagnostics, TestKind, TestResult, TestStatus};
pub use error::{ConfigError, TraceError};
#[cfg(feature = "process-memory")]
pub use memory::ProcessMemory;
pub use memory::{default_probe, MemoryProbe, ScriptedMemory, UnavailableMemory};
pub use metrics::{summarize, MetricsSnapshot, DEFAULT_EXCESSIVE_RENDER_THRESHOLD};
pub use overlay::Overlay;
pub use replay::{replay, ReplayOptions, ReplayReport};
pub use sample::{sanitize_props, Sample, UNSERIALIZABLE_PROPS};
pub use store::{AggregationStore, ComponentStat};
pub use trace::{parse_trace, read_trace, TraceEvent};
pub use tracker::RenderTracker;
pub use window::{IntervalWindow, DEFAULT_WINDOW_SIZE};
