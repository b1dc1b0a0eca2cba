//! Memory usage readings for the memory diagnostic.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Source of memory usage readings.
pub trait MemoryProbe: Send + Sync {
    /// Bytes currently in use, or `None` when the host cannot tell.
    fn used_bytes(&self) -> Option<u64>;
}

/// Probe for hosts without memory introspection.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableMemory;

impl MemoryProbe for UnavailableMemory {
    fn used_bytes(&self) -> Option<u64> {
        None
    }
}

/// Probe that replays a fixed sequence of readings.
///
/// Each call consumes one reading; the last one repeats once the sequence
/// runs out. An empty sequence always reports unavailable.
#[derive(Debug, Default)]
pub struct ScriptedMemory {
    readings: Mutex<VecDeque<Option<u64>>>,
    last: Mutex<Option<u64>>,
}

impl ScriptedMemory {
    /// Create a probe returning `readings` in order.
    pub fn new(readings: impl IntoIterator<Item = Option<u64>>) -> Self {
        Self {
            readings: Mutex::new(readings.into_iter().collect()),
            last: Mutex::new(None),
        }
    }
}

impl MemoryProbe for ScriptedMemory {
    fn used_bytes(&self) -> Option<u64> {
        let mut last = self.last.lock();
        if let Some(next) = self.readings.lock().pop_front() {
            *last = next;
        }
        *last
    }
}

/// Resident memory of the current process.
#[cfg(feature = "process-memory")]
#[derive(Debug)]
pub struct ProcessMemory {
    pid: Option<sysinfo::Pid>,
    system: Mutex<sysinfo::System>,
}

#[cfg(feature = "process-memory")]
impl ProcessMemory {
    /// Create a probe for the calling process.
    #[must_use]
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(err) => {
                tracing::warn!(err, "current process id unavailable; memory readings disabled");
                None
            }
        };
        Self {
            pid,
            system: Mutex::new(sysinfo::System::new()),
        }
    }
}

#[cfg(feature = "process-memory")]
impl Default for ProcessMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "process-memory")]
impl MemoryProbe for ProcessMemory {
    fn used_bytes(&self) -> Option<u64> {
        let pid = self.pid?;
        let mut system = self.system.lock();
        system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), false);
        system.process(pid).map(sysinfo::Process::memory)
    }
}

/// The best probe available in this build.
#[must_use]
pub fn default_probe() -> Arc<dyn MemoryProbe> {
    #[cfg(feature = "process-memory")]
    {
        Arc::new(ProcessMemory::new())
    }
    #[cfg(not(feature = "process-memory"))]
    {
        Arc::new(UnavailableMemory)
    }
}
