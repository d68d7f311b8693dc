//! Process-scoped memory sampling, feeding the metrics snapshot's
//! `memoryPeakMb` field.

use sysinfo::{Pid, ProcessesToUpdate, System};

/// A single resident-set-size sample for the current process, in MB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessMemory {
    pub rss_mb: f64,
}

impl ProcessMemory {
    /// Sample current process RSS.
    pub fn current() -> anyhow::Result<Self> {
        let mut sys = System::new();
        let pid = Pid::from_u32(std::process::id());
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), false);
        let process = sys
            .process(pid)
            .ok_or_else(|| anyhow::anyhow!("failed to read process memory for pid {pid}"))?;
        Ok(Self {
            rss_mb: process.memory() as f64 / (1024.0 * 1024.0),
        })
    }
}

/// Tracks the maximum RSS observed across repeated samples within a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeakMemoryTracker {
    peak_mb: f64,
}

impl PeakMemoryTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample current memory and fold it into the running peak.
    pub fn sample(&mut self) -> anyhow::Result<f64> {
        let current = ProcessMemory::current()?.rss_mb;
        if current > self.peak_mb {
            self.peak_mb = current;
        }
        Ok(self.peak_mb)
    }

    #[must_use]
    pub fn peak_mb(&self) -> f64 {
        self.peak_mb
    }
}
