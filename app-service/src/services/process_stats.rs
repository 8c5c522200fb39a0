//! Point-in-time resource usage of the running process.

use std::time::Duration;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub rss_bytes: u64,
    pub virtual_bytes: u64,
    pub system_total_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuUsage {
    /// CPU time consumed since the process started, user and system combined.
    /// sysinfo reports a single accumulated figure, so the split is not kept.
    pub total_time_ms: u64,
    /// `total_time_ms` over wall-clock uptime; can exceed 100 on multiple cores.
    pub average_percent: f64,
}

#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub memory: MemoryUsage,
    pub cpu: CpuUsage,
}

/// Sample the current process. A fresh `System` is built per call so that no
/// state is shared between requests.
pub fn sample(uptime: Duration) -> anyhow::Result<ProcessSnapshot> {
    let pid =
        sysinfo::get_current_pid().map_err(|e| anyhow!("Failed to resolve current PID: {}", e))?;

    let mut system = System::new();
    system.refresh_memory();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_memory().with_cpu(),
    );

    let process = system
        .process(pid)
        .ok_or_else(|| anyhow!("Process {} not found", pid))?;

    let total_time_ms = process.accumulated_cpu_time();
    let uptime_ms = uptime.as_secs_f64() * 1000.0;
    let average_percent = if uptime_ms > 0.0 {
        total_time_ms as f64 / uptime_ms * 100.0
    } else {
        0.0
    };

    Ok(ProcessSnapshot {
        pid: pid.as_u32(),
        memory: MemoryUsage {
            rss_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
            system_total_bytes: system.total_memory(),
        },
        cpu: CpuUsage {
            total_time_ms,
            average_percent,
        },
    })
}
