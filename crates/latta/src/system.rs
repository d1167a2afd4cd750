// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Host load sampling for attached records.

use std::time::Duration;

use latta_core::SystemInfo;
use tracing::debug;

/// Default CPU measurement window.
pub const DEFAULT_CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Source of host metrics for attached records.
///
/// Implementations are called once per report from the reporting thread and
/// may block.
pub trait SystemSampler: Send + Sync {
	/// Takes a fresh sample. Must not cache between calls.
	fn sample(&self) -> SystemInfo;
}

/// Samples CPU and memory from procfs.
///
/// CPU utilization is measured across `window`; the calling thread sleeps for
/// that long. Where procfs is unavailable the sampler still waits out the
/// window and reports zeros.
#[derive(Debug, Clone)]
pub struct ProcfsSampler {
	window: Duration,
}

impl ProcfsSampler {
	pub fn new(window: Duration) -> Self {
		Self { window }
	}

	pub fn window(&self) -> Duration {
		self.window
	}
}

impl Default for ProcfsSampler {
	fn default() -> Self {
		Self::new(DEFAULT_CPU_SAMPLE_WINDOW)
	}
}

impl SystemSampler for ProcfsSampler {
	fn sample(&self) -> SystemInfo {
		let before = read_cpu_times();
		std::thread::sleep(self.window);
		let after = read_cpu_times();

		let cpu_usage = match (before, after) {
			(Some(before), Some(after)) => cpu_percent(&before, &after),
			_ => {
				debug!("CPU times unavailable, reporting zero usage");
				0.0
			}
		};

		let (total_memory, free_memory) = read_memory().unwrap_or_else(|| {
			debug!("memory info unavailable, reporting zero memory");
			(0, 0)
		});

		SystemInfo::new(cpu_usage, total_memory, free_memory)
	}
}

/// Aggregate CPU tick counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
	pub busy: u64,
	pub total: u64,
}

/// Parses the aggregate `cpu` line of `/proc/stat`.
///
/// Idle time is `idle + iowait`; guest time is already folded into user time
/// by the kernel and is not counted twice.
pub fn parse_cpu_times(stat: &str) -> Option<CpuTimes> {
	let line = stat.lines().find(|l| l.starts_with("cpu "))?;
	let fields: Vec<u64> = line
		.split_whitespace()
		.skip(1)
		.map(|f| f.parse().unwrap_or(0))
		.collect();
	if fields.len() < 4 {
		return None;
	}

	let field = |i: usize| fields.get(i).copied().unwrap_or(0);
	// user nice system idle iowait irq softirq steal
	let total: u64 = (0..8).map(field).sum();
	let idle = field(3) + field(4);

	Some(CpuTimes {
		busy: total.saturating_sub(idle),
		total,
	})
}

/// Utilization between two counter readings, in percent.
pub fn cpu_percent(before: &CpuTimes, after: &CpuTimes) -> f64 {
	let total = after.total.saturating_sub(before.total);
	if total == 0 {
		return 0.0;
	}
	let busy = after.busy.saturating_sub(before.busy);
	(busy as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Parses `MemTotal` and `MemFree` from `/proc/meminfo`, in bytes.
pub fn parse_meminfo(content: &str) -> Option<(u64, u64)> {
	let parse_kb = |line: &str| -> Option<u64> { line.split_whitespace().nth(1)?.parse().ok() };

	let mut total = None;
	let mut free = None;
	for line in content.lines() {
		if line.starts_with("MemTotal:") {
			total = parse_kb(line);
		} else if line.starts_with("MemFree:") {
			free = parse_kb(line);
		}
	}

	Some((total? * 1024, free? * 1024))
}

#[cfg(target_os = "linux")]
fn read_cpu_times() -> Option<CpuTimes> {
	parse_cpu_times(&std::fs::read_to_string("/proc/stat").ok()?)
}

#[cfg(not(target_os = "linux"))]
fn read_cpu_times() -> Option<CpuTimes> {
	None
}

#[cfg(target_os = "linux")]
fn read_memory() -> Option<(u64, u64)> {
	parse_meminfo(&std::fs::read_to_string("/proc/meminfo").ok()?)
}

#[cfg(not(target_os = "linux"))]
fn read_memory() -> Option<(u64, u64)> {
	None
}
