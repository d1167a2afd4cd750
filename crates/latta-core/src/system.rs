// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Point-in-time host metrics attached to every record.

use serde::{Deserialize, Serialize};

/// A fresh sample of host load. Never cached between reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
	/// CPU utilization in percent, `0.0..=100.0`.
	pub cpu_usage: f64,
	/// Physical memory in bytes.
	pub total_memory: u64,
	/// Unused physical memory in bytes, never above `total_memory`.
	pub free_memory: u64,
}

impl SystemInfo {
	/// Builds a sample with the field invariants enforced.
	pub fn new(cpu_usage: f64, total_memory: u64, free_memory: u64) -> Self {
		let cpu_usage = if cpu_usage.is_finite() {
			cpu_usage.clamp(0.0, 100.0)
		} else {
			0.0
		};
		Self {
			cpu_usage,
			total_memory,
			free_memory: free_memory.min(total_memory),
		}
	}
}
