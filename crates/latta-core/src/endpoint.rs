// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Endpoints of the recording service.

use std::fmt;

/// A resource on the recording service. Every call is an HTTP `PUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
	/// Registers a generic host instance.
	Instance,
	/// Creates a snapshot for the given instance id.
	Snapshot(&'a str),
	/// Attaches a record to the given snapshot id.
	SnapshotAttachment(&'a str),
}

impl Endpoint<'_> {
	/// Path relative to the service base URL, without a leading slash.
	pub fn path(&self) -> String {
		match self {
			Self::Instance => "instance/generic".to_string(),
			Self::Snapshot(instance_id) => format!("snapshot/{instance_id}"),
			Self::SnapshotAttachment(snapshot_id) => format!("snapshot/{snapshot_id}/attachment"),
		}
	}

	/// Absolute URL under `base_url`. A trailing slash on the base is ignored.
	pub fn url(&self, base_url: &str) -> String {
		format!("{}/{}", base_url.trim_end_matches('/'), self.path())
	}
}

impl fmt::Display for Endpoint<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.path())
	}
}
