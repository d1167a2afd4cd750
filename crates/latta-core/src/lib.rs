// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Latta error recording API.
//!
//! This crate holds the wire shapes exchanged with the recording service and
//! nothing else. It performs no I/O and is shared by the `latta` SDK and its
//! tests.
//!
//! # Overview
//!
//! A report is delivered in three steps:
//! - an **instance** describing the host is registered once and its id cached
//! - a **snapshot** is created for every intercepted error
//! - a **record** carrying the error and a system sample is attached to it

pub mod endpoint;
pub mod error;
pub mod level;
pub mod record;
pub mod system;

pub use endpoint::Endpoint;
pub use error::CoreError;
pub use level::RecordLevel;
pub use record::{
	id_from_response, AttachmentRequest, ExceptionRecord, InstanceRequest, RecordData,
	SnapshotRequest,
};
pub use system::SystemInfo;

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Production endpoint of the recording service.
pub const DEFAULT_BASE_URL: &str = "https://recording.latta.ai/v1";

/// Device class sent on instance registration when none is configured.
pub const DEFAULT_DEVICE: &str = "desktop";

/// Locale tag sent when the system locale cannot be determined.
pub const FALLBACK_LANG: &str = "en-us";

/// Process-local relation identifier, regenerated after every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RelationId(pub Uuid);

impl RelationId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for RelationId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for RelationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for RelationId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}
