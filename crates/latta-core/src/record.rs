// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request bodies for the three recording calls.

use serde::{Deserialize, Serialize};

use crate::level::RecordLevel;
use crate::system::SystemInfo;

/// Body of `PUT instance/generic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRequest {
	pub os_version: String,
	/// Lowercased platform name, e.g. "linux", "darwin", "windows".
	pub os: String,
	/// System locale tag, e.g. "en_US".
	pub lang: String,
	/// Device class, "desktop" unless configured.
	pub device: String,
}

/// Body of `PUT snapshot/{instance_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
	pub message: String,
	pub relation_id: String,
	/// Always sent, as `null` when absent.
	pub related_to_relation_id: Option<String>,
}

impl SnapshotRequest {
	/// The service expects the instance id in `relation_id`.
	pub fn for_instance(instance_id: &str) -> Self {
		Self {
			message: String::new(),
			relation_id: instance_id.to_string(),
			related_to_relation_id: None,
		}
	}
}

/// An intercepted error, ready to be attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRecord {
	/// Type name of the error, e.g. "ParseIntError".
	pub name: String,
	/// Human readable message.
	pub message: String,
	/// Formatted multi-line trace.
	pub stack: String,
}

impl ExceptionRecord {
	pub fn new(
		name: impl Into<String>,
		message: impl Into<String>,
		stack: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			message: message.into(),
			stack: stack.into(),
		}
	}
}

/// The `data` object of an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordData {
	/// Unix epoch milliseconds.
	pub timestamp: i64,
	pub level: RecordLevel,
	pub name: String,
	pub message: String,
	pub stack: String,
	pub system_info: SystemInfo,
}

/// Body of `PUT snapshot/{snapshot_id}/attachment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRequest {
	#[serde(rename = "type")]
	pub kind: String,
	pub data: RecordData,
}

impl AttachmentRequest {
	/// Wraps an exception and a system sample as a `record` attachment.
	pub fn record(
		exception: &ExceptionRecord,
		level: RecordLevel,
		timestamp: i64,
		system_info: SystemInfo,
	) -> Self {
		Self {
			kind: "record".to_string(),
			data: RecordData {
				timestamp,
				level,
				name: exception.name.clone(),
				message: exception.message.clone(),
				stack: exception.stack.clone(),
				system_info,
			},
		}
	}
}

/// Extracts the `id` field of a service response.
///
/// The service is not consistent about id types, so strings and numbers are
/// both accepted and rendered as strings.
pub fn id_from_response(body: &serde_json::Value) -> Option<String> {
	match body.get("id")? {
		serde_json::Value::String(s) => Some(s.clone()),
		serde_json::Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}
