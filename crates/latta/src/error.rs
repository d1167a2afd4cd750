// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the recording SDK.

use thiserror::Error;

/// Result type alias for recording operations.
pub type Result<T> = std::result::Result<T, LattaError>;

/// Errors that can occur while reporting to the recording service.
#[derive(Debug, Error)]
pub enum LattaError {
	/// API key is missing or blank.
	#[error("invalid API key: must be a non-empty string")]
	InvalidApiKey,

	/// Base URL is not an http(s) URL.
	#[error("invalid base URL")]
	InvalidBaseUrl,

	/// HTTP request failed before a response was received.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Instance registration was rejected.
	#[error("instance registration failed (status {status}): {message}")]
	RegistrationFailed {
		/// HTTP status code.
		status: u16,
		/// Response body.
		message: String,
	},

	/// Instance registration succeeded without returning an id.
	#[error("instance registration returned no id: {body}")]
	MissingInstanceId {
		/// Response body.
		body: String,
	},

	/// Snapshot creation was rejected.
	#[error("snapshot creation failed (status {status}): {message}")]
	SnapshotFailed {
		/// HTTP status code.
		status: u16,
		/// Response body.
		message: String,
	},

	/// Snapshot creation succeeded without returning an id.
	#[error("snapshot creation returned no id: {body}")]
	MissingSnapshotId {
		/// Response body.
		body: String,
	},

	/// A response body was not valid JSON.
	#[error("serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),

	/// Lock acquisition failed.
	#[error("failed to acquire lock")]
	LockError,
}

impl LattaError {
	/// True for failures of the registration or snapshot step, which abort a
	/// report before anything is attached.
	pub fn is_fatal_to_report(&self) -> bool {
		matches!(
			self,
			Self::RegistrationFailed { .. }
				| Self::MissingInstanceId { .. }
				| Self::SnapshotFailed { .. }
				| Self::MissingSnapshotId { .. }
		)
	}
}
