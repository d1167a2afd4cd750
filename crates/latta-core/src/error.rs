// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the core wire types.

use thiserror::Error;

/// Errors raised while interpreting wire values.
#[derive(Debug, Error)]
pub enum CoreError {
	#[error("invalid record level: {0}")]
	InvalidRecordLevel(String),
}
