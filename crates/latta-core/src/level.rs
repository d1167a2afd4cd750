// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Severity levels attached to records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Severity of an attached record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordLevel {
	#[default]
	Error,
	Warn,
	Fatal,
}

impl RecordLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Error => "ERROR",
			Self::Warn => "WARN",
			Self::Fatal => "FATAL",
		}
	}
}

impl fmt::Display for RecordLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RecordLevel {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ERROR" => Ok(Self::Error),
			"WARN" => Ok(Self::Warn),
			"FATAL" => Ok(Self::Fatal),
			_ => Err(CoreError::InvalidRecordLevel(s.to_string())),
		}
	}
}
