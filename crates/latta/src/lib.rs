// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error recording SDK for Rust applications.
//!
//! Wrap fallible code with an [`ErrorReporter`] and every error it returns
//! (or panic it raises) is delivered to the Latta recording service together
//! with a snapshot of host CPU and memory. The caller still receives the
//! original error, untouched.
//!
//! # Quick Start
//!
//! ```ignore
//! use latta::{ErrorReporter, ReporterOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let latta = ErrorReporter::new(
//!         std::env::var("LATTA_API_KEY")?,
//!         Some(ReporterOptions {
//!             device: Some("server".into()),
//!             ..Default::default()
//!         }),
//!     )?;
//!
//!     // Errors are reported, then returned unchanged
//!     let load = latta.wrap(|path: &str| std::fs::read_to_string(path));
//!     let config = load("config.toml")?;
//!
//!     // Panics are reported at FATAL level, then resumed
//!     let checked = latta.wrap_unwind(|n: usize| config.lines().nth(n).map(str::len));
//!     checked(3);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Delivery
//!
//! Each report is three blocking `PUT` requests made from the failing
//! thread:
//!
//! 1. `instance/generic` registers the host once; the id is cached
//! 2. `snapshot/{instance_id}` opens an event
//! 3. `snapshot/{snapshot_id}/attachment` carries the error and system sample
//!
//! A failure while reporting is logged through `tracing` and never replaces
//! the wrapped error. Call [`ErrorReporter::report`] directly to observe
//! those failures.

mod backtrace;
mod client;
mod error;
mod exception;
mod host;
mod system;
mod wrap;

pub use client::{
	ClientConfig, ErrorReporter, ErrorReporterBuilder, ReporterOptions, ENV_API_KEY, ENV_BASE_URL,
	ENV_DEVICE, ENV_INSTANCE_ID,
};
pub use error::{LattaError, Result};
pub use exception::{
	marker, record_from_error, record_from_panic, short_type_name, Reportable, ERASED_ERROR_NAME,
	PANIC_NAME,
};
pub use system::{ProcfsSampler, SystemSampler, DEFAULT_CPU_SAMPLE_WINDOW};

// Re-export core types for convenience
pub use latta_core::{
	Endpoint, ExceptionRecord, RecordLevel, RelationId, SystemInfo, DEFAULT_BASE_URL,
	DEFAULT_DEVICE,
};
