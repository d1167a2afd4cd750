// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wrapping callables so their failures are reported.
//!
//! Wrapped callables behave exactly like the originals: values and errors
//! come back unchanged and panics keep unwinding with their original payload.
//! A failure on the reporting path, including a panic inside it, is logged
//! and dropped; it never replaces the caller's error.

use std::panic::{self, AssertUnwindSafe};

use latta_core::{ExceptionRecord, RecordLevel};
use tracing::{debug, error, warn};

use crate::client::ErrorReporter;
use crate::exception::{panic_message, record_from_panic, Reportable};

impl ErrorReporter {
	/// Wraps `f` so every `Err` it returns is reported before being handed
	/// back unchanged.
	///
	/// The error may be any `E: Error` or a boxed `dyn Error`; see
	/// [`Reportable`].
	///
	/// Several arguments are passed as a tuple:
	///
	/// ```ignore
	/// let add = latta.wrap(|(a, b): (&str, &str)| -> Result<u32, ParseIntError> {
	///     Ok(a.parse::<u32>()? + b.parse::<u32>()?)
	/// });
	/// let sum = add(("1", "2"))?;
	/// ```
	pub fn wrap<F, A, T, E, M>(&self, f: F) -> impl Fn(A) -> Result<T, E>
	where
		F: Fn(A) -> Result<T, E>,
		E: Reportable<M>,
	{
		let reporter = self.clone();
		move |args| {
			f(args).map_err(|error| {
				reporter.report_quietly(|| error.to_record(), RecordLevel::Error);
				error
			})
		}
	}

	/// Runs `f` once, reporting its error before returning it unchanged.
	pub fn run<F, T, E, M>(&self, f: F) -> Result<T, E>
	where
		F: FnOnce() -> Result<T, E>,
		E: Reportable<M>,
	{
		f().map_err(|error| {
			self.report_quietly(|| error.to_record(), RecordLevel::Error);
			error
		})
	}

	/// Wraps `f` so a panic inside it is reported at `FATAL` level and then
	/// resumed with the original payload.
	pub fn wrap_unwind<F, A, T>(&self, f: F) -> impl Fn(A) -> T
	where
		F: Fn(A) -> T,
	{
		let reporter = self.clone();
		move |args| reporter.catch_and_report(|| f(args))
	}

	/// Runs `f` once, reporting a panic before resuming it.
	pub fn run_unwind<F, T>(&self, f: F) -> T
	where
		F: FnOnce() -> T,
	{
		self.catch_and_report(f)
	}

	fn catch_and_report<F, T>(&self, f: F) -> T
	where
		F: FnOnce() -> T,
	{
		match panic::catch_unwind(AssertUnwindSafe(f)) {
			Ok(value) => value,
			Err(payload) => {
				self.report_quietly(|| record_from_panic(payload.as_ref()), RecordLevel::Fatal);
				panic::resume_unwind(payload)
			}
		}
	}

	/// Builds and delivers a record, logging every failure. Panics raised
	/// while doing so are caught and logged as well.
	fn report_quietly<R>(&self, record: R, level: RecordLevel)
	where
		R: FnOnce() -> ExceptionRecord,
	{
		let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
			let record = record();
			let result = self.report_with_level(&record, level);
			(record, result)
		}));

		match outcome {
			Ok((record, Ok(true))) => debug!(name = %record.name, level = %level, "Error reported"),
			Ok((record, Ok(false))) => {
				warn!(name = %record.name, level = %level, "Error report was not accepted")
			}
			Ok((record, Err(e))) => error!(error = %e, name = %record.name, "Failed to report error"),
			Err(payload) => error!(
				panic = %panic_message(payload.as_ref()),
				level = %level,
				"Reporting panicked"
			),
		}
	}
}
