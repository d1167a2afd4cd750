// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Building exception records from Rust errors and panics.

use std::any::Any;
use std::error::Error;
use std::fmt::Write;

use latta_core::ExceptionRecord;

use crate::backtrace::{capture_frames, format_frames};

/// Name reported for panics.
pub const PANIC_NAME: &str = "panic";

/// Name reported for type-erased errors whose `Debug` output does not start
/// with a type name.
pub const ERASED_ERROR_NAME: &str = "Error";

/// Errors that [`ErrorReporter::wrap`](crate::ErrorReporter::wrap) and
/// [`ErrorReporter::run`](crate::ErrorReporter::run) can report.
///
/// Implemented for every `E: Error` and for the boxed trait objects
/// `Box<dyn Error>` and `Box<dyn Error + Send + Sync>`. The marker parameter
/// keeps the two families apart and is inferred at the call site.
pub trait Reportable<Marker> {
	/// Builds the record sent for this error.
	fn to_record(&self) -> ExceptionRecord;
}

/// Markers selecting a [`Reportable`] implementation.
pub mod marker {
	/// Any concrete `E: Error`.
	pub struct Typed;
	/// A boxed `dyn Error` trait object.
	pub struct Boxed;
}

impl<E: Error> Reportable<marker::Typed> for E {
	fn to_record(&self) -> ExceptionRecord {
		record_from_error(self)
	}
}

impl Reportable<marker::Boxed> for Box<dyn Error> {
	fn to_record(&self) -> ExceptionRecord {
		record_from_error(&**self)
	}
}

impl Reportable<marker::Boxed> for Box<dyn Error + Send + Sync> {
	fn to_record(&self) -> ExceptionRecord {
		record_from_error(&**self)
	}
}

/// Builds a record from an error, capturing the current backtrace.
///
/// The record name is the error's type name without its module path, the
/// message is its `Display` output, and the stack lists every `source()` in
/// the chain followed by the backtrace. Trait objects are named after the
/// leading identifier of their `Debug` output.
pub fn record_from_error<E>(error: &E) -> ExceptionRecord
where
	E: Error + ?Sized,
{
	let mut name = short_type_name(std::any::type_name::<E>());
	if name.trim_start_matches('&').starts_with("dyn ") {
		name = erased_error_name(error);
	}
	let message = error.to_string();

	let mut stack = format!("{name}: {message}\n");
	let mut source = error.source();
	while let Some(cause) = source {
		let _ = writeln!(stack, "Caused by: {cause}");
		source = cause.source();
	}
	push_backtrace(&mut stack);

	ExceptionRecord::new(name, message, stack)
}

/// Builds a record from a panic payload, capturing the current backtrace.
pub fn record_from_panic(payload: &(dyn Any + Send)) -> ExceptionRecord {
	let message = panic_message(payload);
	let mut stack = format!("{PANIC_NAME}: {message}\n");
	push_backtrace(&mut stack);
	ExceptionRecord::new(PANIC_NAME, message, stack)
}

fn push_backtrace(stack: &mut String) {
	stack.push_str("\nStack backtrace:\n");
	stack.push_str(&format_frames(&capture_frames()));
}

/// Names a type-erased error from its `Debug` output.
///
/// `ParseIntError { kind: InvalidDigit }` yields `ParseIntError`; errors
/// whose `Debug` output is not led by an identifier, such as boxed strings,
/// yield [`ERASED_ERROR_NAME`].
pub fn erased_error_name<E>(error: &E) -> String
where
	E: Error + ?Sized,
{
	let debug = format!("{error:?}");
	let name: String = debug
		.chars()
		.take_while(|c| c.is_alphanumeric() || *c == '_')
		.collect();

	match name.chars().next() {
		Some(first) if first.is_alphabetic() => name,
		_ => ERASED_ERROR_NAME.to_string(),
	}
}

/// Extract the message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Box<dyn Any>".to_string()
	}
}

/// Strips module paths from every path segment of a type name.
///
/// `core::num::error::ParseIntError` becomes `ParseIntError` and
/// `alloc::boxed::Box<dyn core::error::Error>` becomes `Box<dyn Error>`.
pub fn short_type_name(full: &str) -> String {
	let mut out = String::with_capacity(full.len());
	let mut token = String::new();

	let flush = |token: &mut String, out: &mut String| {
		let short = token.rsplit("::").next().unwrap_or(token.as_str());
		out.push_str(short);
		token.clear();
	};

	for ch in full.chars() {
		if ch.is_alphanumeric() || ch == '_' || ch == ':' {
			token.push(ch);
		} else {
			flush(&mut token, &mut out);
			out.push(ch);
		}
	}
	flush(&mut token, &mut out);

	out
}
