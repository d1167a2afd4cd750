// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backtrace capture and formatting for record stacks.

use rustc_demangle::demangle;
use std::backtrace::Backtrace;
use std::fmt::Write;

/// A single parsed backtrace frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	pub function: String,
	/// `file:line:col`, when debug info is available.
	pub location: Option<String>,
	pub in_app: bool,
}

/// Capture a fresh backtrace and parse it.
pub fn capture_frames() -> Vec<Frame> {
	parse_backtrace(&Backtrace::force_capture())
}

/// Parse a Rust backtrace into frames.
pub fn parse_backtrace(backtrace: &Backtrace) -> Vec<Frame> {
	parse_backtrace_string(&format!("{backtrace}"))
}

/// Parse backtrace text of the form
///
/// ```text
///    0: my_app::main
///              at ./src/main.rs:4:5
/// ```
fn parse_backtrace_string(bt_string: &str) -> Vec<Frame> {
	let mut frames: Vec<Frame> = Vec::new();

	for line in bt_string.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(location) = line.strip_prefix("at ") {
			if let Some(frame) = frames.last_mut() {
				frame.location = Some(location.trim().to_string());
			}
			continue;
		}

		if let Some(frame) = parse_frame_line(line) {
			frames.push(frame);
		}
	}

	frames
}

/// Parse a single `N: function` line into a Frame.
fn parse_frame_line(line: &str) -> Option<Frame> {
	let function_part = match line.split_once(':') {
		Some((prefix, rest)) if prefix.trim().parse::<u32>().is_ok() => rest.trim(),
		_ => line,
	};

	if function_part.is_empty() {
		return None;
	}

	let function = demangle(function_part).to_string();
	let in_app = is_in_app_frame(&function);

	Some(Frame {
		function,
		location: None,
		in_app,
	})
}

/// Determine if a frame is from user application code rather than the
/// standard library, common runtimes or this SDK.
fn is_in_app_frame(function: &str) -> bool {
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"tokio::",
		"<tokio::",
		"futures::",
		"<futures::",
		"tracing::",
		"<tracing::",
		"latta::",
		"<latta::",
		"test::",
		"panic_unwind::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
		"__libc_",
	];

	const SYSTEM_CONTAINS: &[&str] = &[
		"::panic::",
		"::panicking::",
		"::rt::",
		"::sys_common::",
		"::sys::",
	];

	if SYSTEM_PREFIXES.iter().any(|p| function.starts_with(p)) {
		return false;
	}

	!SYSTEM_CONTAINS.iter().any(|c| function.contains(c))
}

/// Render frames as a numbered trace. Only application frames are kept when
/// there are any.
pub fn format_frames(frames: &[Frame]) -> String {
	let app_frames: Vec<&Frame> = frames.iter().filter(|f| f.in_app).collect();
	let selected: Vec<&Frame> = if app_frames.is_empty() {
		frames.iter().collect()
	} else {
		app_frames
	};

	let mut out = String::new();
	for (idx, frame) in selected.iter().enumerate() {
		let _ = writeln!(out, "{idx:>4}: {}", frame.function);
		if let Some(location) = &frame.location {
			let _ = writeln!(out, "             at {location}");
		}
	}
	out
}
