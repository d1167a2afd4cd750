// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Host description sent on instance registration.

use latta_core::{InstanceRequest, FALLBACK_LANG};

/// Describes the current host for `PUT instance/generic`.
pub fn instance_request(device: &str) -> InstanceRequest {
	InstanceRequest {
		os_version: os_version(),
		os: os_name(std::env::consts::OS),
		lang: sys_locale::get_locale()
			.and_then(|raw| normalize_locale(&raw))
			.unwrap_or_else(|| FALLBACK_LANG.to_string()),
		device: device.to_string(),
	}
}

/// Lowercased platform name as the service knows it.
///
/// Rust reports macOS as "macos"; the service groups it under "darwin".
fn os_name(os: &str) -> String {
	match os {
		"macos" => "darwin".to_string(),
		other => other.to_lowercase(),
	}
}

/// Kernel version string, the `version` field of `uname(2)`.
#[cfg(unix)]
fn os_version() -> String {
	// SAFETY: `utsname` is plain old data; an all-zero value is valid.
	let mut name: libc::utsname = unsafe { std::mem::zeroed() };
	// SAFETY: `uname` only writes into the struct we own.
	if unsafe { libc::uname(&mut name) } != 0 {
		return String::new();
	}
	// SAFETY: on success every field is a NUL-terminated string.
	let version = unsafe { std::ffi::CStr::from_ptr(name.version.as_ptr()) };
	version.to_string_lossy().into_owned()
}

#[cfg(not(unix))]
fn os_version() -> String {
	String::new()
}

/// Normalizes a locale to `ll_CC` form, e.g. "en-US" and "en_US.UTF-8" both
/// become "en_US". The C and POSIX locales carry no language.
fn normalize_locale(raw: &str) -> Option<String> {
	let tag = raw.split(['.', '@']).next()?.trim();
	if tag.is_empty() || tag.eq_ignore_ascii_case("c") || tag.eq_ignore_ascii_case("posix") {
		return None;
	}
	Some(tag.replace('-', "_"))
}
