// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared blocking HTTP client with consistent User-Agent header.

use reqwest::blocking::{Client, ClientBuilder};

/// SDK name used in the User-Agent.
const SDK_NAME: &str = "latta-rust";

/// Creates a blocking HTTP client builder with the standard User-Agent header.
///
/// # Example
/// ```ignore
/// let client = latta_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Platform string in `{os}-{arch}` format, e.g. "linux-x86_64".
pub fn platform() -> String {
	format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Returns the standard User-Agent string.
///
/// Format: `latta-rust/{platform}/{version}`
pub fn user_agent() -> String {
	format!("{}/{}/{}", SDK_NAME, platform(), env!("CARGO_PKG_VERSION"))
}
