// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared mock service and fixtures.
//!
//! The reporter is blocking, so tests are plain `#[test]`s: the mock server is
//! driven through its own tokio runtime and the reporter is called from the
//! test thread, outside any runtime.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use latta::{ErrorReporter, ErrorReporterBuilder, SystemInfo, SystemSampler};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "k";

/// Sample returned by [`FixedSampler`].
pub fn fixed_system_info() -> SystemInfo {
	SystemInfo::new(12.5, 8_000_000, 2_000_000)
}

/// Returns a constant sample without waiting out a CPU window.
pub struct FixedSampler;

impl SystemSampler for FixedSampler {
	fn sample(&self) -> SystemInfo {
		fixed_system_info()
	}
}

/// Stand-in for an application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError(pub String);

impl fmt::Display for ValueError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Error for ValueError {}

/// A wiremock server with the runtime that drives it.
pub struct MockService {
	pub server: MockServer,
	rt: Runtime,
}

impl MockService {
	pub fn start() -> Self {
		let rt = Runtime::new().expect("failed to build tokio runtime");
		let server = rt.block_on(MockServer::start());
		Self { server, rt }
	}

	pub fn base_url(&self) -> String {
		format!("{}/v1", self.server.uri())
	}

	pub fn mount(&self, mock: Mock) {
		self.rt.block_on(mock.mount(&self.server));
	}

	pub fn requests(&self) -> Vec<Request> {
		self.rt
			.block_on(self.server.received_requests())
			.unwrap_or_default()
	}

	/// Request paths in arrival order.
	pub fn paths(&self) -> Vec<String> {
		self.requests()
			.iter()
			.map(|r| r.url.path().to_string())
			.collect()
	}

	/// Builder pointed at this server with a fixed sampler.
	pub fn builder(&self) -> ErrorReporterBuilder {
		ErrorReporter::builder()
			.api_key(API_KEY)
			.base_url(self.base_url())
			.system_sampler(Arc::new(FixedSampler))
	}

	pub fn reporter(&self) -> ErrorReporter {
		self.builder().build().expect("failed to build reporter")
	}

	pub fn mount_instance(&self, status: u16, body: Value) {
		self.mount(
			Mock::given(method("PUT"))
				.and(path("/v1/instance/generic"))
				.respond_with(ResponseTemplate::new(status).set_body_json(body)),
		);
	}

	pub fn mount_snapshot(&self, status: u16, body: Value) {
		self.mount(
			Mock::given(method("PUT"))
				.and(path_regex(r"^/v1/snapshot/[^/]+$"))
				.respond_with(ResponseTemplate::new(status).set_body_json(body)),
		);
	}

	pub fn mount_attachment(&self, status: u16) {
		self.mount(
			Mock::given(method("PUT"))
				.and(path_regex(r"^/v1/snapshot/[^/]+/attachment$"))
				.respond_with(ResponseTemplate::new(status).set_body_json(json!({}))),
		);
	}

	/// Mounts a service that accepts everything.
	pub fn mount_happy_path(&self, instance_id: &str, snapshot_id: &str) {
		self.mount_instance(200, json!({ "id": instance_id }));
		self.mount_snapshot(200, json!({ "id": snapshot_id }));
		self.mount_attachment(200);
	}
}

pub fn body(request: &Request) -> Value {
	request.body_json().expect("request body is not JSON")
}

pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
	request.headers.get(name).and_then(|v| v.to_str().ok())
}
