// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wrapped callables against the mock recording service:
//! - successful calls pass through without any request
//! - failures are reported in three ordered calls and returned unchanged
//! - reporting failures never replace the original error or panic
//! - boxed errors are reported under their concrete type name

use std::error::Error;
use std::num::ParseIntError;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::json;
use tokio::runtime::Runtime;

use crate::common::{body, MockService, ValueError};

fn validate(input: &str) -> Result<usize, ValueError> {
	if input == "bad" {
		Err(ValueError("bad".to_string()))
	} else {
		Ok(input.len())
	}
}

#[test]
fn test_successful_call_issues_no_requests() {
	let service = MockService::start();
	service.mount_happy_path("inst-1", "snap-1");

	let reporter = service.reporter();
	let checked = reporter.wrap(validate);

	assert_eq!(checked("fine"), Ok(4));
	assert!(service.requests().is_empty());
}

#[test]
fn test_value_error_is_reported_then_returned() {
	let service = MockService::start();
	service.mount_happy_path("inst-1", "snap-1");

	let reporter = service.reporter();
	let checked = reporter.wrap(validate);

	assert_eq!(checked("bad"), Err(ValueError("bad".to_string())));

	let requests = service.requests();
	let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
	assert_eq!(
		paths,
		vec![
			"/v1/instance/generic",
			"/v1/snapshot/inst-1",
			"/v1/snapshot/snap-1/attachment",
		]
	);

	assert_eq!(body(&requests[0])["device"], "desktop");

	let record = body(&requests[2]);
	assert_eq!(record["data"]["name"], "ValueError");
	assert_eq!(record["data"]["message"], "bad");
	assert_eq!(record["data"]["level"], "ERROR");
	assert!(record["data"]["stack"]
		.as_str()
		.is_some_and(|s| s.starts_with("ValueError: bad\n")));
}

#[test]
fn test_each_failure_gets_its_own_snapshot() {
	let service = MockService::start();
	service.mount_happy_path("inst-1", "snap-1");

	let reporter = service.reporter();
	let checked = reporter.wrap(validate);
	let _ = checked("bad");
	let _ = checked("bad");

	assert_eq!(
		service.paths(),
		vec![
			"/v1/instance/generic",
			"/v1/snapshot/inst-1",
			"/v1/snapshot/snap-1/attachment",
			"/v1/snapshot/inst-1",
			"/v1/snapshot/snap-1/attachment",
		]
	);
}

#[test]
fn test_rejected_attachment_still_returns_original_error() {
	let service = MockService::start();
	service.mount_instance(200, json!({ "id": "inst-1" }));
	service.mount_snapshot(200, json!({ "id": "snap-1" }));
	service.mount_attachment(500);

	let reporter = service.reporter();
	let result = reporter.run(|| validate("bad"));

	assert_eq!(result, Err(ValueError("bad".to_string())));
	assert_eq!(service.requests().len(), 3);
}

#[test]
fn test_registration_failure_does_not_replace_original_error() {
	let service = MockService::start();
	service.mount_instance(401, json!({ "error": "invalid api key" }));

	let reporter = service.reporter();
	let checked = reporter.wrap(validate);

	assert_eq!(checked("bad"), Err(ValueError("bad".to_string())));
	assert_eq!(service.paths(), vec!["/v1/instance/generic"]);
}

#[test]
fn test_snapshot_failure_does_not_replace_original_error() {
	let service = MockService::start();
	service.mount_instance(200, json!({ "id": "inst-1" }));
	service.mount_snapshot(500, json!({}));

	let reporter = service.reporter();
	let result = reporter.run(|| validate("bad"));

	assert_eq!(result, Err(ValueError("bad".to_string())));
}

#[test]
fn test_panic_is_reported_as_fatal_and_resumed() {
	let service = MockService::start();
	service.mount_happy_path("inst-1", "snap-1");

	let reporter = service.reporter();
	let index = reporter.wrap_unwind(|i: usize| [1, 2, 3][i]);

	assert_eq!(index(1), 2);
	assert!(service.requests().is_empty());

	let payload = catch_unwind(AssertUnwindSafe(|| index(7))).unwrap_err();
	let message = payload
		.downcast_ref::<String>()
		.cloned()
		.unwrap_or_default();
	assert!(message.contains("index out of bounds"));

	let requests = service.requests();
	assert_eq!(requests.len(), 3);
	let record = body(&requests[2]);
	assert_eq!(record["data"]["name"], "panic");
	assert_eq!(record["data"]["level"], "FATAL");
	assert_eq!(record["data"]["message"], message.as_str());
}

#[test]
fn test_boxed_error_is_reported_with_concrete_name() {
	let service = MockService::start();
	service.mount_happy_path("inst-1", "snap-1");

	let reporter = service.reporter();
	let parse = reporter.wrap(|raw: &str| -> Result<u16, Box<dyn Error>> {
		Ok(raw.parse::<u16>()?)
	});

	let err = parse("port").unwrap_err();
	assert!(err.downcast_ref::<ParseIntError>().is_some());

	let requests = service.requests();
	assert_eq!(requests.len(), 3);
	let record = body(&requests[2]);
	assert_eq!(record["data"]["name"], "ParseIntError");
	assert_eq!(record["data"]["message"], "invalid digit found in string");
}

#[test]
fn test_reporting_from_async_context_keeps_error_and_reporter() {
	let service = MockService::start();
	service.mount_happy_path("inst-1", "snap-1");

	let reporter = service.reporter();
	let checked = reporter.wrap(validate);

	let runtime = Runtime::new().unwrap();
	let inside =
		runtime.block_on(async { catch_unwind(AssertUnwindSafe(|| checked("bad"))) });
	drop(runtime);

	assert_eq!(inside.unwrap(), Err(ValueError("bad".to_string())));

	assert_eq!(checked("bad"), Err(ValueError("bad".to_string())));
	assert_eq!(reporter.instance_id().unwrap(), Some("inst-1".to_string()));
	let paths = service.paths();
	assert!(paths.ends_with(&[
		"/v1/snapshot/inst-1".to_string(),
		"/v1/snapshot/snap-1/attachment".to_string(),
	]));
}
