// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Report a failing call using the latta SDK.
//!
//! Run with:
//!   LATTA_API_KEY=... cargo run --example capture -p latta

use std::num::ParseIntError;

use latta::{ErrorReporterBuilder, RecordLevel};
use tracing_subscriber::EnvFilter;

fn parse_port(raw: &str) -> Result<u16, ParseIntError> {
	raw.trim().parse()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("latta=debug")),
		)
		.init();

	// LATTA_API_KEY is required; LATTA_BASE_URL, LATTA_DEVICE and
	// LATTA_INSTANCE_ID are optional.
	let reporter = ErrorReporterBuilder::from_env().build()?;

	println!("Reporting to {}", reporter.base_url());
	println!("  Device: {}", reporter.device());

	let checked_port = reporter.wrap(parse_port);

	println!("\nParsing a valid port...");
	println!("  Port: {}", checked_port("8080")?);

	println!("\nParsing an invalid port (this is reported)...");
	match checked_port("eighty") {
		Ok(port) => println!("  Unexpected port: {port}"),
		Err(e) => println!("  Caller still sees the original error: {e}"),
	}

	println!("\nSending a warning record directly...");
	let record = latta::ExceptionRecord::new("DeprecatedConfig", "`port` moved to `listen`", "");
	let instance_id = reporter.ensure_instance_id()?;
	let snapshot_id = reporter.create_snapshot(&instance_id)?;
	let attached = reporter.attach_record_with_level(&snapshot_id, &record, RecordLevel::Warn)?;

	println!("  Instance ID: {instance_id}");
	println!("  Snapshot ID: {snapshot_id}");
	println!("  Attached: {attached}");
	println!("  Relation ID: {}", reporter.relation_id()?);

	Ok(())
}
