// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error reporter client for the Latta recording service.

use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use latta_core::{
	id_from_response, AttachmentRequest, Endpoint, ExceptionRecord, RecordLevel, RelationId,
	SnapshotRequest, SystemInfo, DEFAULT_BASE_URL, DEFAULT_DEVICE,
};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LattaError, Result};
use crate::exception::record_from_error;
use crate::host::instance_request;
use crate::system::{ProcfsSampler, SystemSampler, DEFAULT_CPU_SAMPLE_WINDOW};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "LATTA_API_KEY";
/// Environment variable overriding the service base URL.
pub const ENV_BASE_URL: &str = "LATTA_BASE_URL";
/// Environment variable holding the device class.
pub const ENV_DEVICE: &str = "LATTA_DEVICE";
/// Environment variable holding a pre-registered instance id.
pub const ENV_INSTANCE_ID: &str = "LATTA_INSTANCE_ID";

/// Recognized reporter options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterOptions {
	/// Device class sent on registration. Defaults to "desktop".
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub device: Option<String>,
	/// Pre-registered instance id. When set, registration is skipped.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub instance_id: Option<String>,
}

/// Configuration for the reporter's I/O.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Timeout for each HTTP request.
	pub request_timeout: Duration,
	/// Window over which CPU utilization is measured.
	pub cpu_sample_window: Duration,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(30),
			cpu_sample_window: DEFAULT_CPU_SAMPLE_WINDOW,
		}
	}
}

/// Builder for constructing an [`ErrorReporter`].
pub struct ErrorReporterBuilder {
	api_key: Option<String>,
	base_url: Option<String>,
	options: ReporterOptions,
	config: ClientConfig,
	sampler: Option<Arc<dyn SystemSampler>>,
}

impl ErrorReporterBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			api_key: None,
			base_url: None,
			options: ReporterOptions::default(),
			config: ClientConfig::default(),
			sampler: None,
		}
	}

	/// Creates a builder seeded from `LATTA_API_KEY`, `LATTA_BASE_URL`,
	/// `LATTA_DEVICE` and `LATTA_INSTANCE_ID`. Unset variables are left at
	/// their defaults.
	pub fn from_env() -> Self {
		let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

		Self {
			api_key: var(ENV_API_KEY),
			base_url: var(ENV_BASE_URL),
			options: ReporterOptions {
				device: var(ENV_DEVICE),
				instance_id: var(ENV_INSTANCE_ID),
			},
			..Self::new()
		}
	}

	/// Sets the API key sent as a bearer token.
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	/// Sets the base URL of the recording service.
	///
	/// Example: `https://recording.latta.ai/v1`
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	/// Replaces all reporter options.
	pub fn options(mut self, options: ReporterOptions) -> Self {
		self.options = options;
		self
	}

	/// Sets the device class sent on registration.
	pub fn device(mut self, device: impl Into<String>) -> Self {
		self.options.device = Some(device.into());
		self
	}

	/// Sets a pre-registered instance id, skipping registration.
	pub fn instance_id(mut self, id: impl Into<String>) -> Self {
		self.options.instance_id = Some(id.into());
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Sets the CPU measurement window of the default sampler.
	pub fn cpu_sample_window(mut self, window: Duration) -> Self {
		self.config.cpu_sample_window = window;
		self
	}

	/// Replaces the source of system metrics.
	pub fn system_sampler(mut self, sampler: Arc<dyn SystemSampler>) -> Self {
		self.sampler = Some(sampler);
		self
	}

	/// Builds the reporter. No network I/O happens here.
	pub fn build(self) -> Result<ErrorReporter> {
		let api_key = self
			.api_key
			.filter(|key| !key.trim().is_empty())
			.ok_or(LattaError::InvalidApiKey)?;

		let base_url = self
			.base_url
			.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
			.trim_end_matches('/')
			.to_string();
		if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
			return Err(LattaError::InvalidBaseUrl);
		}

		let http_client = latta_common_http::builder()
			.timeout(self.config.request_timeout)
			.build()?;

		let sampler = self
			.sampler
			.unwrap_or_else(|| {
				Arc::new(ProcfsSampler::new(self.config.cpu_sample_window)) as Arc<dyn SystemSampler>
			});

		let device = self
			.options
			.device
			.unwrap_or_else(|| DEFAULT_DEVICE.to_string());

		let inner = Arc::new(ReporterInner {
			api_key,
			base_url: base_url.clone(),
			device,
			http_client,
			config: self.config,
			sampler,
			instance_id: Mutex::new(self.options.instance_id),
			relation_id: RwLock::new(RelationId::new()),
		});

		debug!(base_url = %base_url, "Error reporter initialized");

		Ok(ErrorReporter { inner })
	}
}

impl Default for ErrorReporterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Internal reporter state.
struct ReporterInner {
	api_key: String,
	base_url: String,
	device: String,
	http_client: Client,
	config: ClientConfig,
	sampler: Arc<dyn SystemSampler>,
	/// Held across registration so concurrent first reports register once.
	instance_id: Mutex<Option<String>>,
	relation_id: RwLock<RelationId>,
}

/// Reports errors to the Latta recording service.
///
/// Every report is three blocking `PUT`s issued from the calling thread:
/// instance registration (once, then cached), snapshot creation and record
/// attachment. Cloning is cheap and clones share the cached instance id.
///
/// The HTTP client is blocking; inside an async runtime call the reporter
/// from `spawn_blocking`.
///
/// # Example
///
/// ```ignore
/// use latta::ErrorReporter;
///
/// let latta = ErrorReporter::new("api_key", None)?;
///
/// let parse_port = latta.wrap(|raw: &str| raw.parse::<u16>());
/// let port = parse_port("8080")?;
/// ```
#[derive(Clone)]
pub struct ErrorReporter {
	inner: Arc<ReporterInner>,
}

impl ErrorReporter {
	/// Creates a new builder for constructing an ErrorReporter.
	pub fn builder() -> ErrorReporterBuilder {
		ErrorReporterBuilder::new()
	}

	/// Creates a reporter for the production service.
	pub fn new(api_key: impl Into<String>, options: Option<ReporterOptions>) -> Result<Self> {
		Self::builder()
			.api_key(api_key)
			.options(options.unwrap_or_default())
			.build()
	}

	/// Base URL requests are sent to, without a trailing slash.
	pub fn base_url(&self) -> &str {
		&self.inner.base_url
	}

	/// Device class sent on registration.
	pub fn device(&self) -> &str {
		&self.inner.device
	}

	/// Request timeout and sampling window in effect.
	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	/// The cached instance id, if one was supplied or registered.
	pub fn instance_id(&self) -> Result<Option<String>> {
		Ok(self.cached_instance_id().clone())
	}

	/// Forgets the cached instance id; the next report registers again.
	pub fn clear_instance_id(&self) -> Result<()> {
		*self.cached_instance_id() = None;
		Ok(())
	}

	/// The current relation id. A new one is drawn after every snapshot.
	pub fn relation_id(&self) -> Result<RelationId> {
		let relation_id = self.inner.relation_id.read().map_err(|_| LattaError::LockError)?;
		Ok(*relation_id)
	}

	/// Returns the cached instance id, registering the host on first use.
	pub fn ensure_instance_id(&self) -> Result<String> {
		let mut cached = self.cached_instance_id();
		if let Some(id) = cached.as_ref() {
			return Ok(id.clone());
		}

		let id = self.register_instance()?;
		*cached = Some(id.clone());
		Ok(id)
	}

	/// Registers this host as an instance and returns the server-issued id.
	///
	/// Does not touch the cache; see [`ErrorReporter::ensure_instance_id`].
	pub fn register_instance(&self) -> Result<String> {
		let request = instance_request(&self.inner.device);
		debug!(
			os = %request.os,
			lang = %request.lang,
			device = %request.device,
			"Registering instance"
		);

		let response = self.put(Endpoint::Instance, &request)?;
		let status = response.status();
		let text = response.text()?;

		if !status.is_success() {
			return Err(LattaError::RegistrationFailed {
				status: status.as_u16(),
				message: text,
			});
		}

		let body: serde_json::Value = serde_json::from_str(&text)?;
		let id = id_from_response(&body).ok_or_else(|| LattaError::MissingInstanceId { body: text })?;

		info!(instance_id = %id, "Instance registered");
		Ok(id)
	}

	/// Creates a snapshot for `instance_id` and returns its id.
	pub fn create_snapshot(&self, instance_id: &str) -> Result<String> {
		let request = SnapshotRequest::for_instance(instance_id);
		let response = self.put(Endpoint::Snapshot(instance_id), &request)?;
		let status = response.status();
		let text = response.text()?;

		if !status.is_success() {
			return Err(LattaError::SnapshotFailed {
				status: status.as_u16(),
				message: text,
			});
		}

		let relation_id = RelationId::new();
		*self.inner.relation_id.write().map_err(|_| LattaError::LockError)? = relation_id;

		let body: serde_json::Value = serde_json::from_str(&text)?;
		let id = id_from_response(&body).ok_or_else(|| LattaError::MissingSnapshotId { body: text })?;

		info!(snapshot_id = %id, instance_id = %instance_id, "Snapshot created");
		Ok(id)
	}

	/// Attaches `record` at `ERROR` level. See
	/// [`ErrorReporter::attach_record_with_level`].
	pub fn attach_record(&self, snapshot_id: &str, record: &ExceptionRecord) -> Result<bool> {
		self.attach_record_with_level(snapshot_id, record, RecordLevel::Error)
	}

	/// Attaches `record` and a fresh system sample to a snapshot.
	///
	/// A non-success status yields `Ok(false)`; only transport failures are
	/// errors.
	pub fn attach_record_with_level(
		&self,
		snapshot_id: &str,
		record: &ExceptionRecord,
		level: RecordLevel,
	) -> Result<bool> {
		let system_info = self.sample_system_info();
		let request =
			AttachmentRequest::record(record, level, Utc::now().timestamp_millis(), system_info);

		let response = self.put(Endpoint::SnapshotAttachment(snapshot_id), &request)?;
		let status = response.status();

		if status.is_success() {
			debug!(snapshot_id = %snapshot_id, name = %record.name, "Record attached");
			Ok(true)
		} else {
			warn!(
				snapshot_id = %snapshot_id,
				status = status.as_u16(),
				"Record attachment rejected"
			);
			Ok(false)
		}
	}

	/// Samples host CPU and memory. Blocks for the sampling window.
	pub fn sample_system_info(&self) -> SystemInfo {
		self.inner.sampler.sample()
	}

	/// Delivers `record` at `ERROR` level: instance, snapshot, attachment.
	pub fn report(&self, record: &ExceptionRecord) -> Result<bool> {
		self.report_with_level(record, RecordLevel::Error)
	}

	/// Delivers `record` at the given level.
	pub fn report_with_level(&self, record: &ExceptionRecord, level: RecordLevel) -> Result<bool> {
		let instance_id = self.ensure_instance_id()?;
		let snapshot_id = self.create_snapshot(&instance_id)?;
		self.attach_record_with_level(&snapshot_id, record, level)
	}

	/// Builds a record from `error` and delivers it.
	pub fn report_error<E>(&self, error: &E) -> Result<bool>
	where
		E: Error + ?Sized,
	{
		self.report(&record_from_error(error))
	}

	/// Locks the instance id cache. A panic while the lock was held cannot
	/// leave the `Option` half-written, so poisoning is cleared.
	fn cached_instance_id(&self) -> MutexGuard<'_, Option<String>> {
		self.inner.instance_id.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn put<B: Serialize + ?Sized>(&self, endpoint: Endpoint<'_>, body: &B) -> Result<Response> {
		let url = endpoint.url(&self.inner.base_url);
		debug!(url = %url, "Sending request");

		let response = self
			.inner
			.http_client
			.put(&url)
			.header("Authorization", format!("Bearer {}", self.inner.api_key))
			.json(body)
			.send()?;

		Ok(response)
	}
}
