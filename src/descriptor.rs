//! Store descriptor: where the service lives and how long each call may take.

// self
use crate::{_prelude::*, api::Endpoint, error::ConfigError};

/// Base URL of the public magazine store.
pub const DEFAULT_BASE_URL: &str = "http://magazinestore.azurewebsites.net/api/";
/// Deadline applied to every network call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum StoreDescriptorError {
	/// Base URL must use HTTP or HTTPS.
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL cannot carry path segments: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// Deadline must be positive.
	#[error("Request timeout must be greater than zero.")]
	ZeroTimeout,
}

/// Immutable descriptor consumed by [`StoreClient`](crate::client::StoreClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreDescriptor {
	/// Base URL every endpoint path is appended to; always ends with `/`.
	pub base_url: Url,
	/// Deadline applied to every network call.
	pub timeout: Duration,
}
impl StoreDescriptor {
	/// Creates a new builder seeded with the public store defaults.
	pub fn builder() -> StoreDescriptorBuilder {
		StoreDescriptorBuilder::default()
	}

	/// Resolves the URL for `endpoint`, appending `segments` percent-encoded.
	pub fn endpoint_url(&self, endpoint: Endpoint, segments: &[&str]) -> Result<Url, ConfigError> {
		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::CannotBeABase { url: self.base_url.to_string() })?
			.pop_if_empty()
			.push(endpoint.as_str())
			.extend(segments);

		Ok(url)
	}

	fn validate(&self) -> Result<(), StoreDescriptorError> {
		if !matches!(self.base_url.scheme(), "http" | "https") {
			return Err(StoreDescriptorError::UnsupportedScheme { url: self.base_url.to_string() });
		}
		if self.base_url.cannot_be_a_base() {
			return Err(StoreDescriptorError::CannotBeABase { url: self.base_url.to_string() });
		}
		if self.timeout.is_zero() {
			return Err(StoreDescriptorError::ZeroTimeout);
		}

		Ok(())
	}
}
impl Default for StoreDescriptor {
	fn default() -> Self {
		Self {
			base_url: Url::parse(DEFAULT_BASE_URL).expect("Default base URL must parse."),
			timeout: DEFAULT_TIMEOUT,
		}
	}
}

/// Builder for [`StoreDescriptor`] values.
#[derive(Debug, Default)]
pub struct StoreDescriptorBuilder {
	/// Optional base URL override.
	pub base_url: Option<Url>,
	/// Optional deadline override.
	pub timeout: Option<Duration>,
}
impl StoreDescriptorBuilder {
	/// Overrides the base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the per-call deadline.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<StoreDescriptor, StoreDescriptorError> {
		let defaults = StoreDescriptor::default();
		let mut base_url = self.base_url.unwrap_or(defaults.base_url);

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let descriptor =
			StoreDescriptor { base_url, timeout: self.timeout.unwrap_or(defaults.timeout) };

		descriptor.validate()?;

		Ok(descriptor)
	}
}
