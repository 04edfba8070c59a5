//! Client-level error types shared across fetchers, the coverage pipeline, and the submitter.

// self
use crate::{_prelude::*, api::Endpoint};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant is terminal for a run; nothing is retried or recovered locally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The call never produced a usable HTTP response.
	#[error("Transport failure while calling the {endpoint} endpoint.")]
	Transport {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The service answered with `success=false`.
	#[error("The {endpoint} endpoint reported a failure: {message}.")]
	Service {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Service-provided failure message.
		message: String,
	},
	/// The response body could not be decoded into the expected shape.
	#[error("The {endpoint} endpoint returned a malformed payload.")]
	Decode {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Structured decoding failure.
		#[source]
		source: DecodeError,
	},
	/// The answer body could not be serialized.
	#[error("Answer submission could not be encoded.")]
	Encode(#[source] serde_json::Error),
}
impl Error {
	/// Returns the endpoint the failure is attributed to, when there is one.
	pub fn endpoint(&self) -> Option<Endpoint> {
		match self {
			Self::Transport { endpoint, .. }
			| Self::Service { endpoint, .. }
			| Self::Decode { endpoint, .. } => Some(*endpoint),
			Self::Config(_) | Self::Encode(_) => None,
		}
	}

	pub(crate) fn transport(endpoint: Endpoint, source: TransportError) -> Self {
		Self::Transport { endpoint, source }
	}

	pub(crate) fn decode(endpoint: Endpoint, source: impl Into<DecodeError>) -> Self {
		Self::Decode { endpoint, source: source.into() }
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Descriptor validation failed.
	#[error(transparent)]
	Descriptor(#[from] crate::descriptor::StoreDescriptorError),
	/// Base URL cannot carry the path segments for the endpoint.
	#[error("Base URL `{url}` cannot carry path segments.")]
	CannotBeABase {
		/// Offending base URL.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, deadline, non-2xx status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred: {source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The call exceeded the configured deadline.
	#[error("Request exceeded the configured deadline.")]
	Timeout,
	/// The service answered with a non-2xx HTTP status.
	#[error("Service responded with HTTP status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Payload decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON for the endpoint's shape.
	#[error("Response body does not match the expected shape at `{}`.", .0.path())]
	Json(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// A successful envelope omitted its `data` field.
	#[error("Successful response is missing its `data` payload.")]
	MissingPayload,
	/// A successful envelope carried an unusable session token.
	#[error("Session token is invalid.")]
	InvalidToken(#[from] crate::model::TokenError),
}
