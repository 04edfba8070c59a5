//! Transport primitives for store calls.
//!
//! The module exposes [`StoreHttpClient`], the client's only dependency on an HTTP stack,
//! alongside the plain [`HttpRequest`] / [`HttpResponse`] values passed across it. The
//! transport is responsible for enforcing the descriptor's deadline and for surfacing
//! network failures as [`TransportError`]; status and body interpretation stay with the
//! caller.

// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")]
use crate::{descriptor::StoreDescriptor, error::ConfigError};

/// Boxed future returned by [`StoreHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// HTTP verbs used by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST` with a JSON body.
	Post,
}

/// Outbound request handed to a [`StoreHttpClient`].
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// Request verb.
	pub method: HttpMethod,
	/// Fully resolved endpoint URL.
	pub url: Url,
	/// JSON body for `POST` requests.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Builds a `GET` request.
	pub fn get(url: Url) -> Self {
		Self { method: HttpMethod::Get, url, body: None }
	}

	/// Builds a `POST` request carrying a JSON body.
	pub fn post_json(url: Url, body: Vec<u8>) -> Self {
		Self { method: HttpMethod::Post, url, body: Some(body) }
	}
}

/// Raw response returned by a [`StoreHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of executing store calls.
///
/// Implementations must be `Send + Sync + 'static` so a single client can be shared by
/// every concurrent call of a fan-out, and the returned futures must be `Send`.
pub trait StoreHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes `request`, resolving once the full body has been read.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Thin wrapper around [`reqwest::Client`] so shared HTTP behavior lives in one place.
///
/// Build it with [`ReqwestHttpClient::from_descriptor`] so the descriptor's deadline is
/// applied to every call; a custom client passed to [`ReqwestHttpClient::with_client`]
/// keeps whatever timeout it was configured with.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub reqwest::Client);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self(client)
	}

	/// Builds a client whose calls are bounded by the descriptor's deadline.
	pub fn from_descriptor(descriptor: &StoreDescriptor) -> Result<Self, ConfigError> {
		let client = reqwest::Client::builder().timeout(descriptor.timeout).build()?;

		Ok(Self(client))
	}

	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let builder = match request.method {
			HttpMethod::Get => self.0.get(request.url),
			HttpMethod::Post => self
				.0
				.post(request.url)
				.header(reqwest::header::CONTENT_TYPE, "application/json")
				.body(request.body.unwrap_or_default()),
		};
		let response = builder.send().await?;
		let status = response.status().as_u16();
		let body = response.bytes().await?.to_vec();

		Ok(HttpResponse { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl StoreHttpClient for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(self.send(request))
	}
}
