//! Run-scoped store client and the pipeline stages built on it.
//!
//! [`StoreClient`] owns the transport and descriptor for a single run and is passed
//! explicitly to every stage; nothing is held in process-wide state. Each stage issues its
//! calls through one shared `call` helper, which applies the shared response policy: non-2xx
//! statuses are transport failures, bodies are decoded once at the boundary, and
//! `success=false` envelopes become [`Error::Service`] carrying the service message.

pub mod answer;
pub mod catalog;
pub mod pipeline;
pub mod subscribers;
pub mod token;

pub use pipeline::*;

// self
use crate::{
	_prelude::*,
	api::{self, Endpoint, Outcome, ServiceResponse},
	descriptor::StoreDescriptor,
	error::TransportError,
	http::{HttpRequest, StoreHttpClient},
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestStoreClient = StoreClient<ReqwestHttpClient>;

/// Coordinates every call of a run against a single store descriptor.
pub struct StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	/// HTTP client wrapper used for every outbound store request.
	pub http_client: Arc<C>,
	/// Descriptor defining where the store lives and the per-call deadline.
	pub descriptor: StoreDescriptor,
}
impl<C> StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(descriptor: StoreDescriptor, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), descriptor }
	}

	/// Issues `request` and unwraps the endpoint's payload.
	pub(crate) async fn call<R>(&self, request: HttpRequest) -> Result<R::Payload>
	where
		R: ServiceResponse,
	{
		let endpoint = R::ENDPOINT;
		let response = self
			.http_client
			.execute(request)
			.await
			.map_err(|e| Error::transport(endpoint, e))?;

		if !response.is_success() {
			return Err(Error::transport(
				endpoint,
				TransportError::Status { status: response.status },
			));
		}

		let outcome = api::decode::<R>(&response.body)
			.and_then(R::into_outcome)
			.map_err(|e| Error::decode(endpoint, e))?;

		match outcome {
			Outcome::Success(payload) => Ok(payload),
			Outcome::Failure { message } => Err(Error::Service {
				endpoint,
				message: message.unwrap_or_else(|| "no message provided".into()),
			}),
		}
	}

	pub(crate) fn endpoint_url(&self, endpoint: Endpoint, segments: &[&str]) -> Result<Url> {
		Ok(self.descriptor.endpoint_url(endpoint, segments)?)
	}
}
#[cfg(feature = "reqwest")]
impl StoreClient<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport bounded by the descriptor's deadline.
	pub fn new(descriptor: StoreDescriptor) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::from_descriptor(&descriptor)?;

		Ok(Self::with_http_client(descriptor, http_client))
	}
}
impl<C> Clone for StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), descriptor: self.descriptor.clone() }
	}
}
impl<C> Debug for StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StoreClient").field("descriptor", &self.descriptor).finish()
	}
}
