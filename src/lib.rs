//! One-shot magazine store client: fetch a session token, fan out per-category magazine
//! lookups, find every subscriber that covers all categories, and report the answer back.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod client;
pub mod coverage;
pub mod descriptor;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		client::StoreClient,
		descriptor::StoreDescriptor,
		error::TransportError,
		http::{HttpFuture, HttpMethod, HttpRequest, HttpResponse, StoreHttpClient},
	};

	/// Base URL used by [`MockTransport`]-backed clients.
	pub const MOCK_BASE_URL: &str = "http://store.test/api/";

	/// Canned reply served by [`MockTransport`].
	#[derive(Debug)]
	pub enum MockReply {
		/// Respond with the given status + JSON body.
		Json(u16, String),
		/// Fail the call at the transport layer.
		Fail(fn() -> TransportError),
	}

	/// Request observed by [`MockTransport`].
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct RecordedCall {
		/// HTTP method of the request.
		pub method: HttpMethod,
		/// Path component of the request URL (percent-encoded).
		pub path: String,
		/// Request body, if any.
		pub body: Option<String>,
	}

	/// In-memory transport keyed by `(method, path)` that records every request.
	#[derive(Debug, Default)]
	pub struct MockTransport {
		replies: parking_lot::Mutex<HashMap<(HttpMethod, String), VecDeque<MockReply>>>,
		calls: parking_lot::Mutex<Vec<RecordedCall>>,
	}
	impl MockTransport {
		/// Queues a `200 OK` JSON reply for a GET on `path`.
		pub fn get(self, path: &str, body: impl Into<String>) -> Self {
			self.reply(HttpMethod::Get, path, MockReply::Json(200, body.into()))
		}

		/// Queues a `200 OK` JSON reply for a POST on `path`.
		pub fn post(self, path: &str, body: impl Into<String>) -> Self {
			self.reply(HttpMethod::Post, path, MockReply::Json(200, body.into()))
		}

		/// Queues an arbitrary reply for `method` + `path`.
		pub fn reply(self, method: HttpMethod, path: &str, reply: MockReply) -> Self {
			self.replies.lock().entry((method, path.to_owned())).or_default().push_back(reply);

			self
		}

		/// Returns every request observed so far, in arrival order.
		pub fn calls(&self) -> Vec<RecordedCall> {
			self.calls.lock().clone()
		}

		/// Returns the paths of requests issued with `method`.
		pub fn paths(&self, method: HttpMethod) -> Vec<String> {
			self.calls
				.lock()
				.iter()
				.filter(|call| call.method == method)
				.map(|call| call.path.clone())
				.collect()
		}
	}
	impl StoreHttpClient for MockTransport {
		fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
			let path = request.url.path().to_owned();
			let body = request.body.as_ref().map(|bytes| String::from_utf8_lossy(bytes).into_owned());

			self.calls.lock().push(RecordedCall { method: request.method, path: path.clone(), body });

			let reply = self
				.replies
				.lock()
				.get_mut(&(request.method, path))
				.and_then(VecDeque::pop_front);

			Box::pin(async move {
				match reply {
					Some(MockReply::Json(status, body)) =>
						Ok(HttpResponse { status, body: body.into_bytes() }),
					Some(MockReply::Fail(make)) => Err(make()),
					None => Ok(HttpResponse { status: 404, body: Vec::new() }),
				}
			})
		}
	}

	/// Descriptor pointing at [`MOCK_BASE_URL`].
	pub fn mock_descriptor() -> StoreDescriptor {
		StoreDescriptor::builder()
			.base_url(Url::parse(MOCK_BASE_URL).expect("Mock base URL should parse."))
			.build()
			.expect("Mock descriptor should be valid.")
	}

	/// Builds a [`StoreClient`] over the provided mock transport.
	pub fn mock_client(transport: impl Into<Arc<MockTransport>>) -> StoreClient<MockTransport> {
		StoreClient::with_http_client(mock_descriptor(), transport)
	}

	/// Wraps `data` in a successful response envelope carrying `token`.
	pub fn ok_envelope(token: &str, data: &str) -> String {
		format!(r#"{{"success":true,"token":"{token}","message":null,"data":{data}}}"#)
	}

	/// Builds a failed response envelope carrying `message`.
	pub fn failed_envelope(message: &str) -> String {
		format!(r#"{{"success":false,"token":null,"message":"{message}"}}"#)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeSet, HashMap, HashSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;
	pub use uuid::Uuid;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
#[cfg(feature = "cli")] use {clap as _, color_eyre as _, tokio as _, tracing_subscriber as _};
