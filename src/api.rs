//! Wire shapes for the magazine store endpoints.
//!
//! Every endpoint answers with the same `{success, token, message}` envelope plus an
//! endpoint-specific `data` payload. Each endpoint gets its own response type embedding
//! [`ResponseStatus`]; [`ServiceResponse::into_outcome`] turns a decoded response into a
//! tagged [`Outcome`] so callers only ever see an unwrapped payload or a typed failure.

// self
use crate::{
	_prelude::*,
	error::DecodeError,
	model::{Category, Magazine, SessionToken, Subscriber, SubscriberId},
};

/// Remote endpoints exposed by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// `GET token`.
	Token,
	/// `GET categories/{token}`.
	Categories,
	/// `GET subscribers/{token}`.
	Subscribers,
	/// `GET magazines/{token}/{category}`.
	Magazines,
	/// `POST answer/{token}`.
	Answer,
}
impl Endpoint {
	/// Returns the leading path segment, also used as a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Token => "token",
			Endpoint::Categories => "categories",
			Endpoint::Subscribers => "subscribers",
			Endpoint::Magazines => "magazines",
			Endpoint::Answer => "answer",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Envelope fields shared by every response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
	/// Domain-level success flag.
	pub success: bool,
	/// Session token echoed by the service.
	#[serde(default)]
	pub token: Option<String>,
	/// Service-provided message, usually set on failure.
	#[serde(default)]
	pub message: Option<String>,
}

/// Tagged result of a decoded response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
	/// The service reported success and carried a payload.
	Success(T),
	/// The service reported `success=false`.
	Failure {
		/// Service-provided message, if any.
		message: Option<String>,
	},
}

/// Per-endpoint response contract.
pub trait ServiceResponse
where
	Self: Sized + for<'de> Deserialize<'de>,
{
	/// Payload handed to callers on success.
	type Payload;

	/// Endpoint this response belongs to.
	const ENDPOINT: Endpoint;

	/// Shared envelope fields.
	fn status(&self) -> &ResponseStatus;

	/// Extracts the payload from a successful response.
	fn into_payload(self) -> Result<Self::Payload, DecodeError>;

	/// Splits the response into its success payload or failure message.
	fn into_outcome(self) -> Result<Outcome<Self::Payload>, DecodeError> {
		if self.status().success {
			self.into_payload().map(Outcome::Success)
		} else {
			Ok(Outcome::Failure { message: self.status().message.clone() })
		}
	}
}

/// Decodes `body` into `R`, reporting the JSON path of any mismatch.
pub fn decode<R>(body: &[u8]) -> Result<R, DecodeError>
where
	R: ServiceResponse,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	Ok(serde_path_to_error::deserialize(&mut de)?)
}

/// `GET token` response.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Envelope fields; the token itself lives here.
	#[serde(flatten)]
	pub status: ResponseStatus,
}
impl ServiceResponse for TokenResponse {
	type Payload = SessionToken;

	const ENDPOINT: Endpoint = Endpoint::Token;

	fn status(&self) -> &ResponseStatus {
		&self.status
	}

	fn into_payload(self) -> Result<Self::Payload, DecodeError> {
		Ok(SessionToken::new(self.status.token.unwrap_or_default())?)
	}
}

macro_rules! def_data_response {
	($name:ident, $endpoint:ident, $payload:ty, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, Debug, Deserialize)]
		pub struct $name {
			/// Envelope fields.
			#[serde(flatten)]
			pub status: ResponseStatus,
			/// Payload; absent on most failures.
			#[serde(default)]
			pub data: Option<$payload>,
		}
		impl ServiceResponse for $name {
			type Payload = $payload;

			const ENDPOINT: Endpoint = Endpoint::$endpoint;

			fn status(&self) -> &ResponseStatus {
				&self.status
			}

			fn into_payload(self) -> Result<Self::Payload, DecodeError> {
				self.data.ok_or(DecodeError::MissingPayload)
			}
		}
	};
}

def_data_response! { CategoriesResponse, Categories, Vec<Category>, "`GET categories/{token}` response." }
def_data_response! { SubscribersResponse, Subscribers, Vec<Subscriber>, "`GET subscribers/{token}` response." }
def_data_response! { MagazinesResponse, Magazines, Vec<Magazine>, "`GET magazines/{token}/{category}` response." }
def_data_response! { AnswerResponse, Answer, AnswerVerdict, "`POST answer/{token}` response." }

/// Body posted to `answer/{token}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerSubmission {
	/// Qualifying subscriber ids.
	pub subscribers: Vec<SubscriberId>,
}

/// Service verdict on a submitted answer, relayed to the caller unmodified.
///
/// Absent optional fields stay absent when re-serialized, and fields this crate does not
/// model are kept in [`AnswerVerdict::extra`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerVerdict {
	/// Time the service measured for the run.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_time: Option<String>,
	/// Whether the submitted set matched the expected answer.
	pub answer_correct: bool,
	/// Expected subscriber ids, reported when the answer was wrong.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub should_be: Option<Vec<String>>,
	/// Any other fields the service returned.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}
