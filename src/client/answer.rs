//! Answer submission.

// self
use crate::{
	_prelude::*,
	api::{AnswerResponse, AnswerSubmission, AnswerVerdict, Endpoint},
	client::StoreClient,
	http::{HttpRequest, StoreHttpClient},
	model::{CoverageResult, SessionToken},
	obs::{self, Stage},
};

impl<C> StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	/// Posts the qualifying subscriber ids and relays the service's verdict unmodified.
	///
	/// Ids are submitted in ascending order; the service treats them as a set.
	pub async fn submit_answer(
		&self,
		token: &SessionToken,
		result: &CoverageResult,
	) -> Result<AnswerVerdict> {
		obs::observe(Stage::Answer, self.request_answer(token, result)).await
	}

	async fn request_answer(
		&self,
		token: &SessionToken,
		result: &CoverageResult,
	) -> Result<AnswerVerdict> {
		let url = self.endpoint_url(Endpoint::Answer, &[token.expose()])?;
		let submission = AnswerSubmission { subscribers: result.to_sorted_vec() };
		let body = serde_json::to_vec(&submission).map_err(Error::Encode)?;
		let verdict = self.call::<AnswerResponse>(HttpRequest::post_json(url, body)).await?;

		obs::record_count(Stage::Answer, submission.subscribers.len());

		#[cfg(feature = "tracing")]
		tracing::info!(
			submitted = submission.subscribers.len(),
			answer_correct = verdict.answer_correct,
			total_time = verdict.total_time.as_deref().unwrap_or_default(),
			"Answer submitted."
		);

		Ok(verdict)
	}
}
