//! End-to-end run orchestration.
//!
//! token → {categories, subscribers} → magazine fan-out → coverage → answer. Both fan-outs
//! gather every result before the next stage starts, and any failure aborts the run before
//! an answer is submitted.

// crates.io
use futures::future;
// self
use crate::{
	_prelude::*,
	api::AnswerVerdict,
	client::StoreClient,
	coverage::MagazineIndex,
	http::StoreHttpClient,
	model::{CategorySet, CoverageResult, SessionToken},
	obs::{self, Stage, StageOutcome, StageSpan},
};

/// Everything computed before submission.
#[derive(Clone, Debug)]
pub struct CoverageReport {
	/// Session token the run was scoped to.
	pub token: SessionToken,
	/// Categories judged.
	pub categories: CategorySet,
	/// Number of subscribers evaluated.
	pub subscriber_count: usize,
	/// Number of magazines fetched across all categories.
	pub magazine_count: usize,
	/// Subscribers covering every category.
	pub result: CoverageResult,
}

/// Outcome of a full run.
#[derive(Clone, Debug)]
pub struct RunReport {
	/// Pre-submission computation.
	pub coverage: CoverageReport,
	/// Verdict returned by the service.
	pub verdict: AnswerVerdict,
}

impl<C> StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	/// Fetches everything and evaluates coverage without submitting.
	pub async fn compute_coverage(&self) -> Result<CoverageReport> {
		let token = self.fetch_token().await?;
		let (categories, subscribers) =
			future::try_join(self.fetch_categories(&token), self.fetch_subscribers(&token)).await?;
		let magazines = self.fetch_magazines(&token, &categories).await?;
		let result = {
			let span = StageSpan::new(Stage::Coverage);
			let _guard = span.clone().entered();

			obs::record_stage_outcome(Stage::Coverage, StageOutcome::Attempt);

			let result =
				MagazineIndex::build(&categories, &magazines).covered_subscribers(&subscribers);

			obs::record_count(Stage::Coverage, result.len());
			span.record_outcome(StageOutcome::Success);
			obs::record_stage_outcome(Stage::Coverage, StageOutcome::Success);

			#[cfg(feature = "tracing")]
			tracing::info!(
				categories = categories.len(),
				subscribers = subscribers.len(),
				qualifying = result.len(),
				"Coverage evaluated."
			);

			result
		};

		Ok(CoverageReport {
			token,
			categories,
			subscriber_count: subscribers.len(),
			magazine_count: magazines.len(),
			result,
		})
	}

	/// Runs the whole pipeline and submits the answer.
	pub async fn run(&self) -> Result<RunReport> {
		let coverage = self.compute_coverage().await?;
		let verdict = self.submit_answer(&coverage.token, &coverage.result).await?;

		Ok(RunReport { coverage, verdict })
	}
}

#[cfg(test)]
mod tests {
	// self
	use crate::{_preludet::*, api::Endpoint, error::TransportError, http::HttpMethod};

	const X: &str = "00000000-0000-0000-0000-00000000000a";
	const Y: &str = "00000000-0000-0000-0000-00000000000b";
	const Z: &str = "00000000-0000-0000-0000-00000000000c";

	fn store() -> MockTransport {
		MockTransport::default()
			.get("/api/token", r#"{"success":true,"token":"t","message":null}"#)
			.get("/api/categories/t", ok_envelope("t", r#"["A","B"]"#))
			.get(
				"/api/subscribers/t",
				ok_envelope(
					"t",
					&format!(
						r#"[{{"id":"{X}","magazineIds":[1,3]}},{{"id":"{Y}","magazineIds":[1,2]}},{{"id":"{Z}","magazineIds":[]}}]"#
					),
				),
			)
			.get(
				"/api/magazines/t/A",
				ok_envelope(
					"t",
					r#"[{"id":1,"name":"a1","category":"A"},{"id":2,"name":"a2","category":"A"}]"#,
				),
			)
	}

	fn b_magazines() -> String {
		ok_envelope("t", r#"[{"id":3,"name":"b3","category":"B"}]"#)
	}

	#[tokio::test]
	async fn run_submits_only_covering_subscribers() {
		let transport = Arc::new(
			store()
				.get("/api/magazines/t/B", b_magazines())
				.post(
					"/api/answer/t",
					ok_envelope("t", r#"{"totalTime":"2.0","answerCorrect":true}"#),
				),
		);
		let report = mock_client(transport.clone()).run().await.expect("Run should succeed.");

		assert_eq!(report.coverage.subscriber_count, 3);
		assert_eq!(report.coverage.magazine_count, 3);
		assert_eq!(
			report.coverage.result.to_sorted_vec(),
			[X.parse::<Uuid>().expect("Fixture UUID should parse.")]
		);
		assert!(report.verdict.answer_correct);

		let posts = transport
			.calls()
			.into_iter()
			.filter(|call| call.method == HttpMethod::Post)
			.collect::<Vec<_>>();

		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0].body, Some(format!(r#"{{"subscribers":["{X}"]}}"#)));
	}

	#[tokio::test]
	async fn failing_magazine_fetch_aborts_before_submission() {
		let transport = Arc::new(
			store()
				.reply(
					HttpMethod::Get,
					"/api/magazines/t/B",
					MockReply::Fail(|| TransportError::Status { status: 502 }),
				)
				.post(
					"/api/answer/t",
					ok_envelope("t", r#"{"totalTime":"2.0","answerCorrect":true}"#),
				),
		);
		let err = mock_client(transport.clone()).run().await.expect_err("Run must abort.");

		assert_eq!(err.endpoint(), Some(Endpoint::Magazines));
		assert!(transport.paths(HttpMethod::Post).is_empty(), "No answer may be submitted.");
	}

	#[tokio::test]
	async fn failed_token_stops_every_later_call() {
		let transport = Arc::new(
			MockTransport::default().get("/api/token", failed_envelope("Service unavailable")),
		);
		let err = mock_client(transport.clone()).run().await.expect_err("Run must abort.");

		assert_eq!(err.to_string(), "The token endpoint reported a failure: Service unavailable.");
		assert_eq!(transport.calls().len(), 1);
	}

	#[tokio::test]
	async fn category_with_no_magazines_yields_empty_answer() {
		let transport = Arc::new(
			store()
				.get("/api/magazines/t/B", ok_envelope("t", "[]"))
				.post(
					"/api/answer/t",
					ok_envelope("t", r#"{"totalTime":"2.0","answerCorrect":true}"#),
				),
		);
		let report =
			mock_client(transport.clone()).run().await.expect("Run should still submit.");

		assert!(report.coverage.result.is_empty());
		assert_eq!(
			transport.paths(HttpMethod::Post),
			["/api/answer/t"],
			"Empty answers are still submitted."
		);
		assert_eq!(
			transport.calls().last().and_then(|call| call.body.clone()).as_deref(),
			Some(r#"{"subscribers":[]}"#)
		);
	}

	#[tokio::test]
	async fn compute_coverage_never_posts() {
		let transport = Arc::new(
			store().get("/api/magazines/t/B", b_magazines()),
		);
		let report = mock_client(transport.clone())
			.compute_coverage()
			.await
			.expect("Computation should succeed.");

		assert_eq!(report.categories.len(), 2);
		assert_eq!(report.result.len(), 1);
		assert!(transport.paths(HttpMethod::Post).is_empty());
	}
}
