//! Optional observability helpers for pipeline stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit `magazine_coverage.stage` spans carrying `stage`, `count`, and
//!   `outcome` fields, with a `magazine_coverage.category` child span per magazine call.
//! - Enable `metrics` to increment the `magazine_coverage_stage_total` counter for every
//!   attempt/success/failure (labeled by `stage` + `outcome`) and to record per-stage item
//!   counts on the `magazine_coverage_stage_items` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Session token acquisition.
	Token,
	/// Category retrieval.
	Categories,
	/// Subscriber retrieval.
	Subscribers,
	/// Per-category magazine fan-out.
	Magazines,
	/// Coverage evaluation.
	Coverage,
	/// Answer submission.
	Answer,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Token => "token",
			Stage::Categories => "categories",
			Stage::Subscribers => "subscribers",
			Stage::Magazines => "magazines",
			Stage::Coverage => "coverage",
			Stage::Answer => "answer",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside the stage's span, recording attempt + success/failure outcomes.
pub async fn observe<T, Fut>(stage: Stage, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = StageSpan::new(stage);

	record_stage_outcome(stage, StageOutcome::Attempt);

	let result = span.instrument(fut).await;
	let outcome = match &result {
		Ok(_) => StageOutcome::Success,
		Err(_e) => {
			#[cfg(feature = "tracing")]
			::tracing::warn!(stage = stage.as_str(), error = %_e, "Stage failed.");

			StageOutcome::Failure
		},
	};

	span.record_outcome(outcome);
	record_stage_outcome(stage, outcome);

	result
}

/// Records how many items `stage` produced, on the current span and the items histogram.
///
/// Call it from inside the stage's span so the `count` field lands on that span.
pub fn record_count(stage: Stage, count: usize) {
	#[cfg(feature = "tracing")]
	::tracing::Span::current().record("count", count);

	record_stage_items(stage, count);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::api::Endpoint;

	#[tokio::test]
	async fn counts_are_recorded_inside_the_stage() {
		let subscribers = observe(Stage::Subscribers, async {
			record_count(Stage::Subscribers, 3);

			Ok::<_, Error>(3)
		})
		.await
		.expect("Stage should succeed.");

		assert_eq!(subscribers, 3);
	}

	#[tokio::test]
	async fn observe_passes_results_through() {
		let value = observe(Stage::Coverage, async { Ok::<_, Error>(7) })
			.await
			.expect("Stage should succeed.");

		assert_eq!(value, 7);

		let err = observe(Stage::Answer, async {
			Err::<(), _>(Error::Service { endpoint: Endpoint::Answer, message: "rejected".into() })
		})
		.await
		.expect_err("Stage failure should propagate.");

		assert!(matches!(err, Error::Service { endpoint: Endpoint::Answer, .. }));
	}
}
