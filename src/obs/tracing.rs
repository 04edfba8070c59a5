// self
use crate::{
	_prelude::*,
	model::Category,
	obs::{Stage, StageOutcome},
};

/// Future returned by [`StageSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`StageSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// Span covering one pipeline stage or one per-category magazine call.
///
/// Stage spans are named `magazine_coverage.stage` and declare `count` and `outcome` up
/// front so both can be filled in once the stage finishes. Category spans are named
/// `magazine_coverage.category` and nest under the magazines stage.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Opens the span for `stage`.
	pub fn new(stage: Stage) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"magazine_coverage.stage",
				stage = stage.as_str(),
				count = tracing::field::Empty,
				outcome = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Opens the span for the magazine call of a single category.
	pub fn category(category: &Category) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!(
				"magazine_coverage.category",
				category = %category,
				count = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = category;

			Self {}
		}
	}

	/// Stores the number of items the stage produced.
	pub fn record_count(&self, count: usize) {
		#[cfg(feature = "tracing")]
		self.span.record("count", count);
		#[cfg(not(feature = "tracing"))]
		let _ = count;
	}

	/// Stores the final outcome label of a stage span.
	pub fn record_outcome(&self, outcome: StageOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());
		#[cfg(not(feature = "tracing"))]
		let _ = outcome;
	}

	/// Enters the span for synchronous sections such as coverage evaluation.
	pub fn entered(self) -> StageSpanGuard {
		#[cfg(feature = "tracing")]
		{
			StageSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			StageSpanGuard {}
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Guard returned by [`StageSpan::entered`]; exits the span on drop.
pub struct StageSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for StageSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("StageSpanGuard(..)")
	}
}
