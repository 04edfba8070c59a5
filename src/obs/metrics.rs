// self
use crate::obs::{Stage, StageOutcome};

/// Counts an attempt, success, or failure of `stage` on `magazine_coverage_stage_total`.
pub fn record_stage_outcome(stage: Stage, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"magazine_coverage_stage_total",
		"stage" => stage.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (stage, outcome);
}

/// Records how many items `stage` produced on the `magazine_coverage_stage_items` histogram.
///
/// Categories, subscribers, and magazines report what was fetched; coverage reports the
/// number of qualifying subscribers.
pub fn record_stage_items(stage: Stage, count: usize) {
	#[cfg(feature = "metrics")]
	metrics::histogram!("magazine_coverage_stage_items", "stage" => stage.as_str())
		.record(count as f64);
	#[cfg(not(feature = "metrics"))]
	let _ = (stage, count);
}
