// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counts one step of a flow under `meetup_token_broker_flow_total{flow, outcome}`.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"meetup_token_broker_flow_total",
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts an authorization link handed to a user.
pub fn record_prompt_delivered() {
	#[cfg(feature = "metrics")]
	metrics::counter!("meetup_token_broker_prompts_total").increment(1);
}

/// Records how many cache probes a finished poll needed, labeled by how it ended.
pub fn record_poll_probes(probes: u32, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::histogram!("meetup_token_broker_poll_probes", "outcome" => outcome.as_str())
		.record(f64::from(probes));

	#[cfg(not(feature = "metrics"))]
	let _ = (probes, outcome);
}
