//! Optional observability helpers for broker flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `meetup_token_broker.flow`
//!   with the `flow` and `stage` fields, plus log events at each state transition.
//! - Enable `metrics` to increment the `meetup_token_broker_flow_total` counter (labeled by
//!   `flow` and `outcome`), the `meetup_token_broker_prompts_total` counter, and the
//!   `meetup_token_broker_poll_probes` histogram.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

pub(crate) use self::tracing::broker_event;

// self
use crate::_prelude::*;

/// Broker operations observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Token acquisition on behalf of a Discord interaction.
	Acquire,
	/// Bounded wait for a token to appear.
	Poll,
	/// Callback-side completion of a masked authorization.
	Callback,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Acquire => "acquire",
			FlowKind::Poll => "poll",
			FlowKind::Callback => "callback",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker helper.
	Attempt,
	/// Successful completion.
	Success,
	/// The poll budget ran out before a token appeared.
	Timeout,
	/// The caller abandoned the attempt.
	Cancelled,
	/// Any other failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Timeout => "timeout",
			FlowOutcome::Cancelled => "cancelled",
			FlowOutcome::Failure => "failure",
		}
	}

	/// Classifies a finished flow.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => FlowOutcome::Success,
			Err(Error::Timeout { .. }) => FlowOutcome::Timeout,
			Err(Error::Cancelled) => FlowOutcome::Cancelled,
			Err(_) => FlowOutcome::Failure,
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
