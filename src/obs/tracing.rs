// self
use crate::{
	_prelude::*,
	auth::DiscordUserId,
	obs::{FlowKind, FlowOutcome},
};

/// Resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Emits a `tracing` event at the given level; compiles to nothing without the feature.
macro_rules! broker_event {
	($level:ident, $($arg:tt)+) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::$level!($($arg)+);
		}
	};
}
pub(crate) use broker_event;

/// Span around one broker flow.
///
/// Spans are named `meetup_token_broker.flow` and carry `flow` and `stage` up front. The fields
/// `user` (a fingerprint, never the raw id), `probes`, `prompted` and `outcome` start empty and
/// are filled in as the flow progresses.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind` at `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"meetup_token_broker.flow",
				flow = kind.as_str(),
				stage,
				user = tracing::field::Empty,
				probes = tracing::field::Empty,
				prompted = tracing::field::Empty,
				outcome = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Tags the span with the fingerprint of the user the flow runs for.
	pub fn record_user(&self, user: &DiscordUserId) {
		#[cfg(feature = "tracing")]
		self.span.record("user", user.fingerprint().as_str());

		#[cfg(not(feature = "tracing"))]
		let _ = user;
	}

	/// Records how many cache probes the flow issued.
	pub fn record_probes(&self, probes: u32) {
		#[cfg(feature = "tracing")]
		self.span.record("probes", probes);

		#[cfg(not(feature = "tracing"))]
		let _ = probes;
	}

	/// Marks that an authorization link was delivered during this flow.
	pub fn record_prompted(&self) {
		#[cfg(feature = "tracing")]
		self.span.record("prompted", true);
	}

	/// Records how the flow ended.
	pub fn record_outcome(&self, outcome: FlowOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());

		#[cfg(not(feature = "tracing"))]
		let _ = outcome;
	}

	/// Enters the span for a synchronous section.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
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

/// Guard returned by [`FlowSpan::entered`].
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}
