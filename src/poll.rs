//! Bounded poller that waits for a probe to yield a value or for a deadline to pass.
//!
//! The first probe runs immediately so an already-present value never costs an interval. Later
//! probes run once per interval, with the final probe clamped to the deadline itself; the poller
//! gives up only after a probe at or past the deadline comes back empty.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::time::{self, Instant};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, broker_event},
};

/// Timing and messaging for a bounded poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PollConfig {
	/// Total time budget, in milliseconds.
	pub timeout_ms: u64,
	/// Delay between probes, in milliseconds.
	pub interval_ms: u64,
	/// Message carried by [`Error::Timeout`] when the budget runs out.
	pub message: String,
}
impl PollConfig {
	/// Default time budget (one minute).
	pub const DEFAULT_TIMEOUT_MS: u64 = 60 * 1_000;
	/// Default delay between probes (one second).
	pub const DEFAULT_INTERVAL_MS: u64 = 1_000;
	/// Default timeout message shown to the end user.
	pub const DEFAULT_MESSAGE: &'static str =
		"Timeout waiting for Meetup authentication. Please try again";

	/// Creates a config from raw millisecond values.
	pub fn new(timeout_ms: u64, interval_ms: u64, message: impl Into<String>) -> Self {
		Self { timeout_ms, interval_ms, message: message.into() }
	}

	/// Total time budget.
	pub fn timeout(&self) -> StdDuration {
		StdDuration::from_millis(self.timeout_ms)
	}

	/// Delay between probes.
	pub fn interval(&self) -> StdDuration {
		StdDuration::from_millis(self.interval_ms)
	}

	/// Rejects configurations that could never probe on a cadence.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.interval_ms == 0 {
			return Err(ConfigError::ZeroPollInterval);
		}
		if self.interval_ms > self.timeout_ms {
			return Err(ConfigError::PollIntervalExceedsTimeout {
				interval_ms: self.interval_ms,
				timeout_ms: self.timeout_ms,
			});
		}

		Ok(())
	}

	pub(crate) fn timeout_error(&self) -> Error {
		Error::Timeout { message: self.message.clone() }
	}
}
impl Default for PollConfig {
	fn default() -> Self {
		Self::new(Self::DEFAULT_TIMEOUT_MS, Self::DEFAULT_INTERVAL_MS, Self::DEFAULT_MESSAGE)
	}
}

/// Repeatedly awaits `probe` until it yields `Some`, failing with [`Error::Timeout`] once
/// `config.timeout_ms` has elapsed.
///
/// Probe errors abort the poll immediately. There is no external cancel signal; drop the
/// returned future to stop polling early.
pub async fn poll_until<T, F, Fut>(config: &PollConfig, probe: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<Option<T>>>,
{
	poll_until_deadline(config, Instant::now() + config.timeout(), probe).await
}

/// Same as [`poll_until`], but gives up at an absolute `deadline` instead of one derived from
/// `config.timeout_ms`, so a caller that already spent part of its budget can poll for the rest.
///
/// The config is validated first; a zero interval is rejected with [`Error::Config`] rather than
/// probing in a tight loop.
pub async fn poll_until_deadline<T, F, Fut>(
	config: &PollConfig,
	deadline: Instant,
	mut probe: F,
) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<Option<T>>>,
{
	const KIND: FlowKind = FlowKind::Poll;

	config.validate()?;

	let span = FlowSpan::new(KIND, "poll_until");

	obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

	let (result, probes) = span
		.instrument(async move {
			let interval = config.interval();
			let mut probes = 0_u32;

			loop {
				probes += 1;

				match probe().await {
					Ok(Some(value)) => {
						broker_event!(debug, probes, "Poll observed a value.");

						return (Ok(value), probes);
					},
					Ok(None) => (),
					Err(e) => return (Err(e), probes),
				}

				let now = Instant::now();

				if now >= deadline {
					broker_event!(info, probes, "Poll deadline elapsed without a value.");

					return (Err(config.timeout_error()), probes);
				}

				time::sleep_until((now + interval).min(deadline)).await;
			}
		})
		.await;
	let outcome = FlowOutcome::of(&result);

	span.record_probes(probes);
	span.record_outcome(outcome);
	obs::record_poll_probes(probes, outcome);
	obs::record_flow_outcome(KIND, outcome);

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_the_meetup_prompt() {
		let config = PollConfig::default();

		assert_eq!(config.timeout(), StdDuration::from_secs(60));
		assert_eq!(config.interval(), StdDuration::from_secs(1));
		assert_eq!(config.message, "Timeout waiting for Meetup authentication. Please try again");
		assert!(config.validate().is_ok());
	}

	#[test]
	fn validate_rejects_degenerate_cadence() {
		assert!(matches!(
			PollConfig::new(1_000, 0, "m").validate(),
			Err(ConfigError::ZeroPollInterval)
		));
		assert!(matches!(
			PollConfig::new(1_000, 5_000, "m").validate(),
			Err(ConfigError::PollIntervalExceedsTimeout { interval_ms: 5_000, timeout_ms: 1_000 })
		));
	}

	#[test]
	fn config_uses_camel_case_fields() {
		let config: PollConfig =
			serde_json::from_str(r#"{"timeoutMs":5000,"intervalMs":250,"message":"retry"}"#)
				.expect("Poll config should deserialize from camelCase JSON.");

		assert_eq!(config, PollConfig::new(5_000, 250, "retry"));

		let partial: PollConfig = serde_json::from_str(r#"{"intervalMs":500}"#)
			.expect("Missing fields should fall back to defaults.");

		assert_eq!(partial.timeout_ms, PollConfig::DEFAULT_TIMEOUT_MS);
		assert_eq!(partial.interval_ms, 500);
	}

	#[tokio::test(start_paused = true)]
	async fn probe_errors_abort_immediately() {
		let config = PollConfig::new(10_000, 1_000, "timeout");
		let started = Instant::now();
		let err = poll_until(&config, || async {
			Err::<Option<()>, _>(Error::from(crate::cache::CacheError::Backend {
				message: "down".into(),
			}))
		})
		.await
		.expect_err("Probe failures should propagate.");

		assert!(matches!(err, Error::Cache(_)));
		assert_eq!(started.elapsed(), StdDuration::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn zero_interval_is_rejected_without_probing() {
		let config = PollConfig::new(1_000, 0, "timeout");
		let mut probes = 0_u32;
		let err = poll_until(&config, || {
			probes += 1;

			async { Ok(None::<()>) }
		})
		.await
		.expect_err("A zero interval must not spin on the probe.");

		assert!(matches!(err, Error::Config(ConfigError::ZeroPollInterval)));
		assert_eq!(probes, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn deadline_in_the_past_still_probes_once() {
		let config = PollConfig::new(10_000, 1_000, "spent");
		let started = Instant::now();
		let mut probes = 0_u32;
		let err = poll_until_deadline(&config, started, || {
			probes += 1;

			async { Ok(None::<()>) }
		})
		.await
		.expect_err("An exhausted budget should time out after the first probe.");

		assert!(matches!(err, Error::Timeout { ref message } if message == "spent"));
		assert_eq!(probes, 1);
		assert_eq!(started.elapsed(), StdDuration::ZERO);
	}
}
