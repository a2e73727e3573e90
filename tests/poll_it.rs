// std
use std::{
	sync::atomic::{AtomicU32, Ordering},
	time::Duration as StdDuration,
};
// crates.io
use tokio::time::Instant;
// self
use meetup_token_broker::{
	_preludet::*,
	poll::{PollConfig, poll_until},
};

fn assert_elapsed(started: Instant, expected_ms: u64) {
	let elapsed = started.elapsed();
	let expected = StdDuration::from_millis(expected_ms);

	assert!(
		elapsed >= expected && elapsed <= expected + StdDuration::from_millis(5),
		"Expected ~{expected:?} to elapse, got {elapsed:?}."
	);
}

#[tokio::test(start_paused = true)]
async fn first_probe_runs_without_waiting() {
	let config = PollConfig::new(60_000, 1_000, "timeout");
	let started = Instant::now();
	let value = poll_until(&config, || async { Ok(Some("TOKX")) })
		.await
		.expect("A present value should resolve immediately.");

	assert_eq!(value, "TOKX");
	assert_eq!(started.elapsed(), StdDuration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn nth_probe_resolves_after_n_minus_one_intervals() {
	let config = PollConfig::new(60_000, 250, "timeout");
	let calls = AtomicU32::new(0);
	let started = Instant::now();
	let value = poll_until(&config, || {
		let call = calls.fetch_add(1, Ordering::SeqCst) + 1;

		async move { Ok((call == 4).then_some(call)) }
	})
	.await
	.expect("The fourth probe should produce a value.");
	let elapsed = started.elapsed();

	assert_eq!(value, 4);
	assert_eq!(calls.load(Ordering::SeqCst), 4);
	assert!(elapsed >= StdDuration::from_millis(750), "Resolved too early: {elapsed:?}.");
	assert!(elapsed <= StdDuration::from_millis(1_000), "Resolved too late: {elapsed:?}.");
}

#[tokio::test(start_paused = true)]
async fn empty_probes_time_out_with_configured_message() {
	let config = PollConfig::new(1_000, 300, "Timeout waiting for Meetup authentication.");
	let calls = AtomicU32::new(0);
	let started = Instant::now();
	let err = poll_until(&config, || {
		calls.fetch_add(1, Ordering::SeqCst);

		async { Ok(None::<String>) }
	})
	.await
	.expect_err("A probe that never yields should time out.");

	match err {
		Error::Timeout { message } =>
			assert_eq!(message, "Timeout waiting for Meetup authentication."),
		other => panic!("Unexpected error: {other:?}"),
	}

	// Probes at 0, 300, 600, 900, and the clamped deadline probe at 1000.
	assert_eq!(calls.load(Ordering::SeqCst), 5);
	assert_elapsed(started, 1_000);
}

#[tokio::test(start_paused = true)]
async fn value_arriving_on_the_deadline_still_wins() {
	let config = PollConfig::new(1_000, 400, "timeout");
	let started = Instant::now();
	let value = poll_until(&config, || {
		let ready = started.elapsed() >= StdDuration::from_millis(1_000);

		async move { Ok(ready.then_some("late")) }
	})
	.await
	.expect("A value observed by the deadline probe should be returned.");

	assert_eq!(value, "late");
	assert_elapsed(started, 1_000);
}
