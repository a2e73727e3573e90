// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token acquisitions.
#[derive(Debug, Default)]
pub struct BrokerMetrics {
	attempts: AtomicU64,
	cache_hits: AtomicU64,
	prompts: AtomicU64,
	success: AtomicU64,
	timeouts: AtomicU64,
	cancellations: AtomicU64,
	failure: AtomicU64,
}
impl BrokerMetrics {
	/// Returns the total number of acquisition attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of acquisitions served straight from the cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of authorization prompts delivered.
	pub fn prompts(&self) -> u64 {
		self.prompts.load(Ordering::Relaxed)
	}

	/// Returns the number of successful acquisitions (including cache hits).
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of acquisitions that timed out waiting for the callback.
	pub fn timeouts(&self) -> u64 {
		self.timeouts.load(Ordering::Relaxed)
	}

	/// Returns the number of acquisitions abandoned through a cancel signal.
	pub fn cancellations(&self) -> u64 {
		self.cancellations.load(Ordering::Relaxed)
	}

	/// Returns the number of failed acquisitions (including timeouts and cancellations).
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_prompt(&self) {
		self.prompts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_timeout(&self) {
		self.timeouts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cancellation(&self) {
		self.cancellations.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
