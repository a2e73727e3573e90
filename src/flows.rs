//! Token broker: resolves a Meetup access token for a Discord user, running the masked-identity
//! authorization exchange when none is cached yet.

pub mod common;
pub mod config;
pub mod notify;

mod acquire;
mod callback;
mod metrics;

pub use self::{config::*, metrics::BrokerMetrics, notify::*};

// self
use crate::{
	_prelude::*,
	auth::DiscordUserId,
	cache::{KeyValueCache, MemoryCache},
};

/// Coordinates token lookup, masked-identity issuance, and polling for a single provider.
///
/// The broker owns a handle to the cache shared with the OAuth callback, so flows only need the
/// caller's identity and a way to reach the user. Concurrent acquisitions for the same user are
/// serialized behind a per-user guard; the followers reuse whatever token the leader obtained.
#[derive(Clone)]
pub struct Broker {
	/// Cache shared with the OAuth callback that deposits tokens.
	pub cache: Arc<dyn KeyValueCache>,
	/// Poll timing, authorization link layout, and mint policy.
	pub config: BrokerConfig,
	/// Shared counters for acquisition outcomes.
	pub metrics: Arc<BrokerMetrics>,
	flow_guards: Arc<Mutex<HashMap<DiscordUserId, Arc<AsyncMutex<()>>>>>,
}
impl Broker {
	/// Creates a broker over the provided cache handle.
	pub fn new(cache: Arc<dyn KeyValueCache>, config: BrokerConfig) -> Self {
		Self { cache, config, metrics: Default::default(), flow_guards: Default::default() }
	}

	/// Creates a broker over the process-wide [`MemoryCache`].
	pub fn shared(config: BrokerConfig) -> Self {
		let cache: Arc<dyn KeyValueCache> = MemoryCache::shared();

		Self::new(cache, config)
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("config", &self.config)
			.field("metrics", &self.metrics)
			.finish()
	}
}
