//! Shared helpers for flow implementations (per-user guards, cached-token lookups).

// crates.io
use async_lock::MutexGuardArc;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, DiscordUserId},
	cache::keys,
	flows::Broker,
};

/// Handle on the per-user single-flight slot.
///
/// Every concurrent acquisition for the same user shares one slot. The slot is dropped from the
/// broker's table once the last handle goes away, so the table only holds users with an attempt
/// in flight.
pub(crate) struct FlowGuard {
	guards: Arc<Mutex<HashMap<DiscordUserId, Arc<AsyncMutex<()>>>>>,
	user: DiscordUserId,
	slot: Arc<AsyncMutex<()>>,
}
impl FlowGuard {
	/// Joins (or opens) the slot for `user`.
	pub(crate) fn new(broker: &Broker, user: &DiscordUserId) -> Self {
		let slot = broker
			.flow_guards
			.lock()
			.entry(user.clone())
			.or_insert_with(|| Arc::new(AsyncMutex::new(())))
			.clone();

		Self { guards: broker.flow_guards.clone(), user: user.clone(), slot }
	}

	/// Waits until no other attempt for this user holds the slot.
	pub(crate) async fn lock(&self) -> MutexGuardArc<()> {
		self.slot.lock_arc().await
	}
}
impl Drop for FlowGuard {
	fn drop(&mut self) {
		let mut guards = self.guards.lock();

		// The table and this handle are the only owners left.
		if Arc::strong_count(&self.slot) == 2
			&& guards.get(&self.user).is_some_and(|slot| Arc::ptr_eq(slot, &self.slot))
		{
			guards.remove(&self.user);
		}
	}
}

/// Reads the cached access token for `user`.
///
/// An empty value counts as absent.
pub async fn cached_token(broker: &Broker, user: &DiscordUserId) -> Result<Option<AccessToken>> {
	let key = keys::access_token_key(user);
	let value = broker.cache.get(&key).await?;

	Ok(value.filter(|token| !token.is_empty()).map(AccessToken::new))
}
