//! Callback-side helpers: resolve a masked identifier and deposit the token where the waiting
//! broker will find it.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, DiscordUserId, MaskedUserId},
	cache::{CacheError, keys},
	flows::{Broker, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan, broker_event},
};

impl Broker {
	/// Looks up which Discord user a masked identifier was issued for.
	pub async fn resolve_masked_user(
		&self,
		masked_id: &MaskedUserId,
	) -> Result<Option<DiscordUserId>> {
		let key = keys::masked_user_key(masked_id);
		let Some(raw) = self.cache.get(&key).await? else {
			return Ok(None);
		};
		let user = DiscordUserId::new(&raw).map_err(|e| CacheError::Serialization {
			message: format!("Entry `{key}` does not hold a valid user id: {e}"),
		})?;

		Ok(Some(user))
	}

	/// Stores `token` for the user behind `masked_id` and retires the masked identifier.
	///
	/// This is what an OAuth callback calls once it has exchanged the authorization code. A
	/// broker polling for that user picks the token up on its next probe.
	pub async fn complete_authorization(
		&self,
		masked_id: &MaskedUserId,
		token: AccessToken,
	) -> Result<DiscordUserId> {
		const KIND: FlowKind = FlowKind::Callback;

		let span = FlowSpan::new(KIND, "complete_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let user = self
					.resolve_masked_user(masked_id)
					.await?
					.ok_or_else(|| Error::UnknownMaskedUser { masked_id: masked_id.to_string() })?;

				self.cache.set(&keys::access_token_key(&user), token.into_inner()).await?;
				self.cache.remove(&keys::masked_user_key(masked_id)).await?;

				broker_event!(info, user = %user.fingerprint(), "Stored Meetup token from callback.");

				Ok(user)
			})
			.await;

		let outcome = FlowOutcome::of(&result);

		if let Ok(user) = &result {
			span.record_user(user);
		}

		span.record_outcome(outcome);
		obs::record_flow_outcome(KIND, outcome);

		result
	}

	/// Returns the cached token for `user` without prompting.
	pub async fn cached_token(&self, user: &DiscordUserId) -> Result<Option<AccessToken>> {
		common::cached_token(self, user).await
	}

	/// Drops the cached token so the next acquisition prompts again (e.g. after the provider
	/// rejected it).
	pub async fn forget_access_token(&self, user: &DiscordUserId) -> Result<()> {
		self.cache.remove(&keys::access_token_key(user)).await?;

		broker_event!(info, user = %user.fingerprint(), "Forgot cached Meetup token.");

		Ok(())
	}
}
