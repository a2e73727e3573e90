//! Token acquisition with masked-identity authorization and single-flight guards.
//!
//! [`Broker::acquire_token`] first looks for `{user}-meetup-accessToken`. On a miss it mints a
//! masked identifier, records `maskedUserId-{masked} → user` with an exclusive set, delivers the
//! authorization link, and only then polls the cache until the callback deposits the token or
//! the configured deadline passes.
//!
//! The deadline is fixed when a request arrives. A request that finds another attempt for the
//! same user in flight waits for that attempt within its own deadline and then reuses the token
//! it produced; it never restarts the full poll budget.

// crates.io
use tokio::time::{self as tokio_time, Instant};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, DiscordUserId, MaskedUserId},
	cache::keys,
	flows::{AuthNotifier, AuthorizationPrompt, Broker, common::{self, FlowGuard}},
	obs::{self, FlowKind, FlowOutcome, FlowSpan, broker_event},
	poll,
};

impl Broker {
	/// Resolves a Meetup access token for `user`, prompting through `notifier` when none is
	/// cached.
	///
	/// Fails with [`Error::Timeout`] (carrying the configured message) when the callback does not
	/// deposit a token in time. Cache faults and delivery failures propagate unchanged.
	pub async fn acquire_token(
		&self,
		user: &DiscordUserId,
		notifier: &dyn AuthNotifier,
	) -> Result<AccessToken> {
		const KIND: FlowKind = FlowKind::Acquire;

		let span = FlowSpan::new(KIND, "acquire_token");

		span.record_user(user);
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span.instrument(self.acquire_inner(user, notifier, &span)).await;
		let outcome = FlowOutcome::of(&result);

		match outcome {
			FlowOutcome::Success => self.metrics.record_success(),
			FlowOutcome::Timeout => {
				self.metrics.record_timeout();
				self.metrics.record_failure();
			},
			_ => self.metrics.record_failure(),
		}

		span.record_outcome(outcome);
		obs::record_flow_outcome(KIND, outcome);

		result
	}

	/// Same as [`Broker::acquire_token`], but gives up with [`Error::Cancelled`] as soon as
	/// `cancel` resolves (e.g. when the originating interaction expires).
	pub async fn acquire_token_until<C>(
		&self,
		user: &DiscordUserId,
		notifier: &dyn AuthNotifier,
		cancel: C,
	) -> Result<AccessToken>
	where
		C: Future<Output = ()>,
	{
		tokio::select! {
			biased;
			_ = cancel => {
				let span = FlowSpan::new(FlowKind::Acquire, "acquire_token_until");

				span.record_user(user);
				span.record_outcome(FlowOutcome::Cancelled);

				let _entered = span.entered();

				broker_event!(info, "Token acquisition cancelled.");

				self.metrics.record_cancellation();
				self.metrics.record_failure();
				obs::record_flow_outcome(FlowKind::Acquire, FlowOutcome::Cancelled);

				Err(Error::Cancelled)
			},
			result = self.acquire_token(user, notifier) => result,
		}
	}

	/// Resolves a token for `user`, then hands it to `continuation` and returns its output.
	pub async fn with_access_token<F, Fut, T>(
		&self,
		user: &DiscordUserId,
		notifier: &dyn AuthNotifier,
		continuation: F,
	) -> Result<T>
	where
		F: FnOnce(AccessToken) -> Fut,
		Fut: Future<Output = T>,
	{
		let token = self.acquire_token(user, notifier).await?;

		Ok(continuation(token).await)
	}

	async fn acquire_inner(
		&self,
		user: &DiscordUserId,
		notifier: &dyn AuthNotifier,
		span: &FlowSpan,
	) -> Result<AccessToken> {
		self.config.validate()?;

		let poll_config = &self.config.poll;
		let deadline = Instant::now() + poll_config.timeout();

		if let Some(token) = self.reuse_cached(user).await? {
			return Ok(token);
		}

		let guard = FlowGuard::new(self, user);
		let Ok(_singleflight) = tokio_time::timeout_at(deadline, guard.lock()).await else {
			broker_event!(info, "Deadline passed while another attempt for this user was running.");

			return Err(poll_config.timeout_error());
		};

		// A concurrent attempt may have finished while this one waited on the guard.
		if let Some(token) = self.reuse_cached(user).await? {
			return Ok(token);
		}
		// That attempt used up this request's budget without a token.
		if Instant::now() >= deadline {
			return Err(poll_config.timeout_error());
		}

		broker_event!(info, "Token not cached; starting masked authorization.");

		let masked_id = self.mint_masked_id(user).await?;
		let prompt = self.build_prompt(masked_id, deadline);

		notifier.notify(&prompt).await?;
		self.metrics.record_prompt();
		span.record_prompted();
		obs::record_prompt_delivered();

		broker_event!(debug, "Authorization prompt delivered.");

		let key = keys::access_token_key(user);
		let key = key.as_str();
		let cache = self.cache.as_ref();
		let raw = poll::poll_until_deadline(poll_config, deadline, move || async move {
			cache
				.get(key)
				.await
				.map(|value| value.filter(|token| !token.is_empty()))
				.map_err(Error::from)
		})
		.await?;

		broker_event!(info, "Meetup token received.");

		Ok(AccessToken::new(raw))
	}

	async fn reuse_cached(&self, user: &DiscordUserId) -> Result<Option<AccessToken>> {
		let cached = common::cached_token(self, user).await?;

		if cached.is_some() {
			self.metrics.record_cache_hit();
		}

		Ok(cached)
	}

	async fn mint_masked_id(&self, user: &DiscordUserId) -> Result<MaskedUserId> {
		let attempts = self.config.mint_attempts;

		for attempt in 1..=attempts {
			let masked_id = MaskedUserId::generate();
			let key = keys::masked_user_key(&masked_id);

			if self.cache.exclusive_set(&key, user.to_string()).await? {
				return Ok(masked_id);
			}

			broker_event!(warn, attempt, "Masked identifier already mapped; minting another.");

			#[cfg(not(feature = "tracing"))]
			let _ = attempt;
		}

		Err(Error::MintCollision { attempts })
	}

	fn build_prompt(&self, masked_id: MaskedUserId, deadline: Instant) -> AuthorizationPrompt {
		let issued_at = OffsetDateTime::now_utc();
		let remaining = deadline.saturating_duration_since(Instant::now());
		let authorize_url = self.config.authorize.build(&masked_id);

		AuthorizationPrompt {
			masked_id,
			authorize_url,
			issued_at,
			expires_at: issued_at
				.saturating_add(time::Duration::try_from(remaining).unwrap_or(time::Duration::MAX)),
		}
	}
}
