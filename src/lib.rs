//! Masked-identity token broker: hand a Discord user a Meetup authorization link, then resume
//! the original interaction once an out-of-band callback deposits their access token in a shared
//! key-value cache.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod error;
pub mod flows;
pub mod obs;
pub mod poll;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::AccessToken,
		cache::{KeyValueCache, MemoryCache},
		flows::{
			AuthNotifier, AuthorizationPrompt, AuthorizeLink, Broker, BrokerConfig, NotifyError,
			NotifyFuture,
		},
		poll::PollConfig,
	};

	/// Authorization endpoint used by test fixtures.
	pub const TEST_AUTHORIZE_ENDPOINT: &str = "https://auth.example.com/oauth/meetup";

	/// Builds a [`BrokerConfig`] that polls every `interval_ms` until `timeout_ms` elapses.
	pub fn test_broker_config(timeout_ms: u64, interval_ms: u64) -> BrokerConfig {
		let endpoint = Url::parse(TEST_AUTHORIZE_ENDPOINT)
			.expect("Test authorization endpoint should parse successfully.");

		BrokerConfig::new(AuthorizeLink::new(endpoint)).with_poll(PollConfig {
			timeout_ms,
			interval_ms,
			..PollConfig::default()
		})
	}

	/// Constructs a [`Broker`] backed by a fresh (non-shared) [`MemoryCache`].
	pub fn build_test_broker(config: BrokerConfig) -> (Broker, Arc<MemoryCache>) {
		let backend = Arc::new(MemoryCache::default());
		let cache: Arc<dyn KeyValueCache> = backend.clone();

		(Broker::new(cache, config), backend)
	}

	/// Notifier that records every delivered prompt, or fails every delivery when built with
	/// [`RecordingNotifier::failing`].
	#[derive(Clone, Debug, Default)]
	pub struct RecordingNotifier {
		prompts: Arc<Mutex<Vec<AuthorizationPrompt>>>,
		fail_with: Option<String>,
	}
	impl RecordingNotifier {
		/// Creates a notifier whose deliveries always fail with `message`.
		pub fn failing(message: impl Into<String>) -> Self {
			Self { fail_with: Some(message.into()), ..Default::default() }
		}

		/// Returns every prompt delivered so far.
		pub fn prompts(&self) -> Vec<AuthorizationPrompt> {
			self.prompts.lock().clone()
		}

		/// Returns the most recent prompt, if any.
		pub fn last_prompt(&self) -> Option<AuthorizationPrompt> {
			self.prompts.lock().last().cloned()
		}
	}
	impl AuthNotifier for RecordingNotifier {
		fn notify<'a>(&'a self, prompt: &'a AuthorizationPrompt) -> NotifyFuture<'a> {
			Box::pin(async move {
				if let Some(message) = &self.fail_with {
					return Err(NotifyError::Delivery { message: message.clone() });
				}

				self.prompts.lock().push(prompt.clone());

				Ok(())
			})
		}
	}

	/// Simulates the external OAuth callback writing `token` for whoever owns the newest prompt.
	pub async fn complete_last_prompt(
		broker: &Broker,
		notifier: &RecordingNotifier,
		token: &str,
	) -> Result<()> {
		let prompt = notifier.last_prompt().expect("A prompt should have been delivered.");

		broker.complete_authorization(&prompt.masked_id, AccessToken::new(token)).await?;

		Ok(())
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use {color_eyre as _, meetup_token_broker as _};
