//! Broker configuration: poll cadence, authorization link layout, and mint policy.

// self
use crate::{_prelude::*, auth::MaskedUserId, error::ConfigError, poll::PollConfig};

/// Top-level broker configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerConfig {
	/// Layout of the authorization URL handed to the user.
	pub authorize: AuthorizeLink,
	/// How long, and how often, to wait for the callback to deposit a token.
	#[serde(default)]
	pub poll: PollConfig,
	/// Fresh masked identifiers to try before giving up on a collision.
	#[serde(default = "BrokerConfig::default_mint_attempts")]
	pub mint_attempts: u8,
}
impl BrokerConfig {
	const DEFAULT_MINT_ATTEMPTS: u8 = 3;

	/// Creates a config with default polling and mint policy.
	pub fn new(authorize: AuthorizeLink) -> Self {
		Self {
			authorize,
			poll: PollConfig::default(),
			mint_attempts: Self::DEFAULT_MINT_ATTEMPTS,
		}
	}

	/// Parses and validates a JSON configuration document.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(json);
		let config: Self = serde_path_to_error::deserialize(de)?;

		config.validate()?;

		Ok(config)
	}

	/// Overrides the poll configuration.
	pub fn with_poll(mut self, poll: PollConfig) -> Self {
		self.poll = poll;

		self
	}

	/// Overrides the number of mint attempts.
	pub fn with_mint_attempts(mut self, attempts: u8) -> Self {
		self.mint_attempts = attempts;

		self
	}

	/// Checks cross-field constraints.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.poll.validate()?;

		if self.mint_attempts == 0 {
			return Err(ConfigError::ZeroMintAttempts);
		}

		Ok(())
	}

	fn default_mint_attempts() -> u8 {
		Self::DEFAULT_MINT_ATTEMPTS
	}
}

/// Builds the provider authorization URL that carries a masked identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeLink {
	/// Entry point of the OAuth flow (typically the bot's own redirect service).
	pub endpoint: Url,
	/// Provider name passed along to the endpoint.
	#[serde(default = "AuthorizeLink::default_provider")]
	pub provider: String,
	/// Scopes requested from the provider.
	#[serde(default = "AuthorizeLink::default_scopes")]
	pub scopes: Vec<String>,
	/// Query parameter that carries the masked identifier.
	#[serde(default = "AuthorizeLink::default_masked_id_param")]
	pub masked_id_param: String,
}
impl AuthorizeLink {
	/// Creates a Meetup link layout for the given endpoint.
	pub fn new(endpoint: Url) -> Self {
		Self {
			endpoint,
			provider: Self::default_provider(),
			scopes: Self::default_scopes(),
			masked_id_param: Self::default_masked_id_param(),
		}
	}

	/// Replaces the requested scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Renders the URL for one authorization attempt.
	pub fn build(&self, masked_id: &MaskedUserId) -> Url {
		let mut url = self.endpoint.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("provider", &self.provider);
		pairs.append_pair(&self.masked_id_param, masked_id);

		if !self.scopes.is_empty() {
			pairs.append_pair("scope", &self.scopes.join(" "));
		}

		drop(pairs);

		url
	}

	fn default_provider() -> String {
		"meetup".into()
	}

	fn default_scopes() -> Vec<String> {
		vec!["basic".into()]
	}

	fn default_masked_id_param() -> String {
		"tokenId".into()
	}
}
