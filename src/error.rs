//! Broker-level error types shared across the cache, poller, and flows.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Cache-layer failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The authorization prompt could not be delivered.
	#[error(transparent)]
	Notify(#[from] crate::flows::NotifyError),

	/// No token arrived before the poll deadline.
	#[error("{message}")]
	Timeout {
		/// Configured, user-facing timeout message.
		message: String,
	},
	/// Every freshly minted masked identifier was already mapped.
	#[error("Failed to mint a unique masked identifier after {attempts} attempts.")]
	MintCollision {
		/// Number of identifiers tried.
		attempts: u8,
	},
	/// The masked identifier has no pending authorization mapped to it.
	#[error("Masked identifier `{masked_id}` is not linked to any user.")]
	UnknownMaskedUser {
		/// Masked identifier received from the callback.
		masked_id: String,
	},
	/// The caller abandoned the authorization before it completed.
	#[error("Authorization was cancelled before a token arrived.")]
	Cancelled,
}
impl Error {
	/// Returns true when the end user can simply try again.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Timeout { .. } | Self::MintCollision { .. } | Self::Cancelled)
	}

	/// Renders the message an interaction handler should show the end user.
	///
	/// Timeouts already carry a retry instruction, so they are shown verbatim; anything else is
	/// wrapped with a pointer to a moderator.
	pub fn user_message(&self) -> String {
		match self {
			Self::Timeout { message } => message.clone(),
			other => {
				let rendered = other.to_string();

				format!(
					"Error: {}. Please reach out to a moderator for help.",
					rendered.trim_end_matches('.')
				)
			},
		}
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration document could not be parsed.
	#[error("Broker configuration is invalid at `{path}`.")]
	Parse {
		/// Path to the offending field.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},

	/// Poll interval must be positive.
	#[error("Poll interval must be greater than zero.")]
	ZeroPollInterval,
	/// Poll interval must not exceed the poll timeout.
	#[error("Poll interval ({interval_ms}ms) exceeds the poll timeout ({timeout_ms}ms).")]
	PollIntervalExceedsTimeout {
		/// Configured interval.
		interval_ms: u64,
		/// Configured timeout.
		timeout_ms: u64,
	},
	/// At least one mint attempt is required.
	#[error("Mint attempts must be at least one.")]
	ZeroMintAttempts,
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}
