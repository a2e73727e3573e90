//! Outbound notification seam used to hand the authorization link to the user.

// self
use crate::{_prelude::*, auth::MaskedUserId};

/// Boxed future returned by [`AuthNotifier::notify`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + 'a + Send>>;

/// Delivers an [`AuthorizationPrompt`] to the user, e.g. by editing the deferred interaction
/// reply.
///
/// The broker awaits the delivery before it starts polling, so the user always sees the link
/// before the deadline starts being spent on probes.
pub trait AuthNotifier
where
	Self: Send + Sync,
{
	/// Sends the prompt; called exactly once per authorization attempt.
	fn notify<'a>(&'a self, prompt: &'a AuthorizationPrompt) -> NotifyFuture<'a>;
}

/// Error surfaced by [`AuthNotifier`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum NotifyError {
	/// The prompt could not be delivered.
	#[error("Failed to deliver the authorization prompt: {message}.")]
	Delivery {
		/// Human-readable error payload.
		message: String,
	},
}

/// Everything the user needs to finish authorizing elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationPrompt {
	/// Correlation value the callback will present; it stands in for the Discord user id.
	pub masked_id: MaskedUserId,
	/// Link the user should open.
	pub authorize_url: Url,
	/// Instant the prompt was issued.
	pub issued_at: OffsetDateTime,
	/// Instant after which the broker stops waiting.
	pub expires_at: OffsetDateTime,
}
impl AuthorizationPrompt {
	/// Renders the message shown to the user.
	pub fn message(&self) -> String {
		format!("Please click on this link to get your Meetup Auth token: <{}>", self.authorize_url)
	}
}
