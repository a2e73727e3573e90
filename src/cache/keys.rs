//! Cache key layout shared with the OAuth callback; both formats must stay byte-for-byte stable.

// self
use crate::auth::{DiscordUserId, MaskedUserId};

const MASKED_USER_PREFIX: &str = "maskedUserId-";
const ACCESS_TOKEN_SUFFIX: &str = "-meetup-accessToken";

/// Key of the masked-identifier → Discord user mapping.
pub fn masked_user_key(masked_id: &MaskedUserId) -> String {
	format!("{MASKED_USER_PREFIX}{masked_id}")
}

/// Key of the Meetup access token owned by `user`.
pub fn access_token_key(user: &DiscordUserId) -> String {
	format!("{user}{ACCESS_TOKEN_SUFFIX}")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keys_match_callback_layout() {
		let masked = MaskedUserId::new("M").expect("Masked fixture should be valid.");
		let user = DiscordUserId::new("U1").expect("User fixture should be valid.");

		assert_eq!(masked_user_key(&masked), "maskedUserId-M");
		assert_eq!(access_token_key(&user), "U1-meetup-accessToken");
	}
}
