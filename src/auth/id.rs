//! Strongly typed identifiers for the two sides of the masked-identity exchange.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

// Both sides of the exchange end up as cache key fragments (`maskedUserId-{masked}` and
// `{user}-meetup-accessToken`), so they share one set of validation rules.
macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			#[doc = concat!(
				"Wraps `value` as a ", $kind, " id once it is non-empty, free of whitespace, and no ",
				"longer than 128 bytes, so it can be spliced into a cache key unescaped."
			)]
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
const MASKED_ID_BYTES: usize = 32;
const FINGERPRINT_LEN: usize = 12;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (Discord user, masked user).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (Discord user, masked user).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed byte count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (Discord user, masked user).
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

def_id! { DiscordUserId, "Discord user snowflake that owns a Meetup token.", "DiscordUser" }
def_id! {
	MaskedUserId,
	"Opaque correlation value embedded in the authorization URL in place of the Discord user id.",
	"MaskedUser"
}
impl DiscordUserId {
	/// Short, stable digest of the identifier that is safe to put in log fields.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());
		let mut encoded = URL_SAFE_NO_PAD.encode(digest);

		encoded.truncate(FINGERPRINT_LEN);

		encoded
	}
}
impl MaskedUserId {
	/// Mints a fresh random identifier that is safe to embed in a query string.
	pub fn generate() -> Self {
		let mut bytes = [0_u8; MASKED_ID_BYTES];

		rand::rng().fill_bytes(&mut bytes);

		Self(URL_SAFE_NO_PAD.encode(bytes))
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate() {
		assert!(DiscordUserId::new(" 1234").is_err(), "Leading whitespace must be rejected.");
		assert!(DiscordUserId::new("").is_err());
		assert!(MaskedUserId::new("with space").is_err());

		let user = DiscordUserId::new("80351110224678912")
			.expect("Discord user fixture should be considered valid.");

		assert_eq!(user.as_ref(), "80351110224678912");
		assert_eq!(format!("{user:?}"), "DiscordUser(80351110224678912)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let user: DiscordUserId =
			serde_json::from_str("\"U1\"").expect("User should deserialize successfully.");

		assert_eq!(user.as_ref(), "U1");
		assert!(serde_json::from_str::<DiscordUserId>("\"U 1\"").is_err());
		assert!(serde_json::from_str::<MaskedUserId>("\"\"").is_err());
	}

	#[test]
	fn length_limit() {
		DiscordUserId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(DiscordUserId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn generated_masked_ids_are_url_safe_and_distinct() {
		let a = MaskedUserId::generate();
		let b = MaskedUserId::generate();

		assert_ne!(a, b);
		assert_eq!(a.len(), 43);
		assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
		MaskedUserId::new(a.as_ref()).expect("Generated identifiers should pass validation.");
	}

	#[test]
	fn fingerprint_is_stable_per_user() {
		let user = DiscordUserId::new("U1").expect("User fixture should be valid.");
		let fingerprint = user.fingerprint();

		assert_eq!(fingerprint.len(), FINGERPRINT_LEN);
		assert_eq!(fingerprint, user.fingerprint());
		assert_ne!(
			fingerprint,
			DiscordUserId::new("U2").expect("Second user fixture should be valid.").fingerprint()
		);
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<DiscordUserId, u8> = HashMap::from_iter([(
			DiscordUserId::new("U1").expect("User used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("U1"), Some(&7));
	}
}
