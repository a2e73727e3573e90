//! Key-value cache contract shared by the broker and the external OAuth callback, plus the
//! built-in in-memory implementation.

pub mod keys;
pub mod memory;

pub use memory::MemoryCache;

// self
use crate::_prelude::*;

/// Boxed future returned by every [`KeyValueCache`] operation.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// String-to-string cache contract.
///
/// Operations may suspend while awaiting I/O or a lock but must never block other tasks.
pub trait KeyValueCache
where
	Self: Send + Sync,
{
	/// Fetches the value stored under `key`, if present.
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>>;

	/// Stores `value` under `key`, replacing any existing value.
	fn set<'a>(&'a self, key: &'a str, value: String) -> CacheFuture<'a, ()>;

	/// Deletes `key`; a no-op when the key is absent.
	fn remove<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()>;

	/// Writes `value` only when `key` is absent, reporting whether the write happened.
	///
	/// Concurrent callers racing on the same key must observe exactly one `true`.
	fn exclusive_set<'a>(&'a self, key: &'a str, value: String) -> CacheFuture<'a, bool>;
}

/// Error type produced by [`KeyValueCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure (connection loss, resource exhaustion).
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
