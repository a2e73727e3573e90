//! Thread-safe in-memory [`KeyValueCache`] with a lazily created process-wide instance.

// std
use std::sync::OnceLock;
// self
use crate::{
	_prelude::*,
	cache::{CacheFuture, KeyValueCache},
};

type CacheMap = Arc<RwLock<HashMap<String, String>>>;

static SHARED: OnceLock<Arc<MemoryCache>> = OnceLock::new();

/// Process-local cache; contents vanish when the process exits.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	/// Returns the process-wide cache, creating it on first use.
	///
	/// Every call hands out a handle to the same map, so the broker and an in-process callback
	/// observe each other's writes.
	pub fn shared() -> Arc<Self> {
		SHARED.get_or_init(|| Arc::new(Self::default())).clone()
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Returns the keys starting with `prefix`.
	pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
		self.0.read().keys().filter(|key| key.starts_with(prefix)).cloned().collect()
	}

	fn get_now(map: &CacheMap, key: &str) -> Option<String> {
		map.read().get(key).cloned()
	}

	fn set_now(map: &CacheMap, key: &str, value: String) {
		map.write().insert(key.to_owned(), value);
	}

	fn remove_now(map: &CacheMap, key: &str) {
		map.write().remove(key);
	}

	// Check and insert share one write guard.
	fn exclusive_set_now(map: &CacheMap, key: &str, value: String) -> bool {
		let mut guard = map.write();

		if guard.contains_key(key) {
			return false;
		}

		guard.insert(key.to_owned(), value);

		true
	}
}
impl KeyValueCache for MemoryCache {
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
		Box::pin(async move { Ok(Self::get_now(&self.0, key)) })
	}

	fn set<'a>(&'a self, key: &'a str, value: String) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			Self::set_now(&self.0, key, value);

			Ok(())
		})
	}

	fn remove<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			Self::remove_now(&self.0, key);

			Ok(())
		})
	}

	fn exclusive_set<'a>(&'a self, key: &'a str, value: String) -> CacheFuture<'a, bool> {
		Box::pin(async move { Ok(Self::exclusive_set_now(&self.0, key, value)) })
	}
}
