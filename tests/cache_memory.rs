// self
use meetup_token_broker::{
	_preludet::*,
	cache::{KeyValueCache, MemoryCache},
};

#[tokio::test]
async fn exclusive_set_on_absent_key_writes_value() {
	let cache = MemoryCache::default();
	let written = cache
		.exclusive_set("maskedUserId-M", "U1".into())
		.await
		.expect("Exclusive set on an empty cache should succeed.");

	assert!(written);
	assert_eq!(
		cache.get("maskedUserId-M").await.expect("Lookup should succeed.").as_deref(),
		Some("U1")
	);
}

#[tokio::test]
async fn exclusive_set_on_present_key_keeps_first_value() {
	let cache = MemoryCache::default();

	cache.set("k", "v1".into()).await.expect("Seeding the cache should succeed.");

	let written = cache
		.exclusive_set("k", "v2".into())
		.await
		.expect("Exclusive set on a present key should report, not fail.");

	assert!(!written);
	assert_eq!(cache.get("k").await.expect("Lookup should succeed.").as_deref(), Some("v1"));
}

#[tokio::test]
async fn set_overwrites_and_remove_clears() {
	let cache = MemoryCache::default();

	cache.set("k", "v1".into()).await.expect("First write should succeed.");
	cache.set("k", "v2".into()).await.expect("Overwrite should succeed.");

	assert_eq!(cache.get("k").await.expect("Lookup should succeed.").as_deref(), Some("v2"));

	cache.remove("k").await.expect("Removing a present key should succeed.");
	cache.remove("k").await.expect("Removing an absent key should be a no-op.");
	cache.remove("never-set").await.expect("Removing an unknown key should be a no-op.");

	assert_eq!(cache.get("k").await.expect("Lookup should succeed."), None);
	assert!(cache.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_exclusive_set_allows_single_winner() {
	let cache = Arc::new(MemoryCache::default());
	let tasks = (0..32)
		.map(|idx| {
			let cache = cache.clone();

			tokio::spawn(async move {
				cache
					.exclusive_set("maskedUserId-race", format!("U{idx}"))
					.await
					.expect("Concurrent exclusive set should not fail.")
			})
		})
		.collect::<Vec<_>>();
	let mut winners = 0;

	for task in tasks {
		if task.await.expect("Exclusive set task should not panic.") {
			winners += 1;
		}
	}

	assert_eq!(winners, 1, "Exactly one concurrent exclusive set must succeed.");
	assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn shared_cache_is_process_wide() -> color_eyre::Result<()> {
	let writer = MemoryCache::shared();
	let reader = MemoryCache::shared();

	writer.set("cache-memory-it-shared", "present".into()).await?;

	assert_eq!(reader.get("cache-memory-it-shared").await?.as_deref(), Some("present"));

	writer.remove("cache-memory-it-shared").await?;

	Ok(())
}
