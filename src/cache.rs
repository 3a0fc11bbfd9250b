use std::time::Duration;

use bytes::Bytes;
use moka::future::Cache;

/// Upper bound on cached pages, one per distinct path and query.
const MAX_PAGES: u64 = 1_000;

/// A cache of rendered response bodies, keyed by request path and query.
///
/// Entries only ever leave by expiring after the time-to-live (or by
/// [`PageCache::clear`]), so newly created content can be invisible until then.
#[derive(Clone)]
pub struct PageCache {
	pages: Cache<String, Bytes>,
}

impl PageCache {
	pub fn new(ttl: Duration) -> Self {
		tracing::info!("page cache time-to-live: {:?}", ttl);

		Self {
			pages: Cache::builder()
				.max_capacity(MAX_PAGES)
				.time_to_live(ttl)
				.build(),
		}
	}

	pub async fn get(&self, key: &str) -> Option<Bytes> {
		let page = self.pages.get(key).await;

		if page.is_some() {
			tracing::debug!(key, "page served from cache");
		}

		page
	}

	pub async fn insert(&self, key: String, body: Bytes) {
		self.pages.insert(key, body).await;
	}

	/// Drops every cached page.
	pub fn clear(&self) {
		self.pages.invalidate_all();
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[tokio::test]
	async fn test_cache_hit_and_clear() {
		let cache = PageCache::new(Duration::from_secs(60));

		cache.insert("/".into(), Bytes::from_static(b"page")).await;
		assert_eq!(cache.get("/").await.as_deref(), Some(&b"page"[..]));
		assert!(cache.get("/?page=2").await.is_none());

		cache.clear();
		assert!(cache.get("/").await.is_none());
	}

	#[tokio::test]
	async fn test_cache_expires() {
		let cache = PageCache::new(Duration::from_millis(50));

		cache.insert("/".into(), Bytes::from_static(b"page")).await;
		tokio::time::sleep(Duration::from_millis(120)).await;

		assert!(cache.get("/").await.is_none());
	}
}
