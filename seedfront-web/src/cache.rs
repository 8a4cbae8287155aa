//! Process-wide cache of rendered responses.
//!
//! Entries are keyed by method, path, query and locale, bounded by an LRU
//! capacity, and each carries its own time to live.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes, HttpBody};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use lru::LruCache;
use parking_lot::Mutex;

use crate::i18n::Locale;

/// Time to live of the dashboard page.
pub const DASHBOARD_TTL: Duration = Duration::from_secs(300);
/// Time to live of the stats, uploaded and downloaded pages.
pub const LISTING_PAGE_TTL: Duration = Duration::from_secs(300);
/// Time to live of the info page.
pub const INFO_TTL: Duration = Duration::from_secs(60);
/// Time to live of aggregated statistics in both APIs.
pub const API_STATS_TTL: Duration = Duration::from_secs(3600);

/// Cached bodies larger than this are served but not stored.
const MAX_CACHED_BODY: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
struct CachedResponse {
    content_type: Option<HeaderValue>,
    body: Bytes,
    expires_at: Instant,
}

impl CachedResponse {
    fn to_response(&self) -> Response {
        let mut response = (StatusCode::OK, self.body.clone()).into_response();
        if let Some(content_type) = &self.content_type {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, content_type.clone());
        }
        response
    }
}

/// Shared response cache. Cloning shares the same storage.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Option<Arc<Mutex<LruCache<String, CachedResponse>>>>,
}

impl ResponseCache {
    /// Creates a cache holding up to `capacity` responses.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Some(Arc::new(Mutex::new(LruCache::new(capacity)))),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self { entries: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Number of live and expired entries currently held.
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
            tracing::debug!("Response cache cleared");
        }
    }

    fn get(&self, key: &str) -> Option<Response> {
        let entries = self.entries.as_ref()?;
        let mut entries = entries.lock();
        let expired = entries.get(key)?.expires_at <= Instant::now();
        if expired {
            entries.pop(key);
            return None;
        }
        entries.peek(key).map(CachedResponse::to_response)
    }

    fn insert(&self, key: String, cached: CachedResponse) {
        if let Some(entries) = &self.entries {
            entries.lock().put(key, cached);
        }
    }

    /// Serves `key` from the cache, or renders it with `render` and stores a
    /// successful result for `ttl`.
    pub async fn get_or_render<F, Fut>(&self, key: String, ttl: Duration, render: F) -> Response
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Response>,
    {
        if let Some(hit) = self.get(&key) {
            tracing::debug!("Cache hit: {key}");
            return hit;
        }

        let response = render().await;
        if !self.is_enabled() || response.status() != StatusCode::OK {
            return response;
        }

        let (parts, body) = response.into_parts();
        let storable = body
            .size_hint()
            .upper()
            .is_some_and(|size| size <= MAX_CACHED_BODY as u64);
        if !storable {
            tracing::debug!("Not caching {key}: body too large or unsized");
            return Response::from_parts(parts, body);
        }

        match axum::body::to_bytes(body, MAX_CACHED_BODY).await {
            Ok(bytes) => {
                self.insert(
                    key,
                    CachedResponse {
                        content_type: parts.headers.get(CONTENT_TYPE).cloned(),
                        body: bytes.clone(),
                        expires_at: Instant::now() + ttl,
                    },
                );
                Response::from_parts(parts, Body::from(bytes))
            }
            Err(err) => {
                tracing::warn!("Could not buffer response for caching: {err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Cache key for a request.
pub fn cache_key(method: &Method, uri: &Uri, locale: Locale) -> String {
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    format!("{method} {path_and_query}|{}", locale.code())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    async fn render_counting(counter: &AtomicUsize) -> Response {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("render {n}").into_response()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let cache = ResponseCache::new(8);
        let counter = AtomicUsize::new(0);
        let ttl = Duration::from_secs(60);

        let first = cache
            .get_or_render("GET /stats|en".into(), ttl, || render_counting(&counter))
            .await;
        let second = cache
            .get_or_render("GET /stats|en".into(), ttl, || render_counting(&counter))
            .await;

        assert_eq!(body_text(first).await, "render 1");
        assert_eq!(body_text(second).await, "render 1");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_rerendered() {
        let cache = ResponseCache::new(8);
        let counter = AtomicUsize::new(0);

        cache
            .get_or_render("k".into(), Duration::ZERO, || render_counting(&counter))
            .await;
        let again = cache
            .get_or_render("k".into(), Duration::ZERO, || render_counting(&counter))
            .await;
        assert_eq!(body_text(again).await, "render 2");
    }

    #[tokio::test]
    async fn test_disabled_and_errors_not_stored() {
        let disabled = ResponseCache::disabled();
        let counter = AtomicUsize::new(0);
        for _ in 0..2 {
            disabled
                .get_or_render("k".into(), Duration::from_secs(60), || render_counting(&counter))
                .await;
        }
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        let cache = ResponseCache::new(8);
        cache
            .get_or_render("err".into(), Duration::from_secs(60), || async {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })
            .await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_clear_and_capacity() {
        let cache = ResponseCache::new(2);
        let counter = AtomicUsize::new(0);
        for key in ["a", "b", "c"] {
            cache
                .get_or_render(key.into(), Duration::from_secs(60), || render_counting(&counter))
                .await;
        }
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_served_uncached() {
        let cache = ResponseCache::new(8);
        let big = "x".repeat(MAX_CACHED_BODY + 1);
        let response = cache
            .get_or_render("big".into(), Duration::from_secs(60), || async {
                big.clone().into_response()
            })
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await.len(), MAX_CACHED_BODY + 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_key_includes_query_and_locale() {
        let uri: Uri = "/uploaded?search=foo&offset=50".parse().unwrap();
        assert_eq!(
            cache_key(&Method::GET, &uri, Locale::Fr),
            "GET /uploaded?search=foo&offset=50|fr"
        );
    }
}
