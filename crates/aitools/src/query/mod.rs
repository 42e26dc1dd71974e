//! Cached, fallback-aware reads and cache-invalidating writes
//!
//! [`QueryClient`] is the only path from commands to the API. Reads go
//! cache → remote → demo data; writes go straight to the API and then drop
//! every cached family they may have changed.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aitools_core::demo::{get_demo_tool, get_demo_tool_reviews, get_demo_tools};
use aitools_core::query::{invalidations, Mutation, QueryCache, QueryKey};
use aitools_core::types::{
    AdminReview, ModerationDecision, PaginatedResponse, Review, ReviewCreate, ReviewStatus, Tool,
    ToolCreate, ToolFilters, ToolUpdate,
};
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::ApiClient;
use crate::error::Error;

mod resolve;

pub use resolve::{resolve, resolve_offline, Resolved, Source};

pub struct QueryClient {
    api: Arc<ApiClient>,
    cache: QueryCache,
    cache_path: Option<PathBuf>,
    stale_after: Duration,
    offline: bool,
    dirty: bool,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.cache.len())
            .field("cache_path", &self.cache_path)
            .field("stale_after", &self.stale_after)
            .field("offline", &self.offline)
            .finish()
    }
}

impl QueryClient {
    pub fn new(api: Arc<ApiClient>, stale_after: Duration) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
            cache_path: None,
            stale_after,
            offline: false,
            dirty: false,
        }
    }

    /// Back the cache with a JSON file, loading whatever it already holds
    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.cache = load_cache(&path);
        self.cache_path = Some(path);
        self
    }

    /// Skip the remote API for reads and answer from demo data only
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn tools(
        &mut self,
        filters: &ToolFilters,
    ) -> Result<Resolved<PaginatedResponse<Tool>>, Error> {
        let owned = filters.clone();
        self.query(
            QueryKey::tools(filters),
            |api| async move { api.get_tools(&owned).await },
            || Some(get_demo_tools(filters)),
        )
        .await
    }

    pub async fn tool(&mut self, id: &str) -> Result<Resolved<Tool>, Error> {
        let owned = id.to_string();
        self.query(
            QueryKey::tool(id),
            |api| async move { api.get_tool(&owned).await },
            || get_demo_tool(id),
        )
        .await
    }

    pub async fn tool_reviews(
        &mut self,
        tool_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Resolved<PaginatedResponse<Review>>, Error> {
        let owned = tool_id.to_string();
        self.query(
            QueryKey::tool_reviews(tool_id, page, page_size),
            |api| async move {
                api.get_tool_reviews(&owned, Some(page), Some(page_size))
                    .await
            },
            || Some(get_demo_tool_reviews(tool_id, page, page_size)),
        )
        .await
    }

    /// Admin reads have no demo counterpart
    pub async fn admin_tools(
        &mut self,
        page: usize,
        page_size: usize,
    ) -> Result<Resolved<PaginatedResponse<Tool>>, Error> {
        self.query(
            QueryKey::admin_tools(page, page_size),
            |api| async move { api.get_admin_tools(Some(page), Some(page_size)).await },
            || None,
        )
        .await
    }

    pub async fn admin_reviews(
        &mut self,
        status: Option<ReviewStatus>,
        page: usize,
        page_size: usize,
    ) -> Result<Resolved<PaginatedResponse<AdminReview>>, Error> {
        self.query(
            QueryKey::admin_reviews(status, page, page_size),
            |api| async move { api.get_admin_reviews(status, page, page_size).await },
            || None,
        )
        .await
    }

    pub async fn create_tool(&mut self, tool: &ToolCreate) -> Result<Tool, Error> {
        let created = self.api.create_tool(tool).await?;
        self.invalidate(Mutation::CreateTool);
        Ok(created)
    }

    pub async fn update_tool(&mut self, id: &str, update: &ToolUpdate) -> Result<Tool, Error> {
        let updated = self.api.update_tool(id, update).await?;
        self.invalidate(Mutation::UpdateTool { id });
        Ok(updated)
    }

    pub async fn delete_tool(&mut self, id: &str) -> Result<(), Error> {
        self.api.delete_tool(id).await?;
        self.invalidate(Mutation::DeleteTool { id });
        Ok(())
    }

    pub async fn create_review(&mut self, review: &ReviewCreate) -> Result<Review, Error> {
        let created = self.api.create_review(review).await?;
        self.invalidate(Mutation::CreateReview {
            tool_id: &review.tool_id,
        });
        Ok(created)
    }

    pub async fn moderate_review(
        &mut self,
        id: &str,
        decision: ModerationDecision,
        note: Option<&str>,
    ) -> Result<Review, Error> {
        let moderated = self.api.moderate_review(id, decision, note).await?;
        self.invalidate(Mutation::ModerateReview);
        Ok(moderated)
    }

    /// Forget results that only the signed-in user was allowed to read
    pub fn forget_session(&mut self) {
        self.invalidate(Mutation::EndSession);
    }

    /// Drop every cached result, returning how many there were
    pub fn clear(&mut self) -> Result<usize, Error> {
        let count = self.cache.len();
        self.cache.clear();
        self.dirty = true;
        self.save()?;
        Ok(count)
    }

    /// Write the cache file if anything changed since it was loaded
    pub fn save(&mut self) -> Result<(), Error> {
        let Some(path) = self.cache_path.as_ref() else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        let pruned = self.cache.prune(Utc::now(), self.stale_after);
        if pruned > 0 {
            log::debug!("Pruned {pruned} stale cache entries");
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(&self.cache)
            .map_err(|e| Error::Storage(format!("Failed to serialize query cache: {e}")))?;
        fs::write(path, raw)?;

        self.dirty = false;
        Ok(())
    }

    async fn query<T, M, F, D>(
        &mut self,
        key: QueryKey,
        fetch: M,
        fallback: D,
    ) -> Result<Resolved<T>, Error>
    where
        T: Serialize + DeserializeOwned,
        M: FnOnce(Arc<ApiClient>) -> F,
        F: Future<Output = Result<T, Error>>,
        D: FnOnce() -> Option<T>,
    {
        if let Some(value) = self.cache.get_fresh(&key, Utc::now(), self.stale_after) {
            log::debug!("Cache hit: {key}");
            return Ok(Resolved::new(value, Source::Cache));
        }

        if self.offline {
            return resolve_offline(fallback, key.to_string());
        }

        let resolved = resolve(fetch(Arc::clone(&self.api)), fallback).await?;

        // Demo answers stay out of the cache so the next read retries the API
        if resolved.source == Source::Remote {
            match self.cache.insert(key.clone(), &resolved.value, Utc::now()) {
                Ok(()) => self.dirty = true,
                Err(e) => log::warn!("Failed to cache {key}: {e}"),
            }
        }

        Ok(resolved)
    }

    fn invalidate(&mut self, mutation: Mutation<'_>) {
        let removed = self.cache.invalidate_all(&invalidations(mutation));
        log::debug!("{mutation:?} invalidated {removed} cached queries");
        if removed > 0 {
            self.dirty = true;
        }
    }
}

/// Missing or unreadable cache files start an empty cache
fn load_cache(path: &Path) -> QueryCache {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return QueryCache::new(),
        Err(e) => {
            log::warn!("Ignoring query cache {}: {e}", path.display());
            return QueryCache::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("Ignoring corrupt query cache {}: {e}", path.display());
        QueryCache::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dead_url, MockBackend, PASSWORD, USER_EMAIL};
    use aitools_core::query::DEFAULT_STALE_SECS;
    use aitools_core::types::PricingModel;
    use tempfile::TempDir;

    fn fresh_window() -> Duration {
        Duration::seconds(DEFAULT_STALE_SECS)
    }

    fn client_for(backend: &MockBackend) -> QueryClient {
        QueryClient::new(Arc::new(backend.client()), fresh_window())
    }

    async fn admin_query_client(backend: &MockBackend) -> QueryClient {
        QueryClient::new(Arc::new(backend.admin_client().await), fresh_window())
    }

    #[tokio::test]
    async fn test_remote_result_is_cached() {
        let backend = MockBackend::start().await;
        let mut queries = client_for(&backend);

        let first = queries.tools(&ToolFilters::default()).await.unwrap();
        assert_eq!(first.source, Source::Remote);
        assert_eq!(first.value.total, 12);

        let second = queries.tools(&ToolFilters::default()).await.unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.value, first.value);
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let backend = MockBackend::start().await;
        let mut queries = QueryClient::new(Arc::new(backend.client()), Duration::zero());

        queries.tool("1").await.unwrap();
        let again = queries.tool("1").await.unwrap();

        assert_eq!(again.source, Source::Remote);
        assert_eq!(backend.request_count(), 2);
    }

    #[tokio::test]
    async fn test_different_filters_use_different_keys() {
        let backend = MockBackend::start().await;
        let mut queries = client_for(&backend);

        queries.tools(&ToolFilters::default()).await.unwrap();
        let images = queries
            .tools(&ToolFilters {
                category: Some("Images".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(images.source, Source::Remote);
        assert_eq!(images.value.total, 3);
        assert_eq!(queries.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_outage_falls_back_to_demo_tools() {
        let backend = MockBackend::start().await;
        backend.set_outage(true);
        let mut queries = client_for(&backend);

        let filters = ToolFilters {
            pricing_model: vec![PricingModel::FreePlusPaid],
            ..Default::default()
        };
        let resolved = queries.tools(&filters).await.unwrap();

        assert!(resolved.is_demo());
        assert_eq!(resolved.value, get_demo_tools(&filters));
        assert!(queries.cache().is_empty());
    }

    #[tokio::test]
    async fn test_demo_results_are_not_cached() {
        let backend = MockBackend::start().await;
        backend.set_outage(true);
        let mut queries = client_for(&backend);

        assert!(queries.tool("1").await.unwrap().is_demo());

        backend.set_outage(false);
        let recovered = queries.tool("1").await.unwrap();
        assert_eq!(recovered.source, Source::Remote);
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back() {
        let api = Arc::new(ApiClient::new(dead_url().await).unwrap());
        let mut queries = QueryClient::new(api, fresh_window());

        let tool = queries.tool("3").await.unwrap();
        assert!(tool.is_demo());
        assert_eq!(tool.value.name, "Claude");

        let reviews = queries.tool_reviews("1", 1, 10).await.unwrap();
        assert!(reviews.is_demo());
        assert_eq!(reviews.value.total, 3);
    }

    #[tokio::test]
    async fn test_missing_tool_without_demo_match_keeps_api_error() {
        let backend = MockBackend::start().await;
        let mut queries = client_for(&backend);

        let err = queries.tool("does-not-exist").await.unwrap_err();
        assert_eq!(
            err,
            Error::Api {
                status: 404,
                message: "Tool not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_admin_reads_never_fall_back() {
        let backend = MockBackend::start().await;
        let mut queries = admin_query_client(&backend).await;
        backend.set_outage(true);

        let err = queries.admin_tools(1, 20).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(queries.cache().is_empty());
    }

    #[tokio::test]
    async fn test_offline_answers_from_demo_without_requests() {
        let backend = MockBackend::start().await;
        let mut queries = client_for(&backend).offline(true);

        let tools = queries.tools(&ToolFilters::default()).await.unwrap();
        assert!(tools.is_demo());

        let err = queries.tool("missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFoundLocal(_)));

        let err = queries.admin_reviews(None, 1, 20).await.unwrap_err();
        assert!(matches!(err, Error::NotFoundLocal(_)));

        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_tool_failure_keeps_message_and_cache() {
        let backend = MockBackend::start().await;
        let api = Arc::new(backend.client());
        let auth = api.login(USER_EMAIL, PASSWORD).await.unwrap();
        api.set_token(Some(auth.token));
        let mut queries = QueryClient::new(api, fresh_window());

        queries.tools(&ToolFilters::default()).await.unwrap();

        let err = queries
            .create_tool(&ToolCreate {
                name: "Sneaky".to_string(),
                short_description: "Not an admin".to_string(),
                category: "Other".to_string(),
                pricing_display: "Free".to_string(),
                pricing_model: PricingModel::Free,
                official_url: None,
                source_url: "https://example.com".to_string(),
                released_ago: None,
                logo_url: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Admin access required");
        assert_eq!(queries.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_create_tool_invalidates_listings() {
        let backend = MockBackend::start().await;
        let mut queries = admin_query_client(&backend).await;

        queries.tools(&ToolFilters::default()).await.unwrap();
        queries.admin_tools(1, 20).await.unwrap();
        queries.tool("1").await.unwrap();

        queries
            .create_tool(&ToolCreate {
                name: "Whisper".to_string(),
                short_description: "Speech recognition".to_string(),
                category: "Audio".to_string(),
                pricing_display: "Free".to_string(),
                pricing_model: PricingModel::Free,
                official_url: None,
                source_url: "https://openai.com".to_string(),
                released_ago: None,
                logo_url: None,
            })
            .await
            .unwrap();

        assert_eq!(queries.cache().len(), 1);
        assert!(queries.cache().get(&QueryKey::tool("1")).is_some());

        let listing = queries.tools(&ToolFilters::default()).await.unwrap();
        assert_eq!(listing.source, Source::Remote);
        assert_eq!(listing.value.total, 13);
    }

    #[tokio::test]
    async fn test_create_review_invalidates_that_tools_reviews() {
        let backend = MockBackend::start().await;
        let api = Arc::new(backend.client());
        let auth = api.login(USER_EMAIL, PASSWORD).await.unwrap();
        api.set_token(Some(auth.token));
        let mut queries = QueryClient::new(api, fresh_window());

        queries.tool_reviews("1", 1, 10).await.unwrap();
        queries.tool_reviews("2", 1, 10).await.unwrap();

        let review = queries
            .create_review(&ReviewCreate {
                tool_id: "1".to_string(),
                rating: 4,
                comment: "Handy".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(review.status, ReviewStatus::Pending);

        assert!(queries
            .cache()
            .get(&QueryKey::tool_reviews("1", 1, 10))
            .is_none());
        assert!(queries
            .cache()
            .get(&QueryKey::tool_reviews("2", 1, 10))
            .is_some());
    }

    #[tokio::test]
    async fn test_invalid_review_fails_before_network() {
        let backend = MockBackend::start().await;
        let mut queries = client_for(&backend);

        let err = queries
            .create_review(&ReviewCreate {
                tool_id: "1".to_string(),
                rating: 0,
                comment: "Zero".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_moderation_is_visible_on_next_read() {
        let backend = MockBackend::start().await;
        let pending = backend.seed_pending_review("1");
        let mut queries = admin_query_client(&backend).await;

        let queue = queries
            .admin_reviews(Some(ReviewStatus::Pending), 1, 20)
            .await
            .unwrap();
        assert_eq!(queue.value.total, 1);
        let public = queries.tool_reviews("1", 1, 10).await.unwrap();
        assert_eq!(public.value.total, 3);

        queries
            .moderate_review(&pending, ModerationDecision::Approve, None)
            .await
            .unwrap();

        let queue = queries
            .admin_reviews(Some(ReviewStatus::Pending), 1, 20)
            .await
            .unwrap();
        assert_eq!(queue.source, Source::Remote);
        assert_eq!(queue.value.total, 0);

        let public = queries.tool_reviews("1", 1, 10).await.unwrap();
        assert_eq!(public.source, Source::Remote);
        let approved = public
            .value
            .items
            .iter()
            .find(|r| r.id == pending)
            .unwrap();
        assert_eq!(approved.status, ReviewStatus::Approved);
    }

    #[tokio::test]
    async fn test_moderating_twice_is_rejected() {
        let backend = MockBackend::start().await;
        let pending = backend.seed_pending_review("2");
        let mut queries = admin_query_client(&backend).await;

        queries
            .moderate_review(&pending, ModerationDecision::Reject, Some("Spam"))
            .await
            .unwrap();
        let err = queries
            .moderate_review(&pending, ModerationDecision::Approve, None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_cache_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aitools").join("queries.json");
        let backend = MockBackend::start().await;

        {
            let mut queries = client_for(&backend).with_cache_file(&path);
            queries.tool("2").await.unwrap();
            queries.save().unwrap();
        }
        assert!(path.exists());

        let mut queries = client_for(&backend).with_cache_file(&path);
        let tool = queries.tool("2").await.unwrap();
        assert_eq!(tool.source, Source::Cache);
        assert_eq!(tool.value.name, "Midjourney");
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_cache_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queries.json");
        let backend = MockBackend::start().await;

        let mut queries = client_for(&backend).with_cache_file(&path);
        queries.tool("1").await.unwrap();
        queries.tool("2").await.unwrap();
        assert_eq!(queries.clear().unwrap(), 2);

        let reloaded = client_for(&backend).with_cache_file(&path);
        assert!(reloaded.cache().is_empty());
    }

    #[test]
    fn test_corrupt_cache_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queries.json");
        fs::write(&path, "not json").unwrap();

        assert!(load_cache(&path).is_empty());
        assert!(load_cache(&dir.path().join("missing.json")).is_empty());
    }
}
