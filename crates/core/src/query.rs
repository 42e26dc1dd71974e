//! Query cache keys, freshness, and invalidation
//!
//! Every read goes through a structured [`QueryKey`]: the resource family plus
//! the request parameters in a fixed order. Mutations invalidate by family,
//! optionally narrowed to a parameter prefix, so matching never depends on
//! string formatting.
//!
//! The cache itself is plain data. Callers pass the current time in, which
//! keeps freshness decisions deterministic under test.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::{ReviewStatus, ToolFilters};

/// How long a cached result is served without re-fetching
pub const DEFAULT_STALE_SECS: i64 = 300;

/// Resource family a cached query belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Tools,
    Tool,
    ToolReviews,
    AdminTools,
    AdminReviews,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Tools => "tools",
            Resource::Tool => "tool",
            Resource::ToolReviews => "toolReviews",
            Resource::AdminTools => "adminTools",
            Resource::AdminReviews => "adminReviews",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub resource: Resource,
    pub params: Vec<String>,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.resource.as_str(), self.params.join(", "))
    }
}

impl QueryKey {
    pub fn new(resource: Resource, params: Vec<String>) -> Self {
        Self { resource, params }
    }

    /// Key for a tool listing; equivalent filter snapshots share a key
    pub fn tools(filters: &ToolFilters) -> Self {
        let pricing = filters
            .pricing_model
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");

        Self::new(
            Resource::Tools,
            vec![
                filters.effective_category().unwrap_or_default().to_string(),
                pricing,
                filters
                    .effective_min_rating()
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
                filters.effective_search().unwrap_or_default().to_string(),
                filters.page.to_string(),
                filters.page_size.to_string(),
            ],
        )
    }

    pub fn tool(id: &str) -> Self {
        Self::new(Resource::Tool, vec![id.to_string()])
    }

    pub fn tool_reviews(tool_id: &str, page: usize, page_size: usize) -> Self {
        Self::new(
            Resource::ToolReviews,
            vec![tool_id.to_string(), page.to_string(), page_size.to_string()],
        )
    }

    pub fn admin_tools(page: usize, page_size: usize) -> Self {
        Self::new(
            Resource::AdminTools,
            vec![page.to_string(), page_size.to_string()],
        )
    }

    pub fn admin_reviews(status: Option<ReviewStatus>, page: usize, page_size: usize) -> Self {
        Self::new(
            Resource::AdminReviews,
            vec![
                status.map(|s| s.as_str()).unwrap_or("all").to_string(),
                page.to_string(),
                page_size.to_string(),
            ],
        )
    }
}

/// Selects cached keys by resource family and parameter prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    pub resource: Resource,
    pub params_prefix: Vec<String>,
}

impl QueryFilter {
    /// Every key of a resource family
    pub fn family(resource: Resource) -> Self {
        Self {
            resource,
            params_prefix: Vec::new(),
        }
    }

    pub fn with_prefix(resource: Resource, prefix: Vec<String>) -> Self {
        Self {
            resource,
            params_prefix: prefix,
        }
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        key.resource == self.resource && key.params.starts_with(&self.params_prefix)
    }
}

/// Writes that make cached reads stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<'a> {
    CreateTool,
    UpdateTool { id: &'a str },
    DeleteTool { id: &'a str },
    CreateReview { tool_id: &'a str },
    ModerateReview,
    /// Logout; admin-only results must not outlive the session
    EndSession,
}

/// Which cache families a mutation invalidates
///
/// Tool writes touch every listing that can show the tool. Moderation can
/// change a tool's average rating, so it reaches the tool families as well.
pub fn invalidations(mutation: Mutation<'_>) -> Vec<QueryFilter> {
    match mutation {
        Mutation::CreateTool => vec![
            QueryFilter::family(Resource::Tools),
            QueryFilter::family(Resource::AdminTools),
        ],
        Mutation::UpdateTool { id } => vec![
            QueryFilter::family(Resource::Tools),
            QueryFilter::with_prefix(Resource::Tool, vec![id.to_string()]),
            QueryFilter::family(Resource::AdminTools),
        ],
        Mutation::DeleteTool { id } => vec![
            QueryFilter::family(Resource::Tools),
            QueryFilter::with_prefix(Resource::Tool, vec![id.to_string()]),
            QueryFilter::with_prefix(Resource::ToolReviews, vec![id.to_string()]),
            QueryFilter::family(Resource::AdminTools),
        ],
        Mutation::CreateReview { tool_id } => vec![
            QueryFilter::with_prefix(Resource::ToolReviews, vec![tool_id.to_string()]),
            QueryFilter::family(Resource::AdminReviews),
        ],
        Mutation::ModerateReview => vec![
            QueryFilter::family(Resource::AdminReviews),
            QueryFilter::family(Resource::ToolReviews),
            QueryFilter::family(Resource::Tool),
            QueryFilter::family(Resource::Tools),
        ],
        Mutation::EndSession => vec![
            QueryFilter::family(Resource::AdminTools),
            QueryFilter::family(Resource::AdminReviews),
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: QueryKey,
    pub value: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < stale_after
    }
}

/// Results keyed by query, serialized as a flat list of entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CacheEntry>", into = "Vec<CacheEntry>")]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
}

impl From<Vec<CacheEntry>> for QueryCache {
    fn from(entries: Vec<CacheEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.key.clone(), e)).collect(),
        }
    }
}

impl From<QueryCache> for Vec<CacheEntry> {
    fn from(cache: QueryCache) -> Self {
        let mut entries: Vec<CacheEntry> = cache.entries.into_values().collect();
        entries.sort_by(|a, b| a.fetched_at.cmp(&b.fetched_at));
        entries
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Cached value for `key` if it is still fresh and decodes as `T`
    pub fn get_fresh<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
        now: DateTime<Utc>,
        stale_after: Duration,
    ) -> Option<T> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, stale_after))
            .and_then(|entry| serde_json::from_value(entry.value.clone()).ok())
    }

    pub fn insert<T: Serialize>(
        &mut self,
        key: QueryKey,
        value: &T,
        now: DateTime<Utc>,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                value,
                fetched_at: now,
            },
        );
        Ok(())
    }

    /// Drop every entry matched by `filter`, returning how many went
    pub fn invalidate(&mut self, filter: &QueryFilter) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !filter.matches(key));
        before - self.entries.len()
    }

    pub fn invalidate_all(&mut self, filters: &[QueryFilter]) -> usize {
        filters.iter().map(|f| self.invalidate(f)).sum()
    }

    /// Drop entries older than `max_age`
    pub fn prune(&mut self, now: DateTime<Utc>, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now, max_age));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
