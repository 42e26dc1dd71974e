//! Domain models shared by the API client, the demo fallback, and the CLI.
//!
//! Field names follow the wire format of the remote API (camelCase JSON).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Sentinel category meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All";

/// Fixed set of tool categories, sentinel first
pub const CATEGORIES: [&str; 10] = [
    ALL_CATEGORIES,
    "Images",
    "Text",
    "Audio",
    "Video",
    "Code",
    "Productivity",
    "Marketing",
    "Research",
    "Other",
];

/// Page size used by the tool listing when nothing else is requested
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Returns the canonical spelling of a category, matching case-insensitively
pub fn normalize_category(input: &str) -> Result<&'static str, CoreError> {
    CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(input.trim()))
        .copied()
        .ok_or_else(|| CoreError::UnknownCategory(input.to_string()))
}

/// How a tool is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Free,
    Paid,
    Subscription,
    FreePlusPaid,
    NoPricing,
}

impl PricingModel {
    pub const ALL: [PricingModel; 5] = [
        PricingModel::Free,
        PricingModel::Paid,
        PricingModel::Subscription,
        PricingModel::FreePlusPaid,
        PricingModel::NoPricing,
    ];

    /// Wire value, as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::Free => "free",
            PricingModel::Paid => "paid",
            PricingModel::Subscription => "subscription",
            PricingModel::FreePlusPaid => "free_plus_paid",
            PricingModel::NoPricing => "no_pricing",
        }
    }

    /// Human label shown in listings
    pub fn label(&self) -> &'static str {
        match self {
            PricingModel::Free => "Free",
            PricingModel::Paid => "Paid",
            PricingModel::Subscription => "Subscription",
            PricingModel::FreePlusPaid => "Freemium",
            PricingModel::NoPricing => "No pricing",
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingModel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        PricingModel::ALL
            .into_iter()
            .find(|m| m.as_str() == needle || m.label().to_lowercase() == needle)
            .ok_or_else(|| CoreError::UnknownPricingModel(s.to_string()))
    }
}

/// Moderation state of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }

    /// Apply a moderation decision.
    ///
    /// Only `pending` reviews can be moderated; approved and rejected are terminal.
    pub fn transition(self, decision: ModerationDecision) -> Result<ReviewStatus, CoreError> {
        let to = decision.status();
        if self.is_terminal() {
            return Err(CoreError::InvalidTransition { from: self, to });
        }
        Ok(to)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            _ => Err(CoreError::UnknownReviewStatus(s.to_string())),
        }
    }
}

/// The two outcomes an admin can pick when moderating a pending review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModerationDecision {
    #[serde(rename = "approved")]
    Approve,
    #[serde(rename = "rejected")]
    Reject,
}

impl ModerationDecision {
    pub fn status(&self) -> ReviewStatus {
        match self {
            ModerationDecision::Approve => ReviewStatus::Approved,
            ModerationDecision::Reject => ReviewStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Serde helpers for timestamps.
///
/// The backend emits naive UTC timestamps (`2024-01-15T10:30:00.123456`) while
/// fixtures and other producers use RFC 3339. Both are accepted; output is RFC 3339.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// A catalog entry for an AI product or service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub category: String,
    pub pricing_display: String,
    pub pricing_model: PricingModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    pub source_url: String,
    pub released_ago: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub review_count: u64,
}

/// Payload for creating a tool (admin only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCreate {
    pub name: String,
    pub short_description: String,
    pub category: String,
    pub pricing_display: String,
    pub pricing_model: PricingModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_ago: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Partial tool update; absent fields are left untouched by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_model: Option<PricingModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_ago: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl ToolUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ToolUpdate::default()
    }
}

/// A user-submitted rating and comment attached to a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub tool_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderation_note: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Apply a moderation decision, stamping the note and update time
    pub fn moderate(
        mut self,
        decision: ModerationDecision,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Review, CoreError> {
        self.status = self.status.transition(decision)?;
        if note.is_some() {
            self.moderation_note = note;
        }
        self.updated_at = now;
        Ok(self)
    }
}

/// Review as listed in the moderation queue, joined with its tool name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReview {
    #[serde(flatten)]
    pub review: Review,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

/// Payload for submitting a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub tool_id: String,
    pub rating: u8,
    pub comment: String,
}

impl ReviewCreate {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=5).contains(&self.rating) {
            return Err(CoreError::InvalidRating(self.rating));
        }
        if self.comment.trim().is_empty() {
            return Err(CoreError::EmptyComment);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Wire shape returned by the login and signup endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: User,
}

/// Authenticated session identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

impl From<TokenResponse> for AuthResponse {
    fn from(value: TokenResponse) -> Self {
        AuthResponse {
            user: value.user,
            token: value.access_token,
        }
    }
}

/// One page of results plus the counts needed to navigate the rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    #[serde(default)]
    pub total_pages: usize,
}

impl<T> PaginatedResponse<T> {
    /// Recompute `total_pages` from `total` and `page_size`.
    ///
    /// Some endpoints omit the field, so responses are normalized after decoding.
    pub fn normalized(mut self) -> Self {
        self.total_pages = crate::pagination::total_pages(self.total, self.page_size);
        self
    }
}

/// The criteria driving the tool listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pricing_model: Vec<PricingModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ToolFilters {
    fn default() -> Self {
        ToolFilters {
            category: None,
            pricing_model: Vec::new(),
            min_rating: None,
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ToolFilters {
    /// Category to filter by, or `None` when absent or the "All" sentinel
    pub fn effective_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// Minimum rating to filter by; zero means "any"
    pub fn effective_min_rating(&self) -> Option<f64> {
        self.min_rating.filter(|r| *r > 0.0)
    }

    pub fn effective_search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Query string pairs for `GET /tools`; `pricingModel` repeats once per value
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];

        if let Some(category) = self.effective_category() {
            pairs.push(("category", category.to_string()));
        }
        for model in &self.pricing_model {
            pairs.push(("pricingModel", model.as_str().to_string()));
        }
        if let Some(rating) = self.effective_min_rating() {
            pairs.push(("minRating", rating.to_string()));
        }
        if let Some(search) = self.effective_search() {
            pairs.push(("search", search.to_string()));
        }

        pairs
    }
}
