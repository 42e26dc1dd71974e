//! Demo catalog used when the remote API is unreachable
//!
//! Everything here is pure: the fixture set is fixed (timestamps included) and
//! the query functions mirror what the `/tools` endpoints do server-side, so
//! the same filters always produce the same page. That also makes these
//! functions a reference for checking API responses.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};

use crate::pagination::paginate;
use crate::types::{
    timestamp, PaginatedResponse, PricingModel, Review, ReviewStatus, Tool, ToolFilters,
};

/// Page size used by tool review listings when none is given
pub const DEFAULT_REVIEW_PAGE_SIZE: usize = 10;

fn date(raw: &str) -> DateTime<Utc> {
    timestamp::parse(raw).unwrap_or_default()
}

/// Fixture tools, in listing order
pub fn demo_tools() -> &'static [Tool] {
    static TOOLS: OnceLock<Vec<Tool>> = OnceLock::new();
    TOOLS.get_or_init(build_tools)
}

/// Fixture reviews, all approved
pub fn demo_reviews() -> &'static [Review] {
    static REVIEWS: OnceLock<Vec<Review>> = OnceLock::new();
    REVIEWS.get_or_init(build_reviews)
}

fn build_tools() -> Vec<Tool> {
    vec![
        Tool {
            id: "1".to_string(),
            name: "ChatGPT".to_string(),
            short_description: "Advanced AI chatbot that can help with writing, coding, analysis, and creative tasks.".to_string(),
            category: "Text".to_string(),
            pricing_display: "Free + $20/mo".to_string(),
            pricing_model: PricingModel::FreePlusPaid,
            official_url: Some("https://chat.openai.com".to_string()),
            source_url: "https://openai.com".to_string(),
            released_ago: "2 years ago".to_string(),
            views: Some(15000000),
            votes: Some(850000),
            rating: Some(4.8),
            logo_url: Some("https://upload.wikimedia.org/wikipedia/commons/0/04/ChatGPT_logo.svg".to_string()),
            created_at: date("2022-11-30"),
            updated_at: date("2022-11-30"),
            avg_rating: 4.8,
            review_count: 12543,
        },
        Tool {
            id: "2".to_string(),
            name: "Midjourney".to_string(),
            short_description: "AI art generator that creates stunning images from text descriptions.".to_string(),
            category: "Images".to_string(),
            pricing_display: "From $10/mo".to_string(),
            pricing_model: PricingModel::Subscription,
            official_url: Some("https://midjourney.com".to_string()),
            source_url: "https://midjourney.com".to_string(),
            released_ago: "2 years ago".to_string(),
            views: Some(8500000),
            votes: Some(420000),
            rating: Some(4.9),
            logo_url: None,
            created_at: date("2022-07-12"),
            updated_at: date("2022-07-12"),
            avg_rating: 4.9,
            review_count: 8721,
        },
        Tool {
            id: "3".to_string(),
            name: "Claude".to_string(),
            short_description: "Anthropic's AI assistant focused on being helpful, harmless, and honest.".to_string(),
            category: "Text".to_string(),
            pricing_display: "Free + $20/mo".to_string(),
            pricing_model: PricingModel::FreePlusPaid,
            official_url: Some("https://claude.ai".to_string()),
            source_url: "https://anthropic.com".to_string(),
            released_ago: "1 year ago".to_string(),
            views: Some(5200000),
            votes: Some(280000),
            rating: Some(4.7),
            logo_url: None,
            created_at: date("2023-03-14"),
            updated_at: date("2023-03-14"),
            avg_rating: 4.7,
            review_count: 5432,
        },
        Tool {
            id: "4".to_string(),
            name: "DALL-E 3".to_string(),
            short_description: "OpenAI's latest text-to-image model with improved accuracy and creativity.".to_string(),
            category: "Images".to_string(),
            pricing_display: "$0.04/image".to_string(),
            pricing_model: PricingModel::Paid,
            official_url: Some("https://openai.com/dall-e-3".to_string()),
            source_url: "https://openai.com".to_string(),
            released_ago: "1 year ago".to_string(),
            views: Some(4800000),
            votes: Some(195000),
            rating: Some(4.6),
            logo_url: None,
            created_at: date("2023-10-04"),
            updated_at: date("2023-10-04"),
            avg_rating: 4.6,
            review_count: 3892,
        },
        Tool {
            id: "5".to_string(),
            name: "GitHub Copilot".to_string(),
            short_description: "AI pair programmer that helps you write code faster with suggestions.".to_string(),
            category: "Code".to_string(),
            pricing_display: "$10/mo".to_string(),
            pricing_model: PricingModel::Subscription,
            official_url: Some("https://github.com/features/copilot".to_string()),
            source_url: "https://github.com".to_string(),
            released_ago: "2 years ago".to_string(),
            views: Some(7200000),
            votes: Some(380000),
            rating: Some(4.5),
            logo_url: None,
            created_at: date("2022-06-21"),
            updated_at: date("2022-06-21"),
            avg_rating: 4.5,
            review_count: 6721,
        },
        Tool {
            id: "6".to_string(),
            name: "Runway Gen-2".to_string(),
            short_description: "AI video generation tool for creating and editing videos from text.".to_string(),
            category: "Video".to_string(),
            pricing_display: "From $12/mo".to_string(),
            pricing_model: PricingModel::Subscription,
            official_url: Some("https://runwayml.com".to_string()),
            source_url: "https://runwayml.com".to_string(),
            released_ago: "1 year ago".to_string(),
            views: Some(2100000),
            votes: Some(95000),
            rating: Some(4.4),
            logo_url: None,
            created_at: date("2023-06-15"),
            updated_at: date("2023-06-15"),
            avg_rating: 4.4,
            review_count: 2156,
        },
        Tool {
            id: "7".to_string(),
            name: "ElevenLabs".to_string(),
            short_description: "AI voice synthesis and cloning with remarkably natural results.".to_string(),
            category: "Audio".to_string(),
            pricing_display: "Free + $5/mo".to_string(),
            pricing_model: PricingModel::FreePlusPaid,
            official_url: Some("https://elevenlabs.io".to_string()),
            source_url: "https://elevenlabs.io".to_string(),
            released_ago: "2 years ago".to_string(),
            views: Some(3400000),
            votes: Some(145000),
            rating: Some(4.7),
            logo_url: None,
            created_at: date("2022-11-28"),
            updated_at: date("2022-11-28"),
            avg_rating: 4.7,
            review_count: 4123,
        },
        Tool {
            id: "8".to_string(),
            name: "Notion AI".to_string(),
            short_description: "AI writing assistant integrated directly into Notion workspaces.".to_string(),
            category: "Productivity".to_string(),
            pricing_display: "$10/mo".to_string(),
            pricing_model: PricingModel::Subscription,
            official_url: Some("https://notion.so".to_string()),
            source_url: "https://notion.so".to_string(),
            released_ago: "1 year ago".to_string(),
            views: Some(4100000),
            votes: Some(175000),
            rating: Some(4.3),
            logo_url: None,
            created_at: date("2023-02-22"),
            updated_at: date("2023-02-22"),
            avg_rating: 4.3,
            review_count: 3567,
        },
        Tool {
            id: "9".to_string(),
            name: "Jasper AI".to_string(),
            short_description: "AI content platform for marketing teams and content creators.".to_string(),
            category: "Marketing".to_string(),
            pricing_display: "From $49/mo".to_string(),
            pricing_model: PricingModel::Subscription,
            official_url: Some("https://jasper.ai".to_string()),
            source_url: "https://jasper.ai".to_string(),
            released_ago: "3 years ago".to_string(),
            views: Some(2800000),
            votes: Some(125000),
            rating: Some(4.2),
            logo_url: None,
            created_at: date("2021-01-15"),
            updated_at: date("2021-01-15"),
            avg_rating: 4.2,
            review_count: 2934,
        },
        Tool {
            id: "10".to_string(),
            name: "Perplexity AI".to_string(),
            short_description: "AI-powered search engine that provides accurate, cited answers.".to_string(),
            category: "Research".to_string(),
            pricing_display: "Free + $20/mo".to_string(),
            pricing_model: PricingModel::FreePlusPaid,
            official_url: Some("https://perplexity.ai".to_string()),
            source_url: "https://perplexity.ai".to_string(),
            released_ago: "2 years ago".to_string(),
            views: Some(5600000),
            votes: Some(220000),
            rating: Some(4.6),
            logo_url: None,
            created_at: date("2022-08-20"),
            updated_at: date("2022-08-20"),
            avg_rating: 4.6,
            review_count: 4892,
        },
        Tool {
            id: "11".to_string(),
            name: "Suno".to_string(),
            short_description: "AI music generation tool that creates songs from text prompts.".to_string(),
            category: "Audio".to_string(),
            pricing_display: "Free + $10/mo".to_string(),
            pricing_model: PricingModel::FreePlusPaid,
            official_url: Some("https://suno.ai".to_string()),
            source_url: "https://suno.ai".to_string(),
            released_ago: "1 year ago".to_string(),
            views: Some(1800000),
            votes: Some(85000),
            rating: Some(4.5),
            logo_url: None,
            created_at: date("2023-09-10"),
            updated_at: date("2023-09-10"),
            avg_rating: 4.5,
            review_count: 1876,
        },
        Tool {
            id: "12".to_string(),
            name: "Stable Diffusion".to_string(),
            short_description: "Open-source AI image generation model with extensive customization.".to_string(),
            category: "Images".to_string(),
            pricing_display: "Free".to_string(),
            pricing_model: PricingModel::Free,
            official_url: Some("https://stability.ai".to_string()),
            source_url: "https://stability.ai".to_string(),
            released_ago: "2 years ago".to_string(),
            views: Some(9200000),
            votes: Some(520000),
            rating: Some(4.4),
            logo_url: None,
            created_at: date("2022-08-22"),
            updated_at: date("2022-08-22"),
            avg_rating: 4.4,
            review_count: 7234,
        },
    ]
}

fn build_reviews() -> Vec<Review> {
    let review = |id: &str, user_id: &str, user_name: &str, rating: u8, comment: &str, day: &str| {
        Review {
            id: id.to_string(),
            tool_id: "1".to_string(),
            user_id: user_id.to_string(),
            user_name: Some(user_name.to_string()),
            rating,
            comment: comment.to_string(),
            status: ReviewStatus::Approved,
            moderation_note: None,
            created_at: date(day),
            updated_at: date(day),
        }
    };

    vec![
        review(
            "r1",
            "u1",
            "Sarah Chen",
            5,
            "ChatGPT has completely transformed how I approach writing and research. The quality of responses is incredible.",
            "2024-01-15",
        ),
        review(
            "r2",
            "u2",
            "Mike Johnson",
            4,
            "Great for brainstorming and drafting. Sometimes needs fact-checking but overall a productivity booster.",
            "2024-01-10",
        ),
        review(
            "r3",
            "u3",
            "Emily Davis",
            5,
            "As a developer, I use it daily for debugging and explaining code. Highly recommended!",
            "2024-01-05",
        ),
    ]
}

fn matches_filters(tool: &Tool, filters: &ToolFilters, search: Option<&str>) -> bool {
    if let Some(category) = filters.effective_category() {
        if tool.category != category {
            return false;
        }
    }

    if !filters.pricing_model.is_empty() && !filters.pricing_model.contains(&tool.pricing_model) {
        return false;
    }

    if let Some(min_rating) = filters.effective_min_rating() {
        if tool.avg_rating < min_rating {
            return false;
        }
    }

    if let Some(needle) = search {
        return tool.name.to_lowercase().contains(needle)
            || tool.short_description.to_lowercase().contains(needle);
    }

    true
}

/// Filter and paginate an ordered tool list.
///
/// Filters apply in a fixed order: category (skipped for "All"), pricing
/// model membership, minimum average rating, then a case-insensitive
/// substring search over name and short description. `total` counts the
/// filtered set before slicing.
pub fn filter_tools(tools: &[Tool], filters: &ToolFilters) -> PaginatedResponse<Tool> {
    let search = filters.effective_search().map(str::to_lowercase);

    let filtered: Vec<Tool> = tools
        .iter()
        .filter(|tool| matches_filters(tool, filters, search.as_deref()))
        .cloned()
        .collect();

    paginate(&filtered, filters.page, filters.page_size)
}

/// [`filter_tools`] over the demo catalog
pub fn get_demo_tools(filters: &ToolFilters) -> PaginatedResponse<Tool> {
    filter_tools(demo_tools(), filters)
}

/// Exact id lookup; `None` when the demo set has no such tool
pub fn get_demo_tool(id: &str) -> Option<Tool> {
    demo_tools().iter().find(|t| t.id == id).cloned()
}

pub fn get_demo_tool_reviews(
    tool_id: &str,
    page: usize,
    page_size: usize,
) -> PaginatedResponse<Review> {
    let reviews: Vec<Review> = demo_reviews()
        .iter()
        .filter(|r| r.tool_id == tool_id)
        .cloned()
        .collect();

    paginate(&reviews, page, page_size)
}
