//! Terminal and JSON rendering shared by the commands

use aitools_core::pagination::navigation;
use aitools_core::types::{AdminReview, PaginatedResponse, Review, Tool, User};
use colored::Colorize;
use serde::Serialize;

use crate::prelude::{eprintln, *};
use crate::query::{Resolved, Source};

pub const EMPTY_TOOLS: &str = "No tools match your filters";
pub const DEMO_NOTICE: &str = "Showing demo data: the API could not be reached";

#[derive(Serialize)]
struct JsonOutput<'a, T> {
    source: Source,
    #[serde(flatten)]
    data: &'a T,
}

/// Pretty JSON with the result's source alongside its fields
pub fn to_json<T: Serialize>(resolved: &Resolved<T>) -> Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        source: resolved.source,
        data: &resolved.value,
    })
    .map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Five-star bar for an average rating, rounded to the nearest star
pub fn stars(rating: f64) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

pub fn rating_summary(avg_rating: f64, review_count: u64) -> String {
    if review_count == 0 {
        return "No reviews yet".to_string();
    }
    let noun = if review_count == 1 { "review" } else { "reviews" };
    format!("{} {avg_rating:.1} ({review_count} {noun})", stars(avg_rating))
}

pub fn print_demo_notice<T>(resolved: &Resolved<T>) {
    if resolved.is_demo() {
        eprintln!("{}", DEMO_NOTICE.yellow());
    }
}

pub fn tools_table(tools: &[Tool]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "ID".bold().cyan(),
        "Name".bold().cyan(),
        "Category".bold().cyan(),
        "Pricing".bold().cyan(),
        "Rating".bold().cyan()
    ]);

    for tool in tools {
        table.add_row(prettytable::row![
            tool.id,
            tool.name,
            tool.category,
            tool.pricing_model.label(),
            rating_summary(tool.avg_rating, tool.review_count)
        ]);
    }

    table
}

pub fn tool_table(tool: &Tool) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["ID".bold().cyan(), tool.id]);
    table.add_row(prettytable::row!["Category".bold().cyan(), tool.category]);
    table.add_row(prettytable::row![
        "Pricing".bold().cyan(),
        format!("{} ({})", tool.pricing_display, tool.pricing_model.label())
    ]);
    table.add_row(prettytable::row![
        "Rating".bold().cyan(),
        rating_summary(tool.avg_rating, tool.review_count)
    ]);
    table.add_row(prettytable::row!["Released".bold().cyan(), tool.released_ago]);
    if let Some(url) = &tool.official_url {
        table.add_row(prettytable::row!["Website".bold().cyan(), url]);
    }
    table.add_row(prettytable::row!["Source".bold().cyan(), tool.source_url]);
    if let Some(votes) = tool.votes {
        table.add_row(prettytable::row!["Votes".bold().cyan(), votes]);
    }
    table
}

/// One block per review: stars, author, date, then the comment
pub fn format_review(review: &Review) -> String {
    let author = review.user_name.as_deref().unwrap_or("Anonymous");
    let mut out = format!(
        "{} {} {} {}\n  {}\n",
        stars(f64::from(review.rating)).yellow(),
        author.bold(),
        "·".bright_black(),
        review.created_at.format("%Y-%m-%d").to_string().bright_black(),
        review.comment
    );
    if let Some(note) = &review.moderation_note {
        out.push_str(&format!("  {} {}\n", "Moderator:".bright_black(), note));
    }
    out
}

pub fn admin_reviews_table(reviews: &[AdminReview]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "ID".bold().cyan(),
        "Tool".bold().cyan(),
        "Author".bold().cyan(),
        "Rating".bold().cyan(),
        "Status".bold().cyan(),
        "Comment".bold().cyan()
    ]);

    for entry in reviews {
        let review = &entry.review;
        table.add_row(prettytable::row![
            review.id,
            entry.tool_name.as_deref().unwrap_or(&review.tool_id),
            review.user_name.as_deref().unwrap_or(&review.user_id),
            review.rating,
            review.status,
            truncate(&review.comment, 60)
        ]);
    }

    table
}

pub fn user_table(user: &User) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["Name".bold().cyan(), user.name]);
    table.add_row(prettytable::row!["Email".bold().cyan(), user.email]);
    table.add_row(prettytable::row![
        "Role".bold().cyan(),
        if user.is_admin() { "admin" } else { "user" }
    ]);
    table
}

/// "Page 2 of 5 (53 total)" plus next/previous hints built on `command`
pub fn page_footer<T>(page: &PaginatedResponse<T>, command: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "Page {} of {} ({} total)",
        page.page,
        page.total_pages.max(1),
        page.total
    )];

    let nav = navigation(page.page, page.total_pages);
    if let Some(next) = nav.next_page {
        lines.push(format!("Next page: {command} --page {next}"));
    }
    if let Some(prev) = nav.prev_page {
        lines.push(format!("Previous page: {command} --page {prev}"));
    }

    lines
}

pub fn print_page_footer<T>(page: &PaginatedResponse<T>, command: &str) {
    for line in page_footer(page, command) {
        eprintln!("{}", line.bright_black());
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
