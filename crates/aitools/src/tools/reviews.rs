use aitools_core::demo::DEFAULT_REVIEW_PAGE_SIZE;
use colored::Colorize;

use crate::catalog::Catalog;
use crate::prelude::{println, *};
use crate::render;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReviewsOptions {
    /// Tool ID
    pub id: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Reviews per page
    #[arg(long, default_value_t = DEFAULT_REVIEW_PAGE_SIZE)]
    pub page_size: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handler(catalog: &mut Catalog, options: ReviewsOptions) -> Result<()> {
    let page = options.page.max(1);
    let resolved = catalog
        .queries
        .tool_reviews(&options.id, page, options.page_size.max(1))
        .await?;

    if options.json {
        println!("{}", render::to_json(&resolved)?);
        return Ok(());
    }

    render::print_demo_notice(&resolved);
    let reviews = &resolved.value;

    if reviews.items.is_empty() {
        println!("{}", "No reviews yet".yellow());
        return Ok(());
    }

    for review in &reviews.items {
        println!("{}", render::format_review(review));
    }
    render::print_page_footer(reviews, &format!("aitools tools reviews {}", options.id));

    Ok(())
}
