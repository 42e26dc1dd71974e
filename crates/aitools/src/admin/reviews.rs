use aitools_core::types::{ModerationDecision, ReviewStatus};
use colored::Colorize;

use crate::api::admin::DEFAULT_ADMIN_PAGE_SIZE;
use crate::catalog::Catalog;
use crate::prelude::{println, *};
use crate::render;

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Show the review queue
    #[clap(name = "list")]
    List(ListOptions),

    /// Approve a pending review
    #[clap(name = "approve")]
    Approve(ModerateOptions),

    /// Reject a pending review
    #[clap(name = "reject")]
    Reject(ModerateOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// pending, approved, rejected, or all
    #[arg(short, long, default_value = "pending")]
    pub status: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Reviews per page
    #[arg(long, default_value_t = DEFAULT_ADMIN_PAGE_SIZE)]
    pub page_size: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ModerateOptions {
    /// Review ID
    pub id: String,

    /// Note stored with the decision
    #[arg(short, long)]
    pub note: Option<String>,
}

/// `None` for "all"
pub fn parse_status(input: &str) -> Result<Option<ReviewStatus>> {
    if input.trim().eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    Ok(Some(input.parse::<ReviewStatus>()?))
}

pub async fn handler(catalog: &mut Catalog, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List(options) => list(catalog, options).await,
        Commands::Approve(options) => moderate(catalog, options, ModerationDecision::Approve).await,
        Commands::Reject(options) => moderate(catalog, options, ModerationDecision::Reject).await,
    }
}

async fn list(catalog: &mut Catalog, options: ListOptions) -> Result<()> {
    let status = parse_status(&options.status)?;
    let resolved = catalog
        .queries
        .admin_reviews(status, options.page.max(1), options.page_size.max(1))
        .await?;

    if options.json {
        println!("{}", render::to_json(&resolved)?);
        return Ok(());
    }

    let page = &resolved.value;
    if page.items.is_empty() {
        println!("{}", "No reviews to show".yellow());
        return Ok(());
    }

    render::admin_reviews_table(&page.items).printstd();
    println!();
    render::print_page_footer(
        page,
        &format!("aitools admin reviews list --status {}", options.status),
    );
    Ok(())
}

async fn moderate(
    catalog: &mut Catalog,
    options: ModerateOptions,
    decision: ModerationDecision,
) -> Result<()> {
    let review = catalog
        .queries
        .moderate_review(&options.id, decision, options.note.as_deref())
        .await?;

    println!(
        "{} Review {} is now {}",
        "✓".green(),
        review.id.bold(),
        review.status.to_string().bold()
    );
    Ok(())
}
