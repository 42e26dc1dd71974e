use aitools_core::filters::FilterStore;
use aitools_core::types::{normalize_category, PricingModel, ToolFilters, DEFAULT_PAGE_SIZE};
use colored::Colorize;

use crate::catalog::Catalog;
use crate::prelude::{println, *};
use crate::render;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # Image tools with a free tier:
  aitools tools list --category images --pricing free --pricing freemium

  # Well rated tools mentioning \"chat\":
  aitools tools list --min-rating 4.5 --search chat")]
pub struct ListOptions {
    /// Category (Images, Text, Audio, Video, Code, Productivity, Marketing, Research, Other, or All)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Pricing model; repeat or comma-separate for several
    #[arg(long, value_delimiter = ',')]
    pub pricing: Vec<String>,

    /// Minimum average rating (0 means any)
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Case-insensitive search over name and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Tools per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Turn the command line into a filter snapshot.
///
/// The page goes last: every other setter sends the listing back to page 1.
pub fn build_filters(options: &ListOptions) -> Result<ToolFilters> {
    let mut store = FilterStore::new();
    store.subscribe(|filters| log::debug!("filters: {filters:?}"));

    if let Some(category) = &options.category {
        store.set_category(Some(normalize_category(category)?.to_string()));
    }

    if !options.pricing.is_empty() {
        let models = options
            .pricing
            .iter()
            .map(|p| p.parse::<PricingModel>())
            .collect::<Result<Vec<_>, _>>()?;
        store.set_pricing_models(models);
    }

    if options.min_rating.is_some() {
        store.set_min_rating(options.min_rating);
    }

    if let Some(search) = &options.search {
        store.set_search(search.trim());
    }

    if options.page_size == 0 {
        return Err(eyre!("--page-size must be at least 1"));
    }
    store.set_page_size(options.page_size);
    store.set_page(options.page.max(1));

    Ok(store.filters().clone())
}

pub async fn handler(catalog: &mut Catalog, options: ListOptions) -> Result<()> {
    let filters = build_filters(&options)?;
    let resolved = catalog.queries.tools(&filters).await?;

    if options.json {
        println!("{}", render::to_json(&resolved)?);
        return Ok(());
    }

    render::print_demo_notice(&resolved);
    let page = &resolved.value;

    if page.items.is_empty() {
        println!("{}", render::EMPTY_TOOLS.yellow());
        return Ok(());
    }

    render::tools_table(&page.items).printstd();
    println!();
    render::print_page_footer(page, "aitools tools list");

    Ok(())
}
