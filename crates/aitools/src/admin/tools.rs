use aitools_core::types::{normalize_category, PricingModel, ToolCreate, ToolUpdate, ALL_CATEGORIES};
use colored::Colorize;

use crate::api::admin::DEFAULT_ADMIN_PAGE_SIZE;
use crate::catalog::Catalog;
use crate::prelude::{println, *};
use crate::render;

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List every tool
    #[clap(name = "list")]
    List(ListOptions),

    /// Add a tool to the catalog
    #[clap(name = "create")]
    Create(CreateOptions),

    /// Change fields of an existing tool
    #[clap(name = "update")]
    Update(UpdateOptions),

    /// Remove a tool
    #[clap(name = "delete")]
    Delete {
        /// Tool ID
        id: String,
    },
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Tools per page
    #[arg(long, default_value_t = DEFAULT_ADMIN_PAGE_SIZE)]
    pub page_size: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct CreateOptions {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub category: String,

    /// Pricing model (free, paid, subscription, freemium, no_pricing)
    #[arg(long)]
    pub pricing: String,

    /// Free-form price shown to users, e.g. "$20/mo"
    #[arg(long)]
    pub pricing_display: String,

    #[arg(long)]
    pub source_url: String,

    #[arg(long)]
    pub official_url: Option<String>,

    /// e.g. "3 months ago"
    #[arg(long)]
    pub released_ago: Option<String>,

    #[arg(long)]
    pub logo_url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct UpdateOptions {
    /// Tool ID
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub pricing: Option<String>,

    #[arg(long)]
    pub pricing_display: Option<String>,

    #[arg(long)]
    pub source_url: Option<String>,

    #[arg(long)]
    pub official_url: Option<String>,

    #[arg(long)]
    pub released_ago: Option<String>,

    #[arg(long)]
    pub logo_url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Categories a tool can be filed under; the "All" sentinel is not one
fn tool_category(input: &str) -> Result<String> {
    let category = normalize_category(input)?;
    if category == ALL_CATEGORIES {
        return Err(eyre!("\"{ALL_CATEGORIES}\" is not a tool category"));
    }
    Ok(category.to_string())
}

pub fn build_create(options: &CreateOptions) -> Result<ToolCreate> {
    Ok(ToolCreate {
        name: options.name.clone(),
        short_description: options.description.clone(),
        category: tool_category(&options.category)?,
        pricing_display: options.pricing_display.clone(),
        pricing_model: options.pricing.parse::<PricingModel>()?,
        official_url: options.official_url.clone(),
        source_url: options.source_url.clone(),
        released_ago: options.released_ago.clone(),
        logo_url: options.logo_url.clone(),
    })
}

pub fn build_update(options: &UpdateOptions) -> Result<ToolUpdate> {
    let update = ToolUpdate {
        name: options.name.clone(),
        short_description: options.description.clone(),
        category: options.category.as_deref().map(tool_category).transpose()?,
        pricing_display: options.pricing_display.clone(),
        pricing_model: options
            .pricing
            .as_deref()
            .map(str::parse::<PricingModel>)
            .transpose()?,
        official_url: options.official_url.clone(),
        source_url: options.source_url.clone(),
        released_ago: options.released_ago.clone(),
        logo_url: options.logo_url.clone(),
    };

    if update.is_empty() {
        return Err(eyre!("Nothing to update: pass at least one field"));
    }
    Ok(update)
}

pub async fn handler(catalog: &mut Catalog, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List(options) => list(catalog, options).await,
        Commands::Create(options) => {
            let tool = catalog.queries.create_tool(&build_create(&options)?).await?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&tool)?);
            } else {
                println!("{} Created {} ({})", "✓".green(), tool.name.bold(), tool.id);
            }
            Ok(())
        }
        Commands::Update(options) => {
            let update = build_update(&options)?;
            let tool = catalog.queries.update_tool(&options.id, &update).await?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&tool)?);
            } else {
                println!("{} Updated {} ({})", "✓".green(), tool.name.bold(), tool.id);
            }
            Ok(())
        }
        Commands::Delete { id } => {
            catalog.queries.delete_tool(&id).await?;
            println!("{} Deleted tool {}", "✓".green(), id.bold());
            Ok(())
        }
    }
}

async fn list(catalog: &mut Catalog, options: ListOptions) -> Result<()> {
    let resolved = catalog
        .queries
        .admin_tools(options.page.max(1), options.page_size.max(1))
        .await?;

    if options.json {
        println!("{}", render::to_json(&resolved)?);
        return Ok(());
    }

    let page = &resolved.value;
    if page.items.is_empty() {
        println!("{}", "No tools on this page".yellow());
        return Ok(());
    }

    render::tools_table(&page.items).printstd();
    println!();
    render::print_page_footer(page, "aitools admin tools list");
    Ok(())
}
