pub mod get;
pub mod list;
pub mod reviews;

use crate::prelude::*;

#[derive(Debug, clap::Parser)]
#[command(name = "tools")]
#[command(about = "Browse and search the tool catalog")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List tools, optionally filtered
    #[clap(name = "list")]
    List(list::ListOptions),

    /// Show a single tool
    #[clap(name = "get")]
    Get(get::GetOptions),

    /// Show the approved reviews of a tool
    #[clap(name = "reviews")]
    Reviews(reviews::ReviewsOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut catalog = crate::catalog::Catalog::from_global(&global)?;

    let result = match app.command {
        Commands::List(options) => list::handler(&mut catalog, options).await,
        Commands::Get(options) => get::handler(&mut catalog, options).await,
        Commands::Reviews(options) => reviews::handler(&mut catalog, options).await,
    };

    catalog.finish();
    result
}
