use colored::Colorize;

use crate::catalog::Catalog;
use crate::prelude::{println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "cache")]
#[command(about = "Manage the local query cache")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Remove every cached result
    #[clap(name = "clear")]
    Clear,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut catalog = Catalog::from_global(&global)?;

    match app.command {
        Commands::Clear => {
            let removed = catalog.queries.clear()?;
            println!("{} Removed {removed} cached queries", "✓".green());
        }
    }

    catalog.finish();
    Ok(())
}
