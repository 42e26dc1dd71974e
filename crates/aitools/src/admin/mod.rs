pub mod reviews;
pub mod tools;

use crate::catalog::Catalog;
use crate::prelude::*;

/// Admin module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "admin")]
#[command(about = "Catalog administration (admin accounts only)")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Create, update, and delete tools
    #[clap(subcommand)]
    Tools(tools::Commands),

    /// Moderate submitted reviews
    #[clap(subcommand)]
    Reviews(reviews::Commands),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut catalog = Catalog::from_global(&global)?;

    let result = match catalog.auth.require_admin().map(|user| user.email.clone()) {
        Ok(email) => {
            log::debug!("Admin command as {email}");
            match app.command {
                Commands::Tools(cmd) => tools::handler(&mut catalog, cmd).await,
                Commands::Reviews(cmd) => reviews::handler(&mut catalog, cmd).await,
            }
        }
        Err(e) => Err(e.into()),
    };

    catalog.finish();
    result
}
