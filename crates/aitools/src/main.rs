use crate::prelude::*;
use clap::Parser;

mod admin;
mod api;
mod auth;
mod cache;
mod catalog;
mod config;
mod error;
mod prelude;
mod query;
mod render;
mod reviews;
mod session;
mod tools;

#[cfg(test)]
mod testing;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse, search, and review a directory of AI tools"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Base URL of the catalog API [default: http://localhost:8000]
    #[clap(long, env = "AITOOLS_API_URL", global = true)]
    api_url: Option<String>,

    /// Answer reads from demo data without calling the API
    #[clap(long, env = "AITOOLS_OFFLINE", global = true, default_value = "false")]
    offline: bool,

    /// Seconds a cached result is served before it is fetched again [default: 300]
    #[clap(long, env = "AITOOLS_STALE_SECS", global = true)]
    stale_secs: Option<i64>,

    /// Whether to display additional information.
    #[clap(long, env = "AITOOLS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Browse and search the tool catalog
    Tools(crate::tools::App),

    /// Write reviews
    Reviews(crate::reviews::App),

    /// Log in, sign up, and manage the saved session
    Auth(crate::auth::App),

    /// Catalog administration (admin accounts only)
    Admin(crate::admin::App),

    /// Manage the local query cache
    Cache(crate::cache::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Tools(sub_app) => crate::tools::run(sub_app, app.global).await,
        SubCommands::Reviews(sub_app) => crate::reviews::run(sub_app, app.global).await,
        SubCommands::Auth(sub_app) => crate::auth::run(sub_app, app.global).await,
        SubCommands::Admin(sub_app) => crate::admin::run(sub_app, app.global).await,
        SubCommands::Cache(sub_app) => crate::cache::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
