use aitools_core::types::ReviewCreate;
use colored::Colorize;

use crate::catalog::Catalog;
use crate::prelude::{println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "reviews")]
#[command(about = "Write reviews")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Submit a review; it stays pending until a moderator approves it
    #[clap(name = "submit")]
    Submit(SubmitOptions),
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SubmitOptions {
    /// Tool ID
    pub tool_id: String,

    /// Rating from 1 to 5
    #[arg(short, long)]
    pub rating: u8,

    /// Review text
    #[arg(short, long)]
    pub comment: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut catalog = Catalog::from_global(&global)?;

    let result = match app.command {
        Commands::Submit(options) => submit(&mut catalog, options).await,
    };

    catalog.finish();
    result
}

pub async fn submit(catalog: &mut Catalog, options: SubmitOptions) -> Result<()> {
    catalog.auth.require_user()?;

    let review = ReviewCreate {
        tool_id: options.tool_id,
        rating: options.rating,
        comment: options.comment.trim().to_string(),
    };
    let created = catalog.queries.create_review(&review).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        println!(
            "{} Review {} submitted and awaiting moderation",
            "✓".green(),
            created.id.bold()
        );
    }

    Ok(())
}
