use colored::Colorize;

use crate::catalog::Catalog;
use crate::prelude::{eprintln, println, *};
use crate::render;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct GetOptions {
    /// Tool ID
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handler(catalog: &mut Catalog, options: GetOptions) -> Result<()> {
    let resolved = catalog.queries.tool(&options.id).await?;

    if options.json {
        println!("{}", render::to_json(&resolved)?);
        return Ok(());
    }

    render::print_demo_notice(&resolved);
    let tool = &resolved.value;

    println!("\n{}", tool.name.bold().bright_white());
    println!("{}\n", tool.short_description);
    render::tool_table(tool).printstd();
    eprintln!(
        "\n{}",
        format!("Reviews: aitools tools reviews {}", tool.id).bright_black()
    );

    Ok(())
}
