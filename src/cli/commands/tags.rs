//! pq tags - List known tags

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::catalog::Catalog;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct TagsArgs {
    /// Emit the tag list as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &AppContext, args: &TagsArgs) -> Result<()> {
    let tags = Catalog::new(&ctx.db).tag_list()?;

    if args.json {
        println!("{}", serde_json::json!({ "count": tags.len(), "tags": tags }));
        return Ok(());
    }

    if tags.is_empty() {
        println!("{}", "No tags".dimmed());
        return Ok(());
    }

    for tag in &tags {
        println!("{tag}");
    }
    Ok(())
}
