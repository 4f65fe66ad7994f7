//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod blacklist;
pub mod info;
pub mod search;
pub mod tags;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args),
        Commands::Info(args) => info::run(ctx, args),
        Commands::Tags(args) => tags::run(ctx, args),
        Commands::Blacklist(args) => blacklist::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank poses against a criteria list
    Search(search::SearchArgs),

    /// Show a pose's file, tags and geometry
    Info(info::InfoArgs),

    /// List known tags
    Tags(tags::TagsArgs),

    /// Manage the blacklist of excluded files
    Blacklist(blacklist::BlacklistArgs),
}
