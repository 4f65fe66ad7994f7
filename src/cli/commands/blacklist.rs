//! pq blacklist - Manage the exclusion list
//!
//! Exclusions are keyed by file content digest, so they survive moves and
//! renames of the underlying files.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use colored::Colorize;

use crate::PoseId;
use crate::app::AppContext;
use crate::error::Result;
use crate::storage::blacklist;
use crate::utils::fs::content_digest;

#[derive(Args, Debug)]
pub struct BlacklistArgs {
    #[command(subcommand)]
    pub command: BlacklistCommand,
}

#[derive(Subcommand, Debug)]
pub enum BlacklistCommand {
    /// Exclude a pose's file, or a file by path
    Add {
        /// Pose id whose owning file should be excluded
        #[arg(long, conflicts_with = "file")]
        pose: Option<PoseId>,

        /// File to exclude by content digest
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Remove the exclusion for a pose's file
    Remove {
        /// Pose id
        pose: PoseId,
    },

    /// List excluded content digests
    List,

    /// Drop every exclusion
    Clear,
}

pub fn run(ctx: &AppContext, args: &BlacklistArgs) -> Result<()> {
    match &args.command {
        BlacklistCommand::Add { pose, file } => add(ctx, *pose, file.as_deref()),
        BlacklistCommand::Remove { pose } => {
            blacklist::remove_pose(&ctx.db, *pose)?;
            println!("{} pose {} no longer excluded", "✓".green().bold(), pose);
            Ok(())
        }
        BlacklistCommand::List => list(ctx),
        BlacklistCommand::Clear => {
            blacklist::clear(&ctx.db)?;
            println!("{} blacklist cleared", "✓".green().bold());
            Ok(())
        }
    }
}

fn add(ctx: &AppContext, pose: Option<PoseId>, file: Option<&std::path::Path>) -> Result<()> {
    match (pose, file) {
        (Some(pose_id), None) => {
            blacklist::add_pose(&ctx.db, pose_id)?;
            println!("{} pose {} excluded", "✓".green().bold(), pose_id);
            Ok(())
        }
        (None, Some(path)) => {
            let digest = content_digest(path)?;
            blacklist::add_hash(&ctx.db, &digest)?;
            println!("{} {} excluded", "✓".green().bold(), path.display());
            Ok(())
        }
        _ => Err(crate::PqError::InvalidInput(
            "pass exactly one of --pose or --file".to_string(),
        )),
    }
}

fn list(ctx: &AppContext) -> Result<()> {
    let hashes = blacklist::hashes(&ctx.db)?;
    if hashes.is_empty() {
        println!("{}", "Blacklist is empty".dimmed());
        return Ok(());
    }
    for hash in &hashes {
        println!("{}", hex::encode(hash));
    }
    Ok(())
}
