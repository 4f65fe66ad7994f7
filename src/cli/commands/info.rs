//! pq info - Show a pose's file, tags and geometry

use clap::Args;
use colored::Colorize;

use crate::PoseId;
use crate::app::AppContext;
use crate::catalog::Catalog;
use crate::error::{PqError, Result};
use crate::storage::blacklist;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Pose id to inspect
    pub pose: PoseId,

    /// Emit as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &AppContext, args: &InfoArgs) -> Result<()> {
    let catalog = Catalog::new(&ctx.db);
    let file_id = catalog
        .file_id(args.pose)?
        .ok_or_else(|| PqError::NotFound(format!("pose {}", args.pose)))?;
    let path = catalog.file_path(file_id)?;
    let info = catalog.pose_info(args.pose)?;
    let blacklisted = blacklist::contains_pose(&ctx.db, args.pose)?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "pose_id": args.pose,
                "file_id": file_id,
                "file": path,
                "blacklisted": blacklisted,
                "torso_dir": [info.torso_dir.x, info.torso_dir.y, info.torso_dir.z],
                "landmarks": info.landmarks.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>(),
            })
        );
        return Ok(());
    }

    println!("{} {}", "Pose".bold(), args.pose.to_string().cyan());
    println!("  file:       {}", path.as_deref().unwrap_or("-"));
    if blacklisted {
        println!("  blacklist:  {}", "excluded".yellow());
    }
    println!("  torso dir:  {}", info.torso_dir);
    println!(
        "  thigh dirs: {} / {}",
        info.thigh_dirs[0], info.thigh_dirs[1]
    );
    println!("  crus dirs:  {} / {}", info.crus_dirs[0], info.crus_dirs[1]);
    println!("  landmarks:  {}", info.landmarks.len());

    Ok(())
}
