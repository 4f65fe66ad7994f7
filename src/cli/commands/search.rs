//! pq search - Rank poses against a criteria list
//!
//! Criteria come from a JSON file (see `Criterion`'s serde format); the
//! result is a ranked table of pose ids, best first.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::catalog::Catalog;
use crate::criterion;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// JSON file holding the criteria list
    pub criteria: PathBuf,

    /// Maximum number of poses to return
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show the per-criterion score breakdown for each result
    #[arg(long)]
    pub scores: bool,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.criteria)?;
    let criteria = criterion::load_list(&raw)?;
    let limit = args.limit.unwrap_or(ctx.config.search.default_limit);

    let mut engine = ctx.engine();
    let ranked = engine.search(limit, &criteria)?;

    let catalog = Catalog::new(&ctx.db);
    let mut rows = Vec::with_capacity(ranked.len());
    for pose_id in &ranked {
        let breakdown = engine.score(*pose_id)?;
        let path = catalog
            .file_id(*pose_id)?
            .map(|file_id| catalog.file_path(file_id))
            .transpose()?
            .flatten();
        rows.push((*pose_id, breakdown, path));
    }

    if args.json {
        let out: Vec<serde_json::Value> = rows
            .iter()
            .map(|(pose_id, breakdown, path)| {
                serde_json::json!({
                    "pose_id": pose_id,
                    "total": breakdown.total,
                    "per_criterion": breakdown.per_criterion,
                    "file": path,
                })
            })
            .collect();
        println!("{}", serde_json::json!({ "count": rows.len(), "results": out }));
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", "No matching poses".dimmed());
        return Ok(());
    }

    println!(
        "{} poses for {} criteria:",
        rows.len().to_string().bold(),
        criteria.len()
    );
    println!();
    println!("{:>8} {:>10}  {}", "POSE".bold(), "SCORE".bold(), "FILE".bold());
    for (pose_id, breakdown, path) in &rows {
        println!(
            "{:>8} {:>10.4}  {}",
            pose_id.to_string().cyan(),
            breakdown.total,
            path.as_deref().unwrap_or("-").dimmed()
        );
        if args.scores {
            for (criterion, score) in criteria.iter().zip(&breakdown.per_criterion) {
                println!("{:>21.4}  {}", score, criterion.summary().dimmed());
            }
        }
    }

    Ok(())
}
