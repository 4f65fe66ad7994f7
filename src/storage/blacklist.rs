//! Hash-keyed exclusion list.
//!
//! Lives in its own database file, attached under the `blacklist` schema so
//! it survives rebuilds of the main pose database. Entries are keyed by the
//! content digest of the owning file, not its path, so moves and renames do
//! not break an exclusion. The search engine consults it as a final filter
//! and never mutates it.

use std::path::Path;

use rusqlite::OptionalExtension;

use crate::PoseId;
use crate::error::{PqError, Result};
use crate::storage::Database;

/// Schema name the blacklist database is attached under.
pub const SCHEMA: &str = "blacklist";

/// Attach the blacklist database file and make sure its table exists.
pub fn attach(db: &Database, path: &Path) -> Result<()> {
    db.attach(path, SCHEMA)?;
    db.execute(
        &format!("CREATE TABLE IF NOT EXISTS {SCHEMA}.Blacklist (hash BLOB PRIMARY KEY)"),
        [],
    )?;
    Ok(())
}

/// Blacklist a raw content digest.
pub fn add_hash(db: &Database, hash: &[u8]) -> Result<()> {
    db.execute(
        &format!("INSERT OR IGNORE INTO {SCHEMA}.Blacklist (hash) VALUES (?1)"),
        [hash],
    )?;
    Ok(())
}

fn pose_hash(db: &Database, pose_id: PoseId) -> Result<Vec<u8>> {
    db.conn()
        .query_row(
            "SELECT File.hash FROM Pose INNER JOIN File ON Pose.fileId = File.id WHERE Pose.id = ?1",
            [pose_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| PqError::NotFound(format!("pose {pose_id} has no owning file")))
}

/// Blacklist the file a pose record belongs to.
pub fn add_pose(db: &Database, pose_id: PoseId) -> Result<()> {
    let hash = pose_hash(db, pose_id)?;
    add_hash(db, &hash)
}

/// Remove the exclusion for the file a pose record belongs to.
pub fn remove_pose(db: &Database, pose_id: PoseId) -> Result<()> {
    let hash = pose_hash(db, pose_id)?;
    db.execute(
        &format!("DELETE FROM {SCHEMA}.Blacklist WHERE hash = ?1"),
        [hash],
    )?;
    Ok(())
}

/// Whether the pose's owning file is blacklisted.
pub fn contains_pose(db: &Database, pose_id: PoseId) -> Result<bool> {
    let hash = pose_hash(db, pose_id)?;
    let n: i64 = db.conn().query_row(
        &format!("SELECT COUNT(*) FROM {SCHEMA}.Blacklist WHERE hash = ?1"),
        [hash],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

/// All blacklisted digests.
pub fn hashes(db: &Database) -> Result<Vec<Vec<u8>>> {
    let mut stmt = db
        .conn()
        .prepare(&format!("SELECT hash FROM {SCHEMA}.Blacklist"))?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Drop every exclusion.
pub fn clear(db: &Database) -> Result<()> {
    db.execute(&format!("DELETE FROM {SCHEMA}.Blacklist"), [])?;
    Ok(())
}
