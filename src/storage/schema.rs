//! Pose database schema bootstrap.
//!
//! The relational tables are normally produced by the importer; creating
//! them here keeps a fresh database usable and gives tests a fixture base.
//! The vector table requires the sqlite-vec extension and is created
//! separately.

use crate::error::Result;
use crate::storage::Database;

/// Relational tables of the pose database.
pub const TABLES: &[&str] = &[
    "File",
    "Pose",
    "TagInfo",
    "Tags",
    "ThighFlexion",
    "CrusFlexion",
    "TorsoDir",
    "ThighDir",
    "CrusDir",
    "Landmark",
];

const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS File (
        id INTEGER PRIMARY KEY,
        path TEXT NOT NULL,
        hash BLOB NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_file_hash ON File(hash);

    CREATE TABLE IF NOT EXISTS Pose (
        id INTEGER PRIMARY KEY,
        fileId INTEGER NOT NULL REFERENCES File(id)
    );

    CREATE TABLE IF NOT EXISTS TagInfo (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS Tags (
        tagId INTEGER NOT NULL REFERENCES TagInfo(id),
        poseId INTEGER NOT NULL REFERENCES Pose(id),
        PRIMARY KEY (tagId, poseId)
    );

    CREATE TABLE IF NOT EXISTS ThighFlexion (
        poseId INTEGER NOT NULL,
        is_right INTEGER NOT NULL,
        angleRad REAL NOT NULL,
        PRIMARY KEY (poseId, is_right)
    );
    CREATE TABLE IF NOT EXISTS CrusFlexion (
        poseId INTEGER NOT NULL,
        is_right INTEGER NOT NULL,
        angleRad REAL NOT NULL,
        PRIMARY KEY (poseId, is_right)
    );

    CREATE TABLE IF NOT EXISTS TorsoDir (
        poseId INTEGER PRIMARY KEY,
        x REAL NOT NULL,
        y REAL NOT NULL,
        z REAL NOT NULL
    );
    CREATE TABLE IF NOT EXISTS ThighDir (
        poseId INTEGER NOT NULL,
        is_right INTEGER NOT NULL,
        x REAL NOT NULL,
        y REAL NOT NULL,
        z REAL NOT NULL,
        PRIMARY KEY (poseId, is_right)
    );
    CREATE TABLE IF NOT EXISTS CrusDir (
        poseId INTEGER NOT NULL,
        is_right INTEGER NOT NULL,
        x REAL NOT NULL,
        y REAL NOT NULL,
        z REAL NOT NULL,
        PRIMARY KEY (poseId, is_right)
    );

    CREATE TABLE IF NOT EXISTS Landmark (
        poseId INTEGER NOT NULL REFERENCES Pose(id),
        td_x REAL NOT NULL,
        td_y REAL NOT NULL
    );
";

/// Create the relational tables if they do not exist yet.
pub fn ensure_schema(db: &Database) -> Result<()> {
    db.conn()
        .execute_batch(SCHEMA_SQL)
        .map_err(|e| super::sqlite::exec_error("<schema batch>", e))?;
    Ok(())
}

/// Create the vec0 virtual table holding the packed pose vectors. Requires
/// the sqlite-vec extension to be loaded.
pub fn ensure_vector_schema(db: &Database) -> Result<()> {
    db.execute(
        "CREATE VIRTUAL TABLE IF NOT EXISTS TorsoVec USING vec0(
            poseId INTEGER PRIMARY KEY,
            dir float[3],
            yaw float[2],
            pitch float[1]
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_created() {
        let db = Database::open_in_memory().unwrap();
        ensure_schema(&db).unwrap();
        for table in TABLES {
            assert!(db.has_table(table).unwrap(), "table {table} should exist");
        }
        // Idempotent.
        ensure_schema(&db).unwrap();
    }
}
