//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use pq::criterion::QuerySeed;
use pq::storage::{Database, blacklist, schema};
use pq::{FileId, PoseId};

/// A pose database in a temp directory with the schema applied and a
/// blacklist database attached.
pub struct Fixture {
    pub dir: TempDir,
    pub db: Database,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("poses.db")).unwrap();
        schema::ensure_schema(&db).unwrap();
        blacklist::attach(&db, &dir.path().join("blacklist.db")).unwrap();
        Self { dir, db }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("poses.db")
    }

    pub fn blacklist_path(&self) -> PathBuf {
        self.dir.path().join("blacklist.db")
    }

    pub fn add_file(&self, id: FileId, path: &str, hash: &[u8]) {
        self.db
            .execute(
                "INSERT INTO File (id, path, hash) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, path, hash],
            )
            .unwrap();
    }

    pub fn add_pose(&self, id: PoseId, file_id: FileId) {
        self.db
            .execute(
                "INSERT INTO Pose (id, fileId) VALUES (?1, ?2)",
                rusqlite::params![id, file_id],
            )
            .unwrap();
    }

    /// One file per pose, ids matching, hash derived from the id.
    pub fn add_poses(&self, ids: &[PoseId]) {
        for id in ids {
            self.add_file(*id, &format!("pose{id}.png"), &id.to_le_bytes());
            self.add_pose(*id, *id);
        }
    }

    pub fn add_tag(&self, id: i64, name: &str) {
        self.db
            .execute(
                "INSERT INTO TagInfo (id, name) VALUES (?1, ?2)",
                rusqlite::params![id, name],
            )
            .unwrap();
    }

    pub fn tag_pose(&self, tag_id: i64, pose_id: PoseId) {
        self.db
            .execute(
                "INSERT INTO Tags (tagId, poseId) VALUES (?1, ?2)",
                rusqlite::params![tag_id, pose_id],
            )
            .unwrap();
    }

    pub fn add_thigh_flexion(&self, pose_id: PoseId, is_right: bool, angle_rad: f64) {
        self.db
            .execute(
                "INSERT INTO ThighFlexion (poseId, is_right, angleRad) VALUES (?1, ?2, ?3)",
                rusqlite::params![pose_id, is_right, angle_rad],
            )
            .unwrap();
    }
}

/// A fragment yielding the given literal `(poseId, score)` rows, shaped the
/// way criterion fragments are.
pub fn literal_seed(scores: &[(PoseId, f64)], ratio: f32) -> QuerySeed {
    let rows = scores
        .iter()
        .map(|(id, score)| format!("SELECT {id} AS poseId, {score:?} AS score"))
        .collect::<Vec<_>>()
        .join(" UNION ALL ");
    QuerySeed {
        sql: format!("WITH result AS ({rows})"),
        params: Vec::new(),
        ratio,
    }
}

/// Like [`literal_seed`] but honoring the engine's `:limit` cap, ordered by
/// score descending so the cap keeps the best rows.
pub fn capped_seed(scores: &[(PoseId, f64)], ratio: f32) -> QuerySeed {
    let rows = scores
        .iter()
        .map(|(id, score)| format!("SELECT {id} AS poseId, {score:?} AS score"))
        .collect::<Vec<_>>()
        .join(" UNION ALL ");
    QuerySeed {
        sql: format!(
            "WITH result AS (SELECT * FROM ({rows}) ORDER BY score DESC LIMIT :limit)"
        ),
        params: Vec::new(),
        ratio,
    }
}
