//! Metadata lookups over the pose database.
//!
//! Everything a caller needs after a search: tag names, the file a pose
//! came from, and the per-pose geometry used for previews and tooltips.

use rusqlite::OptionalExtension;

use crate::error::{PqError, Result};
use crate::storage::Database;
use crate::utils::{Vec2, Vec3};
use crate::{FileId, PoseId};

/// Per-pose geometry: 2D landmarks plus torso and limb direction vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseInfo {
    pub landmarks: Vec<Vec2>,
    pub torso_dir: Vec3,
    /// Left then right.
    pub thigh_dirs: [Vec3; 2],
    /// Left then right.
    pub crus_dirs: [Vec3; 2],
}

pub struct Catalog<'a> {
    db: &'a Database,
}

impl<'a> Catalog<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All known tag names, sorted.
    pub fn tag_list(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT name FROM TagInfo ORDER BY name")?;
        let tags = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    pub fn file_path(&self, file_id: FileId) -> Result<Option<String>> {
        Ok(self
            .db
            .conn()
            .query_row("SELECT path FROM File WHERE id = ?1", [file_id], |row| {
                row.get(0)
            })
            .optional()?)
    }

    pub fn file_id(&self, pose_id: PoseId) -> Result<Option<FileId>> {
        Ok(self
            .db
            .conn()
            .query_row("SELECT fileId FROM Pose WHERE id = ?1", [pose_id], |row| {
                row.get(0)
            })
            .optional()?)
    }

    /// Geometry of one pose. Missing direction rows are a `NotFound` error;
    /// landmarks may legitimately be empty.
    pub fn pose_info(&self, pose_id: PoseId) -> Result<PoseInfo> {
        let torso_dir = self
            .db
            .conn()
            .query_row(
                "SELECT x, y, z FROM TorsoDir WHERE poseId = ?1",
                [pose_id],
                |row| Ok(Vec3::new(row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?
            .ok_or_else(|| PqError::NotFound(format!("TorsoDir row for pose {pose_id}")))?;

        let thigh_dirs = self.limb_dirs("ThighDir", pose_id)?;
        let crus_dirs = self.limb_dirs("CrusDir", pose_id)?;

        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT td_x, td_y FROM Landmark WHERE poseId = ?1")?;
        let landmarks = stmt
            .query_map([pose_id], |row| Ok(Vec2::new(row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(PoseInfo {
            landmarks,
            torso_dir,
            thigh_dirs,
            crus_dirs,
        })
    }

    fn limb_dirs(&self, table: &'static str, pose_id: PoseId) -> Result<[Vec3; 2]> {
        let sql = format!("SELECT is_right, x, y, z FROM {table} WHERE poseId = ?1");
        let mut stmt = self.db.conn().prepare(&sql)?;
        let mut dirs: [Option<Vec3>; 2] = [None, None];
        let rows = stmt.query_map([pose_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Vec3::new(row.get(1)?, row.get(2)?, row.get(3)?),
            ))
        })?;
        for row in rows {
            let (is_right, dir) = row?;
            dirs[usize::from(is_right != 0)] = Some(dir);
        }
        match dirs {
            [Some(left), Some(right)] => Ok([left, right]),
            _ => Err(PqError::NotFound(format!(
                "{table} rows for pose {pose_id}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema;

    fn fixture() -> Database {
        let db = Database::open_in_memory().unwrap();
        schema::ensure_schema(&db).unwrap();
        db.execute("INSERT INTO File (id, path, hash) VALUES (1, '/data/a.png', x'aa')", [])
            .unwrap();
        db.execute("INSERT INTO Pose (id, fileId) VALUES (7, 1)", [])
            .unwrap();
        db.execute(
            "INSERT INTO TagInfo (id, name) VALUES (1, 'standing'), (2, 'arms-up')",
            [],
        )
        .unwrap();
        db
    }

    #[test]
    fn test_tag_list_sorted() {
        let db = fixture();
        let catalog = Catalog::new(&db);
        assert_eq!(catalog.tag_list().unwrap(), vec!["arms-up", "standing"]);
    }

    #[test]
    fn test_file_lookups() {
        let db = fixture();
        let catalog = Catalog::new(&db);
        assert_eq!(catalog.file_id(7).unwrap(), Some(1));
        assert_eq!(
            catalog.file_path(1).unwrap(),
            Some("/data/a.png".to_string())
        );
        assert_eq!(catalog.file_id(8).unwrap(), None);
        assert_eq!(catalog.file_path(2).unwrap(), None);
    }

    #[test]
    fn test_pose_info_requires_direction_rows() {
        let db = fixture();
        let catalog = Catalog::new(&db);
        assert!(matches!(
            catalog.pose_info(7).unwrap_err(),
            PqError::NotFound(_)
        ));

        db.execute("INSERT INTO TorsoDir VALUES (7, 0.0, 0.0, 1.0)", [])
            .unwrap();
        db.execute(
            "INSERT INTO ThighDir VALUES (7, 0, 0.0, -1.0, 0.0), (7, 1, 0.0, -1.0, 0.0)",
            [],
        )
        .unwrap();
        db.execute(
            "INSERT INTO CrusDir VALUES (7, 0, 0.0, -1.0, 0.0), (7, 1, 0.1, -0.9, 0.0)",
            [],
        )
        .unwrap();
        db.execute("INSERT INTO Landmark VALUES (7, 0.5, 0.25)", [])
            .unwrap();

        let info = catalog.pose_info(7).unwrap();
        assert_eq!(info.torso_dir, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(info.thigh_dirs[0], info.thigh_dirs[1]);
        assert_ne!(info.crus_dirs[0], info.crus_dirs[1]);
        assert_eq!(info.landmarks, vec![Vec2::new(0.5, 0.25)]);
    }
}
