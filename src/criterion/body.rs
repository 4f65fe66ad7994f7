//! Torso direction criteria: full 3D direction, yaw, and pitch.
//!
//! All three ride the sqlite-vec `MATCH` operator over the packed vector
//! columns of `TorsoVec`. Distances over unit vectors fall in `[0, 2]`, so
//! `(2 - distance) / 2` yields a score in `[0, 1]`.
//!
//! A negative caller ratio means "search the opposite direction": the query
//! vector is negated and the emitted multiplier is `abs(ratio)`. Direction
//! search has no natural negative score, so the sign lives in the vector,
//! not the multiplier. Pitch is a scalar with no opposite direction and
//! rejects negative ratios upstream.

use rusqlite::types::Value;

use super::QuerySeed;
use crate::units::remap;
use crate::utils::vecmath::{Vec2, Vec3, pack_floats};

pub(super) fn direction_seed(dir: Vec3, out: &str, ratio: f32) -> QuerySeed {
    let dir = if ratio < 0.0 { -dir } else { dir };
    QuerySeed {
        sql: format!(
            "WITH {out} AS ( \
             SELECT poseId, (2.0 - distance) / 2 AS score \
             FROM TorsoVec \
             WHERE dir MATCH :torso_dir \
             LIMIT :limit )"
        ),
        params: vec![(":torso_dir", Value::Blob(dir.to_blob()))],
        ratio: ratio.abs(),
    }
}

pub(super) fn yaw_seed(dir: Vec2, out: &str, ratio: f32) -> QuerySeed {
    let dir = if ratio < 0.0 { -dir } else { dir };
    QuerySeed {
        sql: format!(
            "WITH knn AS ( \
             SELECT poseId, distance \
             FROM TorsoVec \
             WHERE yaw MATCH :yaw_dir \
             LIMIT :limit ), \
             {out} AS ( \
             SELECT knn.poseId, (2.0 - knn.distance) / 2 AS score \
             FROM knn \
             INNER JOIN TorsoDir ON knn.poseId = TorsoDir.poseId )"
        ),
        params: vec![(":yaw_dir", Value::Blob(dir.to_blob()))],
        ratio: ratio.abs(),
    }
}

pub(super) fn pitch_seed(pitch: i32, out: &str, ratio: f32) -> QuerySeed {
    // The pitch column stores [-90, 90] degrees remapped onto [-1, 1].
    let target = remap(f64::from(pitch), -90.0, 90.0, -1.0, 1.0) as f32;
    QuerySeed {
        sql: format!(
            "WITH knn AS ( \
             SELECT poseId, distance \
             FROM TorsoVec \
             WHERE pitch MATCH :pitch_val \
             LIMIT :limit ), \
             {out} AS ( \
             SELECT knn.poseId, (2.0 - knn.distance) / 2 AS score \
             FROM knn \
             INNER JOIN TorsoDir ON knn.poseId = TorsoDir.poseId )"
        ),
        params: vec![(":pitch_val", Value::Blob(pack_floats(&[target])))],
        ratio,
    }
}
