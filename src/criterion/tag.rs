//! Directory-tag criterion.
//!
//! Membership is binary: every pose carrying the tag scores 1.0. The ratio
//! passes through signed, so a negative weight penalizes tagged poses
//! instead of favoring them.

use rusqlite::types::Value;

use super::QuerySeed;

pub(super) fn tag_seed(name: &str, out: &str, ratio: f32) -> QuerySeed {
    QuerySeed {
        sql: format!(
            "WITH {out} AS ( \
             SELECT Tags.poseId AS poseId, 1.0 AS score \
             FROM TagInfo \
             INNER JOIN Tags ON TagInfo.id = Tags.tagId \
             WHERE TagInfo.name = :tag_name \
             LIMIT :limit )"
        ),
        params: vec![(":tag_name", Value::Text(name.to_string()))],
        ratio,
    }
}
