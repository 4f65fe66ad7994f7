//! Limb-flexion criteria (thigh and crus).
//!
//! Flexion rows hold one radian angle per leg (`is_right` 0/1). The score
//! sums, over both legs, `2 - err^2 / 2` where `err` is the absolute
//! angular difference to that leg's target; the `is_right` factor masks the
//! opposite leg's term out of each row.

use rusqlite::types::Value;

use super::QuerySeed;
use crate::units::Degree;

fn flexion_seed(table: &'static str, left: Degree, right: Degree, out: &str, ratio: f32) -> QuerySeed {
    QuerySeed {
        sql: format!(
            "WITH {out} AS ( \
             SELECT poseId, \
               SUM( \
                 2.0 - ( \
                   POW(ABS(angleRad - :target_left) * (1 - is_right), 2) + \
                   POW(ABS(angleRad - :target_right) * is_right, 2) \
                 ) / 2 \
               ) AS score \
             FROM {table} \
             GROUP BY poseId \
             LIMIT :limit )"
        ),
        params: vec![
            (":target_left", Value::Real(left.to_radian().get())),
            (":target_right", Value::Real(right.to_radian().get())),
        ],
        ratio,
    }
}

pub(super) fn thigh_seed(left: Degree, right: Degree, out: &str, ratio: f32) -> QuerySeed {
    flexion_seed("ThighFlexion", left, right, out, ratio)
}

pub(super) fn crus_seed(left: Degree, right: Degree, out: &str, ratio: f32) -> QuerySeed {
    flexion_seed("CrusFlexion", left, right, out, ratio)
}
