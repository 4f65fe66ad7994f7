//! Search criteria and their SQL-fragment contract.
//!
//! A [`Criterion`] is one independent, weighted similarity axis: a body
//! direction, a yaw or pitch heading, a directory tag, or a limb-flexion
//! target. Each produces a self-contained [`QuerySeed`]: a `WITH <name> AS
//! (...)` common-table-expression whose materialization yields
//! `(poseId, score)` rows, a list of named parameter bindings, and the score
//! multiplier the orchestrator applies.
//!
//! The CTE name is always orchestrator-supplied and validated against an
//! identifier allow-list; user data only ever travels through bound
//! parameters.

pub mod body;
pub mod flexion;
pub mod tag;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::error::{PqError, Result};
use crate::storage::validate_identifier;
use crate::units::{Degree, Range};
use crate::utils::{Vec2, Vec3};

/// Magnitude bound of every criterion weight.
pub const RATIO_LIMIT: f32 = 2.0;

/// Weight applied to a freshly created criterion.
pub const DEFAULT_RATIO: f32 = 1.0;

/// The SQL fragment a criterion emits.
///
/// `sql` is a parameterized CTE; `:limit` is a reserved placeholder the
/// orchestrator binds with its adaptive candidate cap. `ratio` is the
/// multiplier applied to the fragment's scores during accumulation — for
/// direction-style criteria the sign of the caller's ratio has already been
/// folded into the search vector, so `ratio` is non-negative there.
#[derive(Debug, Clone)]
pub struct QuerySeed {
    pub sql: String,
    pub params: Vec<(&'static str, Value)>,
    pub ratio: f32,
}

/// Parameter payload of one criterion variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionKind {
    /// Full 3D torso direction, nearest-neighbor over the packed vectors.
    BodyDirection { dir: Vec3 },
    /// Horizontal heading as a unit `(sin yaw, cos yaw)` vector.
    BodyYaw { dir: Vec2 },
    /// Vertical tilt in degrees, `[-90, 90]`.
    BodyPitch { pitch: i32 },
    /// Directory tag membership.
    Tag { name: String },
    /// Target thigh flexion angles, left and right.
    ThighFlexion { left: Degree, right: Degree },
    /// Target crus (lower-leg) flexion angles, left and right.
    CrusFlexion { left: Degree, right: Degree },
}

/// One weighted search criterion: a variant payload plus its ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(flatten)]
    kind: CriterionKind,
    #[serde(default = "default_ratio")]
    ratio: f32,
}

fn default_ratio() -> f32 {
    DEFAULT_RATIO
}

impl Criterion {
    #[must_use]
    pub fn new(kind: CriterionKind) -> Self {
        Self {
            kind,
            ratio: DEFAULT_RATIO,
        }
    }

    #[must_use]
    pub fn body_direction(dir: Vec3) -> Self {
        Self::new(CriterionKind::BodyDirection { dir })
    }

    #[must_use]
    pub fn body_yaw(dir: Vec2) -> Self {
        Self::new(CriterionKind::BodyYaw { dir })
    }

    /// Yaw criterion from a heading angle.
    #[must_use]
    pub fn body_yaw_from_angle(yaw: Degree) -> Self {
        Self::body_yaw(Vec2::from_yaw(yaw))
    }

    #[must_use]
    pub fn body_pitch(pitch: i32) -> Self {
        Self::new(CriterionKind::BodyPitch { pitch })
    }

    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(CriterionKind::Tag { name: name.into() })
    }

    #[must_use]
    pub fn thigh_flexion(left: Degree, right: Degree) -> Self {
        Self::new(CriterionKind::ThighFlexion { left, right })
    }

    #[must_use]
    pub fn crus_flexion(left: Degree, right: Degree) -> Self {
        Self::new(CriterionKind::CrusFlexion { left, right })
    }

    #[must_use]
    pub const fn kind(&self) -> &CriterionKind {
        &self.kind
    }

    #[must_use]
    pub const fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Set the weight; values outside [`Self::ratio_range`] are rejected.
    pub fn set_ratio(&mut self, ratio: f32) -> Result<()> {
        self.check_ratio(ratio)?;
        self.ratio = ratio;
        Ok(())
    }

    /// Legal weight span: `[0, 2]` for variants without a meaningful
    /// opposite search direction, `[-2, 2]` otherwise.
    #[must_use]
    pub fn ratio_range(&self) -> Range<f32> {
        if self.supports_negative_ratio() {
            Range::new(-RATIO_LIMIT, RATIO_LIMIT)
        } else {
            Range::new(0.0, RATIO_LIMIT)
        }
    }

    const fn supports_negative_ratio(&self) -> bool {
        matches!(
            self.kind,
            CriterionKind::BodyDirection { .. }
                | CriterionKind::BodyYaw { .. }
                | CriterionKind::Tag { .. }
        )
    }

    fn check_ratio(&self, ratio: f32) -> Result<()> {
        if !ratio.is_finite() || !self.ratio_range().contains(ratio) {
            return Err(PqError::InvalidInput(format!(
                "ratio {ratio} outside legal range {:?} for {}",
                self.ratio_range(),
                self.label()
            )));
        }
        Ok(())
    }

    /// Validate the stored state; applied when loading a serialized list.
    pub fn validate(&self) -> Result<()> {
        self.check_ratio(self.ratio)
    }

    /// Stable variant label, used for display and diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.kind {
            CriterionKind::BodyDirection { .. } => "Body Direction",
            CriterionKind::BodyYaw { .. } => "Body Direction (Yaw)",
            CriterionKind::BodyPitch { .. } => "Body Direction (Pitch)",
            CriterionKind::Tag { .. } => "Directory Tag",
            CriterionKind::ThighFlexion { .. } => "Thigh Flexion",
            CriterionKind::CrusFlexion { .. } => "Crus Flexion",
        }
    }

    /// Human-readable summary including the ratio.
    #[must_use]
    pub fn summary(&self) -> String {
        let detail = match &self.kind {
            CriterionKind::BodyDirection { dir } => format!("dir: {dir}"),
            CriterionKind::BodyYaw { dir } => format!("yaw-dir: {dir}"),
            CriterionKind::BodyPitch { pitch } => format!("pitch: {pitch}"),
            CriterionKind::Tag { name } => format!("tag: {name}"),
            CriterionKind::ThighFlexion { left, right } => {
                format!("thigh-flexion: {left}, {right}")
            }
            CriterionKind::CrusFlexion { left, right } => {
                format!("crus-flexion: {left}, {right}")
            }
        };
        format!("{} {{ratio={}, {}}}", self.label(), self.ratio, detail)
    }

    /// Build the SQL fragment for this criterion.
    ///
    /// A pure function of the criterion's parameters and the *given* ratio
    /// (not the stored one), so a caller can re-weight without re-deriving
    /// the SQL structure. `output_table` names the CTE and must pass the
    /// identifier allow-list. A ratio outside the variant's legal range is
    /// rejected before any SQL is produced.
    pub fn sql_query(&self, output_table: &str, ratio: f32) -> Result<QuerySeed> {
        validate_identifier(output_table)?;
        self.check_ratio(ratio)?;
        Ok(match &self.kind {
            CriterionKind::BodyDirection { dir } => body::direction_seed(*dir, output_table, ratio),
            CriterionKind::BodyYaw { dir } => body::yaw_seed(*dir, output_table, ratio),
            CriterionKind::BodyPitch { pitch } => body::pitch_seed(*pitch, output_table, ratio),
            CriterionKind::Tag { name } => tag::tag_seed(name, output_table, ratio),
            CriterionKind::ThighFlexion { left, right } => {
                flexion::thigh_seed(*left, *right, output_table, ratio)
            }
            CriterionKind::CrusFlexion { left, right } => {
                flexion::crus_seed(*left, *right, output_table, ratio)
            }
        })
    }

    /// One default instance per variant. Callers clone an entry and edit its
    /// parameters to add it to a search list.
    #[must_use]
    pub fn prototypes() -> Vec<Self> {
        vec![
            Self::body_direction(Vec3::new(1.0, 0.0, 0.0)),
            Self::body_yaw(Vec2::new(-1.0, 0.0)),
            Self::body_pitch(0),
            Self::tag(""),
            Self::thigh_flexion(Degree::default(), Degree::default()),
            Self::crus_flexion(Degree::default(), Degree::default()),
        ]
    }
}

/// Parse a saved criterion list, validating every entry.
pub fn load_list(json: &str) -> Result<Vec<Criterion>> {
    let list: Vec<Criterion> =
        serde_json::from_str(json).map_err(|e| PqError::Serialization(e.to_string()))?;
    for criterion in &list {
        criterion.validate()?;
    }
    Ok(list)
}

/// Serialize a criterion list for saving.
pub fn save_list(list: &[Criterion]) -> Result<String> {
    serde_json::to_string_pretty(list).map_err(|e| PqError::Serialization(e.to_string()))
}
