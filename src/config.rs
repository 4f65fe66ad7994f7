use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PqError, Result};
use crate::search::SearchTuning;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration: defaults, then the config file (explicit path,
    /// `PQ_CONFIG`, or the per-user default location), then `PQ_*` env
    /// overrides. A missing file is not an error; a malformed one is.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("PQ_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(PqError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else if let Some(path) = default_config_path() {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        }

        config.apply_env_overrides()?;
        config.search.validate()?;

        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| PqError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| PqError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.database {
            self.database.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("PQ_DB") {
            self.database.path = PathBuf::from(value);
        }
        if let Some(value) = env_string("PQ_BLACKLIST") {
            self.database.blacklist_path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_string("PQ_VEC_EXTENSION") {
            self.database.vector_extension = Some(PathBuf::from(value));
        }
        if let Some(value) = env_i64("PQ_SEARCH_HARD_CEILING")? {
            self.search.hard_ceiling = value;
        }
        if let Some(value) = env_f64("PQ_SEARCH_QUALITY_FLOOR")? {
            self.search.quality_floor = value;
        }
        if let Some(value) = env_u32("PQ_SEARCH_MAX_GROWTH_ROUNDS")? {
            self.search.max_growth_rounds = value;
        }
        if let Some(value) = env_usize("PQ_SEARCH_DEFAULT_LIMIT")? {
            self.search.default_limit = value;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the pose database.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Blacklist database path; defaults to `blacklist.db` next to the
    /// pose database.
    #[serde(default)]
    pub blacklist_path: Option<PathBuf>,
    /// Loadable sqlite-vec module. Without it, only non-vector criteria
    /// (tag and flexion) work.
    #[serde(default)]
    pub vector_extension: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            blacklist_path: None,
            vector_extension: None,
        }
    }
}

impl DatabaseConfig {
    fn merge(&mut self, patch: DatabasePatch) {
        if let Some(value) = patch.path {
            self.path = value;
        }
        if let Some(value) = patch.blacklist_path {
            self.blacklist_path = Some(value);
        }
        if let Some(value) = patch.vector_extension {
            self.vector_extension = Some(value);
        }
    }

    #[must_use]
    pub fn blacklist_db(&self) -> PathBuf {
        self.blacklist_path.clone().unwrap_or_else(|| {
            self.path
                .parent()
                .map_or_else(|| PathBuf::from("blacklist.db"), Path::to_path_buf)
                .join("blacklist.db")
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_hard_ceiling")]
    pub hard_ceiling: i64,
    #[serde(default = "default_quality_floor")]
    pub quality_floor: f64,
    #[serde(default = "default_max_growth_rounds")]
    pub max_growth_rounds: u32,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hard_ceiling: default_hard_ceiling(),
            quality_floor: default_quality_floor(),
            max_growth_rounds: default_max_growth_rounds(),
            default_limit: default_limit(),
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.hard_ceiling {
            self.hard_ceiling = value;
        }
        if let Some(value) = patch.quality_floor {
            self.quality_floor = value;
        }
        if let Some(value) = patch.max_growth_rounds {
            self.max_growth_rounds = value;
        }
        if let Some(value) = patch.default_limit {
            self.default_limit = value;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.hard_ceiling < 1 {
            return Err(PqError::Config(
                "search.hard_ceiling must be at least 1".to_string(),
            ));
        }
        if !self.quality_floor.is_finite() {
            return Err(PqError::Config(
                "search.quality_floor must be finite".to_string(),
            ));
        }
        if self.max_growth_rounds == 0 {
            return Err(PqError::Config(
                "search.max_growth_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn tuning(&self) -> SearchTuning {
        SearchTuning {
            hard_ceiling: self.hard_ceiling,
            quality_floor: self.quality_floor,
            max_growth_rounds: self.max_growth_rounds,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub database: Option<DatabasePatch>,
    pub search: Option<SearchPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabasePatch {
    pub path: Option<PathBuf>,
    pub blacklist_path: Option<PathBuf>,
    pub vector_extension: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub hard_ceiling: Option<i64>,
    pub quality_floor: Option<f64>,
    pub max_growth_rounds: Option<u32>,
    pub default_limit: Option<usize>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pq/config.toml"))
}

fn default_db_path() -> PathBuf {
    PathBuf::from("poses.db")
}

const fn default_hard_ceiling() -> i64 {
    1000
}

const fn default_quality_floor() -> f64 {
    0.25
}

const fn default_max_growth_rounds() -> u32 {
    20
}

const fn default_limit() -> usize {
    50
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_i64(key: &str) -> Result<Option<i64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|err| PqError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| PqError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| PqError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|err| PqError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
