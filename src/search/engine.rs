//! The search engine.
//!
//! Drives each criterion's SQL fragment into a per-criterion candidate
//! table, accumulates weighted scores into a per-search accumulation table,
//! and ranks the union against file metadata with the blacklist applied as
//! the final filter.
//!
//! The engine borrows the database exclusively and `search` takes
//! `&mut self`, so concurrent searches over one connection cannot
//! interleave — both would race on the fixed-name accumulation table.
//!
//! Failure policy is fail-fast: if any criterion's fragment fails, the
//! whole search aborts with [`PqError::Execution`] and the accumulation
//! transaction is rolled back. A caller keeps its previous result set.

use rusqlite::types::Value;

use crate::PoseId;
use crate::criterion::{Criterion, QuerySeed};
use crate::error::{PqError, Result};
use crate::search::CancelToken;
use crate::storage::sqlite::exec_error;
use crate::storage::{Database, blacklist};

/// CTE name every criterion fragment is asked to produce.
pub const OUTPUT_TABLE: &str = "result";

const SCORE_TABLE: &str = "score_accum";
const CANDIDATE_TABLE: &str = "candidate";
const SCORE_LAYOUT: &str = "poseId INTEGER NOT NULL, \
                            cond_index INTEGER NOT NULL, \
                            score REAL NOT NULL, \
                            PRIMARY KEY (poseId, cond_index)";

/// Knobs of the adaptive candidate-pool growth loop.
#[derive(Debug, Clone)]
pub struct SearchTuning {
    /// Stop growing once a criterion has at least this many candidates.
    pub hard_ceiling: i64,
    /// Stop growing once the worst candidate score falls to or below this.
    pub quality_floor: f64,
    /// Absolute bound on growth iterations per criterion.
    pub max_growth_rounds: u32,
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            hard_ceiling: 1000,
            quality_floor: 0.25,
            max_growth_rounds: 20,
        }
    }
}

/// Aggregate and per-criterion scores of one ranked pose.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub total: f64,
    /// One entry per criterion of the most recent search, in list order;
    /// zero where the criterion did not score this pose.
    pub per_criterion: Vec<f64>,
}

/// Multi-criteria search over one pose database.
pub struct SearchEngine<'a> {
    db: &'a Database,
    tuning: SearchTuning,
    /// Criterion count of the last completed search; `None` until the
    /// accumulation table is live.
    accumulated: Option<usize>,
}

impl<'a> SearchEngine<'a> {
    #[must_use]
    pub fn new(db: &'a Database, tuning: SearchTuning) -> Self {
        Self {
            db,
            tuning,
            accumulated: None,
        }
    }

    /// Run the criteria in list order and return ranked pose ids, best
    /// first. An empty criteria list yields an empty result, not an error.
    pub fn search(&mut self, limit: usize, criteria: &[Criterion]) -> Result<Vec<PoseId>> {
        self.search_with_cancel(limit, criteria, &CancelToken::default())
    }

    /// Like [`Self::search`], checking the token between criteria.
    pub fn search_with_cancel(
        &mut self,
        limit: usize,
        criteria: &[Criterion],
        cancel: &CancelToken,
    ) -> Result<Vec<PoseId>> {
        if criteria.is_empty() {
            return Ok(Vec::new());
        }
        let mut seeds = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            criterion.validate()?;
            seeds.push(criterion.sql_query(OUTPUT_TABLE, criterion.ratio())?);
        }
        tracing::info!(criteria = criteria.len(), limit, "searching");
        self.search_seeds_with_cancel(limit, &seeds, cancel)
    }

    /// Lower-level entry: drive pre-built fragments through accumulation
    /// and ranking. Each seed's CTE must be named [`OUTPUT_TABLE`].
    pub fn search_seeds(&mut self, limit: usize, seeds: &[QuerySeed]) -> Result<Vec<PoseId>> {
        self.search_seeds_with_cancel(limit, seeds, &CancelToken::default())
    }

    pub fn search_seeds_with_cancel(
        &mut self,
        limit: usize,
        seeds: &[QuerySeed],
        cancel: &CancelToken,
    ) -> Result<Vec<PoseId>> {
        if seeds.is_empty() {
            return Ok(Vec::new());
        }

        // The previous search's table is only dropped now, so inspection
        // stays valid between searches.
        self.accumulated = None;
        self.db.drop_table(SCORE_TABLE, true)?;

        self.db.begin_transaction()?;
        match self.accumulate(limit, seeds, cancel) {
            Ok(()) => self.db.commit_transaction()?,
            Err(e) => {
                let _ = self.db.rollback_transaction();
                let _ = self.db.drop_table(CANDIDATE_TABLE, true);
                return Err(e);
            }
        }
        self.accumulated = Some(seeds.len());

        self.collect_ranked(limit)
    }

    fn accumulate(&self, limit: usize, seeds: &[QuerySeed], cancel: &CancelToken) -> Result<()> {
        self.db.create_temp_table(SCORE_TABLE, SCORE_LAYOUT, false)?;
        for (index, seed) in seeds.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(PqError::Cancelled);
            }
            self.materialize(limit, seed)?;
            let sql = format!(
                "INSERT INTO temp.{SCORE_TABLE} \
                 SELECT poseId, ?1, score * ?2 FROM temp.{CANDIDATE_TABLE}"
            );
            let inserted = self
                .db
                .execute(&sql, rusqlite::params![index as i64, f64::from(seed.ratio)])?;
            self.db.drop_table(CANDIDATE_TABLE, true)?;
            tracing::debug!(index, ratio = seed.ratio, candidates = inserted, "criterion accumulated");
        }
        Ok(())
    }

    /// Materialize a seed's candidates under the adaptive cap.
    ///
    /// Starts at `max(2, limit)` and grows the cap by 50% per round until
    /// the candidate count stops changing, the hard ceiling is reached, or
    /// the worst candidate falls to the quality floor. A selective
    /// criterion thus pulls in enough candidates for fair aggregation while
    /// a permissive one stops early.
    fn materialize(&self, limit: usize, seed: &QuerySeed) -> Result<()> {
        let mut cap = (limit as i64).max(2);
        let mut previous_count = -1i64;

        for round in 0..self.tuning.max_growth_rounds {
            self.db.drop_table(CANDIDATE_TABLE, true)?;
            let sql = format!(
                "CREATE TEMPORARY TABLE {CANDIDATE_TABLE} AS {} \
                 SELECT poseId, score FROM {OUTPUT_TABLE}",
                seed.sql
            );
            self.execute_seed(&sql, &seed.params, cap)?;

            let count_sql = format!("SELECT COUNT(*), MIN(score) FROM temp.{CANDIDATE_TABLE}");
            let (count, min_score): (i64, Option<f64>) = self
                .db
                .conn()
                .query_row(&count_sql, [], |row| Ok((row.get(0)?, row.get(1)?)))
                .map_err(|e| exec_error(&count_sql, e))?;
            tracing::debug!(round, cap, count, min_score, "growth round");

            if count == previous_count || count >= self.tuning.hard_ceiling {
                break;
            }
            match min_score {
                None => break, // empty candidate set, nothing to grow
                Some(m) if m <= self.tuning.quality_floor => break,
                Some(_) => {}
            }
            previous_count = count;
            cap += cap >> 1;
        }
        Ok(())
    }

    fn execute_seed(&self, sql: &str, params: &[(&'static str, Value)], cap: i64) -> Result<usize> {
        let mut stmt = self
            .db
            .conn()
            .prepare(sql)
            .map_err(|e| exec_error(sql, e))?;
        for (name, value) in params {
            let index = stmt
                .parameter_index(name)
                .map_err(|e| exec_error(sql, e))?
                .ok_or_else(|| {
                    PqError::InvalidInput(format!("fragment has no placeholder {name}"))
                })?;
            stmt.raw_bind_parameter(index, value)
                .map_err(|e| exec_error(sql, e))?;
        }
        if let Some(index) = stmt
            .parameter_index(":limit")
            .map_err(|e| exec_error(sql, e))?
        {
            stmt.raw_bind_parameter(index, cap)
                .map_err(|e| exec_error(sql, e))?;
        }
        stmt.raw_execute().map_err(|e| exec_error(sql, e))
    }

    fn collect_ranked(&self, limit: usize) -> Result<Vec<PoseId>> {
        let sql = format!(
            "SELECT acc.poseId \
             FROM temp.{SCORE_TABLE} AS acc \
             INNER JOIN Pose ON acc.poseId = Pose.id \
             INNER JOIN File ON Pose.fileId = File.id \
             LEFT JOIN {}.Blacklist AS bl ON File.hash = bl.hash \
             WHERE bl.hash IS NULL \
             GROUP BY acc.poseId \
             ORDER BY SUM(acc.score) DESC, acc.poseId ASC \
             LIMIT ?1",
            blacklist::SCHEMA
        );
        let mut stmt = self
            .db
            .conn()
            .prepare(&sql)
            .map_err(|e| exec_error(&sql, e))?;
        let ids = stmt
            .query_map([limit as i64], |row| row.get(0))
            .map_err(|e| exec_error(&sql, e))?
            .collect::<std::result::Result<Vec<PoseId>, _>>()
            .map_err(|e| exec_error(&sql, e))?;
        Ok(ids)
    }

    /// Aggregate score and per-criterion contributions for a pose returned
    /// by the most recent search.
    pub fn score(&self, pose_id: PoseId) -> Result<ScoreBreakdown> {
        let Some(criteria_count) = self.accumulated else {
            return Err(PqError::NotFound(
                "no completed search holds a score table".to_string(),
            ));
        };

        let sql = format!(
            "SELECT cond_index, score FROM temp.{SCORE_TABLE} \
             WHERE poseId = ?1 ORDER BY cond_index ASC"
        );
        let mut stmt = self
            .db
            .conn()
            .prepare(&sql)
            .map_err(|e| exec_error(&sql, e))?;
        let rows = stmt
            .query_map([pose_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
            })
            .map_err(|e| exec_error(&sql, e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| exec_error(&sql, e))?;

        if rows.is_empty() {
            return Err(PqError::NotFound(format!(
                "pose {pose_id} not in the score table"
            )));
        }

        let mut per_criterion = vec![0.0; criteria_count];
        let mut total = 0.0;
        for (index, score) in rows {
            if let Some(slot) = per_criterion.get_mut(index as usize) {
                *slot = score;
            }
            total += score;
        }
        Ok(ScoreBreakdown {
            total,
            per_criterion,
        })
    }
}
