use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::search::SearchEngine;
use crate::storage::{Database, blacklist, schema};

/// Shared state every CLI command runs against: the loaded configuration
/// and the open pose database with the blacklist attached.
pub struct AppContext {
    pub config: Config,
    pub db: Database,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        Self::open(config, cli.verbose)
    }

    pub fn open(config: Config, verbosity: u8) -> Result<Self> {
        let db = Database::open(&config.database.path)?;
        if let Some(extension) = &config.database.vector_extension {
            db.load_vector_extension(extension)?;
            schema::ensure_vector_schema(&db)?;
            tracing::debug!(path = %extension.display(), "vector extension loaded");
        }
        schema::ensure_schema(&db)?;
        blacklist::attach(&db, &config.database.blacklist_db())?;

        Ok(Self {
            config,
            db,
            verbosity,
        })
    }

    #[must_use]
    pub fn engine(&self) -> SearchEngine<'_> {
        SearchEngine::new(&self.db, self.config.search.tuning())
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.config.database.path.clone()
    }
}
