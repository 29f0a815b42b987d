use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;

/// Server state shared across handlers.
///
/// Cheap to clone: the pool is internally reference-counted.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }

    /// Initialize server state: work directory layout, then database
    /// (pool, WAL mode, migrations).
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("pantry.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::new(config.clone(), db.pool))
    }
}
