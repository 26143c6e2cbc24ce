use std::path::{Path, PathBuf};

use orderbridge::adapter::outbound::sqlite::{
    create_pool, run_migrations, DbPool, SqliteOrderStore,
};
use tempfile::TempDir;

/// Temporary, migrated SQLite database for integration tests.
///
/// The file lives in its own temp directory, removed on drop together with
/// the WAL side files.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
    pool: DbPool,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix("orderbridge-")
            .tempdir()
            .expect("create temp dir");
        let path = dir.path().join(format!("{name}.db"));

        let pool = create_pool(path.to_str().expect("utf-8 temp path")).expect("create sqlite pool");
        run_migrations(&pool).expect("run migrations");

        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Database location as accepted by `Config::database`.
    pub fn location(&self) -> String {
        self.path.display().to_string()
    }

    pub fn store(&self) -> SqliteOrderStore {
        SqliteOrderStore::new(self.pool.clone())
    }
}
