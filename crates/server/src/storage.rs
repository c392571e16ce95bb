use anyhow::{Context, Result};
use oncall_api::ServiceError;
use oncall_api::db::{Built, migrations::MIGRATIONS};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use sea_query_rusqlite::{RusqliteValue, RusqliteValues};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared database state, handed to every handler through the router state.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open (or create) a database file and run migrations.
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("opening SQLite database {}", path.display()))?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, used by tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        run_migrations(&conn)?;
        Ok(Db {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Lock the connection. A panic while the lock was held leaves nothing
    /// half-written (open transactions roll back on drop), so poisoning is
    /// ignored.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `work` inside one transaction and commit only if it returns `Ok`.
    ///
    /// The transaction is `IMMEDIATE`: the database write lock is taken at
    /// BEGIN, so concurrent units of work (from this or any other connection)
    /// run one after another and never interleave their reads and writes.
    /// Returning `Err` or panicking drops the transaction, which rolls back.
    pub fn unit_of_work<T, F>(&self, work: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&UnitOfWork<'_>) -> Result<T, ServiceError>,
    {
        let mut conn = self.conn();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(ServiceError::from_db("begin transaction"))?;
        let uow = UnitOfWork { tx };

        let out = work(&uow)?;

        uow.tx
            .commit()
            .map_err(ServiceError::from_db("commit transaction"))?;
        Ok(out)
    }
}

/// An open transaction. Obtained only through [`Db::unit_of_work`].
pub struct UnitOfWork<'c> {
    tx: Transaction<'c>,
}

impl UnitOfWork<'_> {
    /// Execute a statement, returning the number of rows affected.
    pub fn execute(&self, built: Built, context: &str) -> Result<usize, ServiceError> {
        execute(&self.tx, built).map_err(ServiceError::from_db(context))
    }
}

// ── Statement helpers ─────────────────────────────────────────────────────

fn bind(values: sea_query::Values) -> RusqliteValues {
    RusqliteValues(values.0.into_iter().map(RusqliteValue).collect())
}

/// Execute a built statement, returning the number of rows affected.
pub fn execute(conn: &Connection, (sql, values): Built) -> rusqlite::Result<usize> {
    let values = bind(values);
    conn.execute(&sql, &*values.as_params())
}

/// Run a built query expected to return at most one row.
pub fn query_row<T, F>(conn: &Connection, (sql, values): Built, f: F) -> rusqlite::Result<Option<T>>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    let values = bind(values);
    conn.query_row(&sql, &*values.as_params(), f).optional()
}

/// Run a built query and map every row.
pub fn query_all<T, F>(conn: &Connection, (sql, values): Built, f: F) -> rusqlite::Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let values = bind(values);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(&*values.as_params(), f)?;
    rows.collect()
}

/// Initialize the database under `data_dir`: open, enable WAL, run migrations.
pub fn init_db(data_dir: &Path) -> Result<Db> {
    std::fs::create_dir_all(data_dir)?;
    Db::open_path(&data_dir.join("oncall.db"))
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for &(name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;

        if !already_applied {
            conn.execute_batch(sql)
                .with_context(|| format!("running migration {name}"))?;
            conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
            tracing::info!("Applied migration: {name}");
        }
    }

    Ok(())
}
