//! SQLite upload backend (feature `sqlite`).
//!
//! One table per log label.  Every column is `TEXT`; NULL cells become SQL
//! `NULL`.  Columns that appear in later uploads are added with
//! `ALTER TABLE … ADD COLUMN`, so earlier rows read back as `NULL` there.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use sl_store::TableSnapshot;

use crate::upload::Uploader;
use crate::{OutputError, OutputResult};

/// Appends uploaded tables to an SQLite database.
pub struct SqliteUploader {
    conn: Mutex<Connection>,
}

impl SqliteUploader {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// In-memory database, for tests and short-lived tools.
    pub fn in_memory() -> OutputResult<Self> {
        Ok(Self { conn: Mutex::new(Connection::open_in_memory()?) })
    }

    /// Run `f` against the underlying connection.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> OutputResult<T> {
        let conn = self.conn.lock().map_err(|_| OutputError::Poisoned)?;
        Ok(f(&conn)?)
    }
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn existing_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote(table)))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    names.collect()
}

impl Uploader for SqliteUploader {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn upload(&self, snapshot: &TableSnapshot) -> OutputResult<()> {
        let columns = snapshot.columns();
        if columns.is_empty() {
            return Ok(());
        }
        let table = quote(snapshot.label());
        let conn = self.conn.lock().map_err(|_| OutputError::Poisoned)?;

        let defs: Vec<String> = columns.iter().map(|c| format!("{} TEXT", quote(c.name()))).collect();
        conn.execute_batch(&format!("CREATE TABLE IF NOT EXISTS {table} ({});", defs.join(", ")))?;

        let known = existing_columns(&conn, snapshot.label())?;
        for column in columns.iter().filter(|c| !known.iter().any(|k| k == c.name())) {
            debug!(table = snapshot.label(), column = column.name(), "adding sqlite column");
            conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {} TEXT;", quote(column.name())))?;
        }

        if snapshot.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = columns.iter().map(|c| quote(c.name())).collect();
        let slots: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!("INSERT INTO {table} ({}) VALUES ({})", names.join(", "), slots.join(", "));

        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for row in 0..snapshot.nb_lines() {
                let cells = columns.iter().map(|c| c.cells().get(row).cloned().flatten());
                stmt.execute(params_from_iter(cells))?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
