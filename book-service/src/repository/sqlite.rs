//! SQLite-backed book repository.
//!
//! Every operation opens its own connection on a blocking worker thread, so
//! the service keeps no lock of its own; concurrent writers are serialized by
//! SQLite itself. Rows carry a `deleted_at` tombstone: reads skip tombstoned
//! rows, [`SqliteBookRepository::soft_delete`] sets it, and
//! [`BookRepository::delete`] removes the row outright.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use tracing::{debug, info};
use uuid::Uuid;

use super::{BookRepository, RepoError, RepoResult};
use crate::model::{Book, BookId, BookPatch};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const BOOK_SELECT_SQL: &str = "SELECT id, title, author, year FROM books";

const NOW_MS_SQL: &str = "(strftime('%s', 'now') * 1000)";

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("../../migrations/0001_books.sql"),
}];

pub struct SqliteBookRepository {
    path: PathBuf,
}

impl SqliteBookRepository {
    /// Opens (creating if needed) the database at `path` and applies pending
    /// schema migrations.
    pub async fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let migrate_path = path.clone();
        let started_at = Instant::now();

        let version = tokio::task::spawn_blocking(move || -> RepoResult<u32> {
            let mut conn = open_connection(&migrate_path)?;
            apply_migrations(&mut conn)
        })
        .await??;

        info!(
            path = %path.display(),
            schema_version = version,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "sqlite storage ready"
        );
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Marks a book as deleted without removing its row.
    ///
    /// Tombstoned books disappear from [`BookRepository::list`] and
    /// [`BookRepository::get`]. Fails with [`RepoError::NotFound`] when no
    /// live row matches.
    pub async fn soft_delete(&self, id: BookId) -> RepoResult<()> {
        self.run(move |conn| {
            let changed = conn.execute(
                &format!(
                    "UPDATE books SET deleted_at = {NOW_MS_SQL}, updated_at = {NOW_MS_SQL}
                     WHERE id = ?1 AND deleted_at IS NULL;"
                ),
                [id.to_string()],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn run<T, F>(&self, operation: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> RepoResult<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = open_connection(&path)?;
            operation(&mut conn)
        })
        .await?
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn list(&self) -> RepoResult<Vec<Book>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{BOOK_SELECT_SQL} WHERE deleted_at IS NULL ORDER BY created_at ASC, id ASC;"
            ))?;
            let mut rows = stmt.query([])?;
            let mut books = Vec::new();
            while let Some(row) = rows.next()? {
                books.push(parse_book_row(row)?);
            }
            Ok(books)
        })
        .await
    }

    async fn get(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.run(move |conn| select_live(conn, id)).await
    }

    async fn create(&self, book: &Book) -> RepoResult<()> {
        let book = book.clone();
        self.run(move |conn| {
            // A duplicate id fails on the primary key instead of overwriting.
            conn.execute(
                "INSERT INTO books (id, title, author, year) VALUES (?1, ?2, ?3, ?4);",
                params![book.id.to_string(), book.title, book.author, book.year],
            )?;
            debug!(id = %book.id, "book row inserted");
            Ok(())
        })
        .await
    }

    async fn update(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book> {
        let patch = patch.clone();
        self.run(move |conn| {
            // Takes the write lock up front so concurrent writers wait in the
            // busy handler. Dropping the transaction on an early return rolls it back.
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = select_live(&tx, id)?.ok_or(RepoError::NotFound(id))?;
            let merged = patch.apply(&current);
            tx.execute(
                &format!(
                    "UPDATE books SET title = ?1, author = ?2, year = ?3, updated_at = {NOW_MS_SQL}
                     WHERE id = ?4;"
                ),
                params![merged.title, merged.author, merged.year, id.to_string()],
            )?;
            tx.commit()?;
            Ok(merged)
        })
        .await
    }

    async fn delete(&self, id: BookId) -> RepoResult<()> {
        self.run(move |conn| {
            conn.execute("DELETE FROM books WHERE id = ?1;", [id.to_string()])?;
            Ok(())
        })
        .await
    }
}

fn open_connection(path: &Path) -> RepoResult<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

fn apply_migrations(conn: &mut Connection) -> RepoResult<u32> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if current > latest {
        return Err(RepoError::UnsupportedSchema {
            found: current,
            supported: latest,
        });
    }
    if current == latest {
        return Ok(current);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(latest)
}

fn select_live(conn: &Connection, id: BookId) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!(
        "{BOOK_SELECT_SQL} WHERE id = ?1 AND deleted_at IS NULL;"
    ))?;
    stmt.query_row([id.to_string()], |row| Ok(parse_book_row(row)))
        .optional()?
        .transpose()
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in books.id")))?;

    let year: i64 = row.get("year")?;
    let year = u16::try_from(year)
        .ok()
        .filter(|year| *year != 0)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid year `{year}` in books.year")))?;

    Ok(Book {
        id,
        title: row.get("title")?,
        author: row.get("author")?,
        year,
    })
}
