//! Storage abstraction for books.
//!
//! [`BookRepository`] is implemented by [`memory::InMemoryBookRepository`]
//! and [`sqlite::SqliteBookRepository`]; the backend is picked once at
//! startup by [`crate::registry`].

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Book, BookId, BookPatch};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryBookRepository;
pub use sqlite::SqliteBookRepository;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("book with ID = {0} doesn't exist")]
    NotFound(BookId),
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
    #[error("invalid persisted book data: {0}")]
    InvalidData(String),
    #[error("database schema version {found} is newer than supported {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },
    #[error("storage worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Data access contract shared by every storage backend.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Returns every stored book, in no particular order.
    async fn list(&self) -> RepoResult<Vec<Book>>;

    /// Looks a book up. `Ok(None)` means there is no such book.
    async fn get(&self, id: BookId) -> RepoResult<Option<Book>>;

    /// Stores `book` under `book.id`, which the caller has already assigned.
    async fn create(&self, book: &Book) -> RepoResult<()>;

    /// Merges `patch` onto the stored book and returns the merged record.
    ///
    /// Fails with [`RepoError::NotFound`] when nothing is stored under `id`.
    async fn update(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book>;

    /// Removes the book if present. Removing an absent book is not an error.
    async fn delete(&self, id: BookId) -> RepoResult<()>;
}
