//! Wires a storage backend into the use-case layer.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::repository::{BookRepository, InMemoryBookRepository, RepoResult, SqliteBookRepository};
use crate::usecase::BookService;

/// Storage selected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite { path: PathBuf },
}

/// Use-case instances shared by every request handler.
#[derive(Clone)]
pub struct Registry {
    pub books: Arc<BookService>,
}

impl Registry {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self {
            books: Arc::new(BookService::new(repository)),
        }
    }

    pub async fn from_backend(backend: &StorageBackend) -> RepoResult<Self> {
        let repository: Arc<dyn BookRepository> = match backend {
            StorageBackend::Memory => Arc::new(InMemoryBookRepository::new()),
            StorageBackend::Sqlite { path } => Arc::new(SqliteBookRepository::open(path).await?),
        };
        info!(?backend, "storage backend selected");
        Ok(Self::new(repository))
    }
}
