use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookRepository, RepoError, RepoResult};
use crate::model::{Book, BookId, BookPatch};

/// Process-local book table.
///
/// The whole table sits behind one reader/writer lock: lookups share it,
/// every mutation holds it exclusively for the duration of one call.
#[derive(Default)]
pub struct InMemoryBookRepository {
    books: RwLock<HashMap<BookId, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self) -> RepoResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books.values().cloned().collect())
    }

    async fn get(&self, id: BookId) -> RepoResult<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.get(&id).cloned())
    }

    async fn create(&self, book: &Book) -> RepoResult<()> {
        // No collision check: an existing entry under the same id is replaced.
        let mut books = self.books.write().await;
        books.insert(book.id, book.clone());
        Ok(())
    }

    async fn update(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book> {
        let mut books = self.books.write().await;
        let current = books.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        *current = patch.apply(current);
        Ok(current.clone())
    }

    async fn delete(&self, id: BookId) -> RepoResult<()> {
        let mut books = self.books.write().await;
        books.remove(&id);
        Ok(())
    }
}
