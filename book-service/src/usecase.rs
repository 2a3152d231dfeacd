//! Book use-case service.
//!
//! Sits between the HTTP handlers and a [`BookRepository`]. Its only rule of
//! its own is identifier assignment; everything else is forwarded, and
//! repository errors come back unchanged.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::model::{Book, BookId, BookPatch, NewBook};
use crate::repository::{BookRepository, RepoResult};

pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> RepoResult<Vec<Book>> {
        self.repository.list().await
    }

    pub async fn get_one(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.repository.get(id).await
    }

    /// Mints a fresh identifier for `book` and stores it.
    pub async fn create(&self, book: NewBook) -> RepoResult<Book> {
        let book = book.into_book(Uuid::new_v4());
        self.repository.create(&book).await?;
        debug!(id = %book.id, "book created");
        Ok(book)
    }

    /// Applies `patch` to the book stored under `id`.
    ///
    /// The patch carries no identifier, so the stored book keeps `id` no
    /// matter what the caller sent alongside the changed fields.
    pub async fn update(&self, id: BookId, patch: BookPatch) -> RepoResult<Book> {
        let book = self.repository.update(id, &patch).await?;
        debug!(id = %id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: BookId) -> RepoResult<()> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::repository::{InMemoryBookRepository, RepoError};

    /// Records the books handed to `create` and fails every other call.
    #[derive(Default)]
    struct RecordingRepository {
        created: Mutex<Vec<Book>>,
    }

    #[async_trait]
    impl BookRepository for RecordingRepository {
        async fn list(&self) -> RepoResult<Vec<Book>> {
            Err(RepoError::InvalidData("list unavailable".into()))
        }

        async fn get(&self, id: BookId) -> RepoResult<Option<Book>> {
            Err(RepoError::NotFound(id))
        }

        async fn create(&self, book: &Book) -> RepoResult<()> {
            self.created.lock().unwrap().push(book.clone());
            Ok(())
        }

        async fn update(&self, id: BookId, _patch: &BookPatch) -> RepoResult<Book> {
            Err(RepoError::NotFound(id))
        }

        async fn delete(&self, _id: BookId) -> RepoResult<()> {
            Err(RepoError::InvalidData("delete unavailable".into()))
        }
    }

    #[tokio::test]
    async fn create_assigns_distinct_identifiers() {
        let repo = Arc::new(RecordingRepository::default());
        let service = BookService::new(repo.clone());

        let first = service
            .create(NewBook::new("Dune", "Herbert", 1965))
            .await
            .expect("first create");
        let second = service
            .create(NewBook::new("Dune", "Herbert", 1965))
            .await
            .expect("second create");

        assert_ne!(first.id, second.id);
        assert!(!first.id.is_nil());
        let created = repo.created.lock().unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].id, first.id);
        assert_eq!(created[0].title, "Dune");
    }

    #[tokio::test]
    async fn repository_errors_propagate_unchanged() {
        let service = BookService::new(Arc::new(RecordingRepository::default()));
        let id = Uuid::new_v4();

        assert!(matches!(
            service.get_all().await,
            Err(RepoError::InvalidData(message)) if message == "list unavailable"
        ));
        assert!(matches!(
            service.get_one(id).await,
            Err(RepoError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(
            service.update(id, BookPatch::default()).await,
            Err(RepoError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(
            service.delete(id).await,
            Err(RepoError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn update_keeps_the_path_identifier() {
        let service = BookService::new(Arc::new(InMemoryBookRepository::new()));
        let created = service
            .create(NewBook::new("A", "B", 2000))
            .await
            .expect("create");

        let updated = service
            .update(created.id, BookPatch::new(None, Some("Z".into()), None))
            .await
            .expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "A");
        assert_eq!(updated.author, "Z");
        assert_eq!(updated.year, 2000);
    }
}
