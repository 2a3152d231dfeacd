#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use book_service::{
    model::{Book, BookId, BookPatch},
    repository::{BookRepository, InMemoryBookRepository, RepoResult},
};
use serde_json::Value;
use tower::ServiceExt;

/// In-memory repository that counts every call it receives.
#[derive(Default)]
pub struct SpyRepository {
    inner: InMemoryBookRepository,
    calls: AtomicUsize,
}

impl SpyRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookRepository for SpyRepository {
    async fn list(&self) -> RepoResult<Vec<Book>> {
        self.record();
        self.inner.list().await
    }

    async fn get(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.record();
        self.inner.get(id).await
    }

    async fn create(&self, book: &Book) -> RepoResult<()> {
        self.record();
        self.inner.create(book).await
    }

    async fn update(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book> {
        self.record();
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: BookId) -> RepoResult<()> {
        self.record();
        self.inner.delete(id).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Sends one request through the router. Empty response bodies come back as
/// `Value::Null`.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Result<TestResponse> {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json)?)
        }
        None => Body::empty(),
    };

    let response = router.clone().oneshot(request.body(body)?).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok(TestResponse { status, body })
}
