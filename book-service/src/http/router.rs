use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{create_book, delete_book, get_book, list_books, update_book};
use crate::logging::{RequestSpan, ResponseLogger};
use crate::registry::Registry;
use crate::usecase::BookService;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<BookService>,
}

impl From<&Registry> for AppState {
    fn from(registry: &Registry) -> Self {
        Self {
            books: Arc::clone(&registry.books),
        }
    }
}

/// Builds the `/api` route table with request-id and access-log layers.
pub fn router(registry: &Registry) -> Router {
    let books = Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/:id",
            get(get_book).patch(update_book).delete(delete_book),
        );

    // The last layer added sees the request first, so the id exists before the span is made.
    Router::new()
        .nest("/api", books)
        .with_state(AppState::from(registry))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(RequestSpan)
                .on_request(())
                .on_response(ResponseLogger)
                .on_failure(()),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
