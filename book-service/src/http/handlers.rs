//! Request handlers for `/api/books`.
//!
//! Path and body problems are answered here with 400 before the use-case
//! layer sees the request.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::dto::{CreateBookRequest, UpdateBookRequest};
use super::error::ApiError;
use super::router::AppState;
use crate::model::{Book, BookId, NewBook};

type PathId = Result<Path<BookId>, PathRejection>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.books.get_all().await?;
    Ok(Json(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    id: PathId,
) -> Result<Json<Book>, ApiError> {
    let Path(id) = id?;
    match state.books.get_one(id).await? {
        Some(book) => Ok(Json(book)),
        None => Err(ApiError::NotFound),
    }
}

pub async fn create_book(
    State(state): State<AppState>,
    body: JsonBody<CreateBookRequest>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = body?;
    let book = NewBook::from(request);
    book.validate()?;
    state.books.create(book).await?;
    Ok(StatusCode::OK)
}

pub async fn update_book(
    State(state): State<AppState>,
    id: PathId,
    body: JsonBody<UpdateBookRequest>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(request) = body?;
    state.books.update(id, request.into()).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_book(
    State(state): State<AppState>,
    id: PathId,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.books.delete(id).await?;
    Ok(StatusCode::OK)
}
