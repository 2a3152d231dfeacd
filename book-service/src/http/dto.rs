use serde::Deserialize;

use crate::model::{BookPatch, NewBook};

/// Body of `POST /api/books`. Every field is required.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub year: u16,
}

impl From<CreateBookRequest> for NewBook {
    fn from(request: CreateBookRequest) -> Self {
        NewBook::new(request.title, request.author, request.year)
    }
}

/// Body of `PATCH /api/books/{id}`. Missing, blank, or zero fields are left
/// unchanged; any `id` in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<u16>,
}

impl From<UpdateBookRequest> for BookPatch {
    fn from(request: UpdateBookRequest) -> Self {
        BookPatch::new(request.title, request.author, request.year)
    }
}
