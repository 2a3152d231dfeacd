//! HTTP boundary: route table, request/response bodies and error mapping.
//!
//! | Method | Path              | Success      |
//! |--------|-------------------|--------------|
//! | GET    | `/api/books`      | 200, books   |
//! | GET    | `/api/books/{id}` | 200, book    |
//! | POST   | `/api/books`      | 200, empty   |
//! | PATCH  | `/api/books/{id}` | 200, empty   |
//! | DELETE | `/api/books/{id}` | 200, empty   |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use router::{AppState, router};
