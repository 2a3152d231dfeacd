//! HTTP service exposing CRUD operations over books.
//!
//! Requests flow router → handler → use-case → repository, and results flow
//! back unchanged except for error-to-status translation at the handler
//! boundary. Each module focuses on one layer:
//!
//! - [`model`] defines `Book`, creation input, and the partial-update patch.
//! - [`repository`] is the storage contract with an in-memory and a SQLite
//!   implementation.
//! - [`usecase`] assigns identifiers and forwards everything else.
//! - [`registry`] picks a storage backend and wires it into the use-case.
//! - [`http`] holds the route table, handlers, and error mapping.
//! - [`logging`] sets up tracing and the per-request access log.
//! - [`app`] owns the listener and the server lifecycle.
//! - [`cli`] parses command-line and environment configuration.

pub mod app;
pub mod cli;
pub mod http;
pub mod logging;
pub mod model;
pub mod registry;
pub mod repository;
pub mod usecase;
