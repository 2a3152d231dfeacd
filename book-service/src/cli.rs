use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};

use crate::registry::StorageBackend;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Socket address the HTTP server binds to. Use port 0 for an ephemeral port.
    #[arg(long, env = "BOOK_SERVICE_ADDRESS", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Where books are stored.
    #[arg(long, env = "BOOK_SERVICE_STORAGE", value_enum, default_value_t = StorageKind::Memory)]
    pub storage: StorageKind,

    /// SQLite database file, required with `--storage sqlite`.
    #[arg(long, env = "BOOK_SERVICE_DATABASE", required_if_eq("storage", "sqlite"))]
    pub database: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, env = "BOOK_SERVICE_DEVELOPMENT")]
    pub development: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Process-local table, lost on exit.
    Memory,
    /// SQLite database file.
    Sqlite,
}

impl Cli {
    pub fn storage_backend(&self) -> Result<StorageBackend> {
        match (self.storage, &self.database) {
            (StorageKind::Memory, _) => Ok(StorageBackend::Memory),
            (StorageKind::Sqlite, Some(path)) => Ok(StorageBackend::Sqlite { path: path.clone() }),
            (StorageKind::Sqlite, None) => bail!("--database is required with --storage sqlite"),
        }
    }
}
