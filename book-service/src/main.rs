use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use book_service::{app::App, cli::Cli, logging::init_tracing, registry::Registry};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.development);

    let backend = cli.storage_backend()?;
    let registry = Registry::from_backend(&backend)
        .await
        .context("failed to open storage")?;

    let app = App::bind(cli.listen, &registry).await?;
    let addr = app.local_addr()?;
    info!("book service listening on {}", addr);
    if let Err(err) = app.run_until_signal().await {
        warn!("book service exited with error: {err:?}");
        return Err(err);
    }

    Ok(())
}
