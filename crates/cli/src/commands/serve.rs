//! Serve command - run the recommendation HTTP API

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::recommend::build_usecase;
use crate::args::ServeArgs;
use crate::config::AppConfig;
use crate::server;

pub async fn execute(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    let catalog_path = args.catalog.as_ref().unwrap_or(&config.catalog.path);
    let bind_address = args.bind.as_deref().unwrap_or(&config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);

    let usecase = Arc::new(build_usecase(&config, catalog_path).await);

    tracing::info!(
        catalog = %catalog_path.display(),
        use_mock = config.llm.use_mock,
        provider = %config.llm.provider,
        "Starting recommendation server"
    );

    server::serve(bind_address, port, usecase)
        .await
        .with_context(|| format!("Server failed on {}:{}", bind_address, port))
}
