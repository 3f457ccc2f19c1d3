//! services/catalogue/src/bin/catalogue.rs

use catalogue_core::session::SessionStore;
use catalogue_lib::{
    adapters::{http::HttpCatalogueClient, token_file::FileTokenStorage},
    config::Config,
    error::ClientError,
    shell::Shell,
    views::AppState,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    // Logs go to stderr so they never interleave with the pages on stdout.
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api = %config.api_base_url, "Configuration loaded. Starting client...");

    // --- 2. Restore the Session ---
    let storage = Arc::new(FileTokenStorage::new(config.token_path.clone()));
    let session = Arc::new(SessionStore::new(storage));
    info!(authenticated = session.is_authenticated(), "Session restored");

    // --- 3. Initialize the Backend Adapter ---
    let api = Arc::new(HttpCatalogueClient::new(
        config.api_base_url.clone(),
        session.clone(),
        config.http_timeout,
    )?);

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        api,
        session,
        config: config.clone(),
    });

    // --- 5. Run the Shell ---
    let input = BufReader::new(tokio::io::stdin());
    let mut shell = Shell::new(app_state, input, std::io::stdout());
    shell.run().await
}
