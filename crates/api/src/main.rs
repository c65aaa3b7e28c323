use std::sync::Arc;

use anyhow::Context;

use stockgate_api::config::AppConfig;
use stockgate_auth::{IdentityStore, InMemoryIdentityStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    stockgate_observability::init(
        config.as_ref().map(|c| c.log_format).unwrap_or_default(),
    );
    let config = config.inspect_err(|e| tracing::error!(error = %e, "refusing to start"))?;

    let store = load_identity_store(&config)?;
    let services = stockgate_api::app::build_services(&config, store);
    let app = stockgate_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_identity_store(config: &AppConfig) -> anyhow::Result<Arc<dyn IdentityStore>> {
    let Some(path) = &config.identity_seed_path else {
        tracing::warn!("IDENTITY_SEED_PATH not set; starting with an empty identity store");
        return Ok(Arc::new(InMemoryIdentityStore::new()));
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read identity seed {}", path.display()))?;
    let store = InMemoryIdentityStore::from_json(&json)
        .with_context(|| format!("invalid identity seed {}", path.display()))?;

    tracing::info!(identities = store.len(), "identity store seeded");
    Ok(Arc::new(store))
}
