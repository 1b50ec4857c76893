use anyhow::Result;
use axum::Router;
use cdn_purge::{
    AppConfig, FileSettings, HttpCdnClient, ProviderConfig, PurgeService, Settings, routes,
};
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + check-config flag ---
    let (cfg, check_config) = AppConfig::from_env_and_args()?;

    tracing::info!("Starting cdn-purge with config: {:?}", cfg);

    // --- Load the settings document ---
    let settings = FileSettings::load(&cfg.settings_path)?;

    // --- Handle check-config mode ---
    if check_config {
        check_settings(&settings)?;
        tracing::info!("Settings file {} is valid.", cfg.settings_path);
        return Ok(()); // exit after validation
    }

    // --- Initialize CDN client + core service ---
    let provider = ProviderConfig::from_settings(&settings)?;
    tracing::info!(
        api_url = %provider.api_url,
        company_alias = %provider.company_alias,
        "CDN provider configured"
    );

    let client = HttpCdnClient::new(provider);
    let purger = PurgeService::new(Arc::new(settings), Arc::new(client));

    // --- Build router ---
    let app: Router = routes::routes::routes().with_state(purger);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Validate the settings document the way the serving path would consume it.
fn check_settings(settings: &FileSettings) -> Result<()> {
    use cdn_purge::models::zone::ZoneMapEntry;

    let zone_map = settings
        .get("zone_map")
        .ok_or_else(|| anyhow::anyhow!("settings file is missing `zone_map`"))?;
    let entries: Vec<ZoneMapEntry> =
        serde_json::from_value(zone_map).map_err(|e| anyhow::anyhow!("`zone_map`: {}", e))?;
    if entries.is_empty() {
        tracing::warn!("zone_map is empty; every record will fail as unmapped");
    }

    let timeout = settings
        .get("purge_timeout")
        .ok_or_else(|| anyhow::anyhow!("settings file is missing `purge_timeout`"))?;
    match timeout.as_f64() {
        Some(secs) if secs.is_finite() && secs > 0.0 => {}
        _ => anyhow::bail!("`purge_timeout` must be a positive number, got {}", timeout),
    }

    ProviderConfig::from_settings(settings)?;

    tracing::info!(
        zones = entries.len(),
        "Validated {} zone mapping(s)",
        entries.len()
    );
    Ok(())
}
