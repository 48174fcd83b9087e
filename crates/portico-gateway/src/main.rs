//! Command-line harness for the Portico gateway
//!
//! Reads an invocation envelope from a JSON file, runs it through the
//! pipeline against the configured service, and prints the HTTP-shaped
//! response.

use anyhow::{Context, Result};
use portico_client::HttpServiceClient;
use portico_gateway::{Envelope, Gateway, GatewayConfig};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = std::env::args()
        .nth(1)
        .context("usage: portico-gateway <event.json>")?;
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read event file {path}"))?;
    let event: Envelope =
        serde_json::from_str(&text).with_context(|| format!("invalid event JSON in {path}"))?;

    let client = HttpServiceClient::new(
        &config.service_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let gateway = Gateway::new(&config, Arc::new(client))?;

    let response = gateway.handle(event, json!({})).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
