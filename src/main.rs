//! WhatsApp dispatch - command-line driver
//!
//! Reads one contact as JSON from stdin, renders the template given as the first
//! argument, sends it, and prints the outcome as JSON on stdout. Credentials come
//! from `WHATSAPP_API_KEY` / `WHATSAPP_ENABLED`.
//!
//! ```text
//! echo '{"phone":"9876543210","firstname":"Asha"}' | whatsapp-dispatch 'Hi {contact_firstname}'
//! ```

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use whatsapp_transport::{
    AsyncDispatcher, AsyncSmsTransport, Config, ContactRecord, Dispatcher, EnvProviderLookup,
    ProviderLookup,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Logs go to stderr so stdout carries only the outcome
    let default_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let Some(template) = std::env::args().nth(1) else {
        bail!("usage: whatsapp-dispatch <template>  (contact JSON on stdin)");
    };

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read contact from stdin")?;
    let contact: ContactRecord =
        serde_json::from_str(&input).context("stdin is not a valid contact JSON object")?;

    info!(
        "Sending through {} (default region {}, timeout {}s)",
        config.api_url, config.default_region, config.request_timeout
    );

    let lookup = Arc::new(EnvProviderLookup) as Arc<dyn ProviderLookup>;
    let dispatcher = Dispatcher::from_config(&config, lookup)?;
    let transport = AsyncDispatcher::new(dispatcher);

    let outcome = transport.send(&contact, &template).await;
    println!("{}", serde_json::to_string(&outcome)?);

    info!(
        "Metrics: {}",
        serde_json::to_string(&transport.dispatcher().metrics().summary())?
    );

    if let Some(reason) = outcome.failure() {
        error!("Dispatch failed ({}): {}", reason.tag(), reason);
        std::process::exit(1);
    }

    Ok(())
}
