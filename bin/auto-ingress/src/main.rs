use anyhow::Result;
use clap::Parser;
use ingress_core::{Bootstrap, EventProcessor, IngressBuilder, IngressClient};
use ingress_kube::{create_client, KubeIngressClient, ServiceWatch};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod settings;

use settings::{LogFormat, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();
    init_tracing(settings.log_format);
    settings.validate()?;

    info!("Starting auto-ingress...");
    info!("  - Wildcard domain: {}", settings.wildcard_domain);
    info!("  - TLS secret: {}", settings.tls_secret);

    let client = create_client(settings.kubeconfig.as_deref()).await?;
    let ingress_client: Arc<dyn IngressClient> = Arc::new(KubeIngressClient::new(client.clone()));
    let builder = Arc::new(IngressBuilder::new(
        settings.wildcard_domain.clone(),
        settings.tls_secret.clone(),
    ));

    // Bootstrap must finish before any live event is consumed
    info!("Initializing mapping between ingresses and services...");
    let inventory = Bootstrap::new(ingress_client.clone(), builder.clone())
        .reconcile()
        .await?;
    info!("Initialized inventory: {:?}", inventory.service_keys());

    let (tx, rx) = mpsc::channel(settings.event_buffer);
    tokio::spawn(ServiceWatch::new(client).run(tx));

    let processor = EventProcessor::new(ingress_client, builder, inventory);

    tokio::select! {
        _ = processor.run(rx) => {
            warn!("Event processor stopped, exiting...");
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received, exiting...");
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}
