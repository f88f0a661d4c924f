//! Command-line and environment settings

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// auto-ingress - creates Ingresses for Services labeled public=true
#[derive(Parser, Debug, Clone)]
#[command(name = "auto-ingress", version, about, long_about = None)]
pub struct Settings {
    /// DNS wildcard domain for generated hosts, e.g. example.com
    #[arg(long, env = "AUTO_INGRESS_SERVER_NAME")]
    pub wildcard_domain: String,

    /// TLS secret referenced by every generated Ingress
    #[arg(long, env = "AUTO_INGRESS_SECRET")]
    pub tls_secret: String,

    /// Absolute path to a kubeconfig file; in-cluster config when omitted
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Log output format
    #[arg(long, env = "AUTO_INGRESS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Capacity of the Service event queue
    #[arg(long, default_value_t = 64)]
    pub event_buffer: usize,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.wildcard_domain.trim().is_empty() {
            bail!("wildcard domain must not be empty (--wildcard-domain / AUTO_INGRESS_SERVER_NAME)");
        }
        if self.wildcard_domain.starts_with('.') {
            bail!(
                "wildcard domain must not start with '.', got {:?}",
                self.wildcard_domain
            );
        }
        if self.tls_secret.trim().is_empty() {
            bail!("TLS secret must not be empty (--tls-secret / AUTO_INGRESS_SECRET)");
        }
        if self.event_buffer == 0 {
            bail!("event buffer must be greater than zero");
        }
        Ok(())
    }
}
