//! Kubernetes integration for the auto-ingress controller
pub mod client;
pub mod watch;

pub use client::{create_client, KubeIngressClient};
pub use watch::{ServiceCache, ServiceWatch};
