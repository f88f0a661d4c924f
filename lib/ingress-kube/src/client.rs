//! Kubernetes client for Service and Ingress operations

use async_trait::async_trait;
use ingress_api::{IngressDescriptor, ObjectKey, ServiceDescriptor};
use ingress_core::{IngressClient, Result};
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, ResourceExt};
use std::path::Path;
use tracing::debug;

/// Create a kube client from an optional kubeconfig path
///
/// Without a path the configuration is inferred: in-cluster service account
/// when running in a pod, the local kubeconfig otherwise.
pub async fn create_client(kubeconfig: Option<&Path>) -> Result<Client> {
    match kubeconfig {
        Some(path) => {
            debug!("Loading kubeconfig from {}", path.display());
            let kubeconfig = Kubeconfig::read_from(path)?;
            let config =
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
            Ok(Client::try_from(config)?)
        }
        None => Ok(Client::try_default().await?),
    }
}

/// KubeIngressClient performs the reconciler's cluster calls with kube
#[derive(Clone)]
pub struct KubeIngressClient {
    client: Client,
}

impl KubeIngressClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IngressClient for KubeIngressClient {
    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>> {
        let services: Api<Service> = Api::all(self.client.clone());
        let list = services.list(&ListParams::default()).await?;

        debug!("Listed {} services", list.items.len());
        Ok(list.items.iter().map(ServiceDescriptor::from).collect())
    }

    async fn list_ingresses(&self) -> Result<Vec<IngressDescriptor>> {
        let ingresses: Api<Ingress> = Api::all(self.client.clone());
        let list = ingresses.list(&ListParams::default()).await?;

        debug!("Listed {} ingresses", list.items.len());
        Ok(list.items.iter().map(IngressDescriptor::from).collect())
    }

    async fn create_ingress(&self, ingress: &Ingress) -> Result<ObjectKey> {
        let namespace = ingress.namespace().unwrap_or_default();
        let ingresses: Api<Ingress> = Api::namespaced(self.client.clone(), &namespace);

        let created = ingresses.create(&PostParams::default(), ingress).await?;
        Ok(ObjectKey::of(&created))
    }

    async fn delete_ingress(&self, key: &ObjectKey) -> Result<()> {
        let ingresses: Api<Ingress> = Api::namespaced(self.client.clone(), &key.namespace);

        ingresses.delete(&key.name, &DeleteParams::default()).await?;
        Ok(())
    }
}
