//! Cluster operations the reconciler depends on

use crate::Result;
use async_trait::async_trait;
use ingress_api::{IngressDescriptor, ObjectKey, ServiceDescriptor};
use k8s_openapi::api::networking::v1::Ingress;

#[cfg(test)]
use mockall::automock;

/// Trait abstracting the Kubernetes calls made by the reconciler
///
/// The kube-backed implementation lives in `ingress-kube`; tests use the
/// generated mock.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IngressClient: Send + Sync {
    /// List Services in all namespaces
    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>>;

    /// List Ingresses in all namespaces
    async fn list_ingresses(&self) -> Result<Vec<IngressDescriptor>>;

    /// Create an Ingress, returning the key of the created object
    async fn create_ingress(&self, ingress: &Ingress) -> Result<ObjectKey>;

    /// Delete an Ingress
    async fn delete_ingress(&self, key: &ObjectKey) -> Result<()>;
}
