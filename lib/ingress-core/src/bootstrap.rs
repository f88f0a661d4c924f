//! Startup reconciliation between Services and existing Ingresses

use crate::{IngressBuilder, IngressClient, Inventory, Result};
use ingress_api::{IngressDescriptor, ObjectKey};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Bootstrap rebuilds the inventory from a full snapshot of the cluster
pub struct Bootstrap {
    client: Arc<dyn IngressClient>,
    builder: Arc<IngressBuilder>,
}

impl Bootstrap {
    pub fn new(client: Arc<dyn IngressClient>, builder: Arc<IngressBuilder>) -> Self {
        Self { client, builder }
    }

    /// List Services and Ingresses, adopt Ingresses that already serve a
    /// public Service and create the missing ones.
    ///
    /// The first failed create aborts the whole pass. Ingresses found for
    /// Services that are no longer public are left in the cluster and only
    /// kept out of the inventory.
    pub async fn reconcile(&self) -> Result<Inventory> {
        let services = self.client.list_services().await?;
        let ingresses = self.client.list_ingresses().await?;
        info!(
            "Listed {} services and {} ingresses",
            services.len(),
            ingresses.len()
        );

        let existing = index_backends(&ingresses);
        let mut inventory = Inventory::new();

        for service in &services {
            match (existing.get(&service.key), service.is_public()) {
                (Some(ingress), true) => {
                    debug!("Adopting ingress {} for service {}", ingress, service.key);
                    inventory.insert(service.key.clone(), ingress.clone());
                }
                (Some(ingress), false) => {
                    debug!(
                        "Service {} is not public, leaving ingress {} untracked",
                        service.key, ingress
                    );
                }
                (None, true) => {
                    let ingress = self.builder.build(service);
                    let created = self.client.create_ingress(&ingress).await.map_err(|e| {
                        error!("Failed to create ingress for service {}: {}", service.key, e);
                        e
                    })?;
                    info!("Created new ingress {} for service {}", created, service.key);
                    inventory.insert(service.key.clone(), created);
                }
                (None, false) => {}
            }
        }

        Ok(inventory)
    }
}

/// Map each backend Service to the first Ingress that routes to it
fn index_backends(ingresses: &[IngressDescriptor]) -> BTreeMap<ObjectKey, ObjectKey> {
    let mut index = BTreeMap::new();
    for ingress in ingresses {
        for service in ingress.backend_keys() {
            index.entry(service).or_insert_with(|| ingress.key.clone());
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockIngressClient;
    use crate::CoreError;
    use ingress_api::ServiceDescriptor;

    fn builder() -> Arc<IngressBuilder> {
        Arc::new(IngressBuilder::new("example.com", "tls-default"))
    }

    fn public(namespace: &str, name: &str) -> ServiceDescriptor {
        ServiceDescriptor::new(namespace, name)
            .with_label("public", "true")
            .with_port(8080)
    }

    fn ingress(namespace: &str, name: &str, backends: &[&str]) -> IngressDescriptor {
        IngressDescriptor::new(
            ObjectKey::new(namespace, name),
            backends.iter().map(|b| b.to_string()).collect(),
        )
    }

    #[test]
    fn test_index_backends_first_wins() {
        let index = index_backends(&[
            ingress("ns1", "first", &["api"]),
            ingress("ns1", "second", &["api", "web"]),
            ingress("ns2", "other", &["api"]),
        ]);

        assert_eq!(
            index.get(&ObjectKey::new("ns1", "api")),
            Some(&ObjectKey::new("ns1", "first"))
        );
        assert_eq!(
            index.get(&ObjectKey::new("ns1", "web")),
            Some(&ObjectKey::new("ns1", "second"))
        );
        assert_eq!(
            index.get(&ObjectKey::new("ns2", "api")),
            Some(&ObjectKey::new("ns2", "other"))
        );
    }

    #[tokio::test]
    async fn test_creates_missing_ingress_for_public_service() {
        let mut client = MockIngressClient::new();
        client
            .expect_list_services()
            .returning(|| Ok(vec![public("ns1", "api")]));
        client.expect_list_ingresses().returning(|| Ok(vec![]));
        client
            .expect_create_ingress()
            .withf(|ing: &k8s_openapi::api::networking::v1::Ingress| {
                ing.metadata.name.as_deref() == Some("api")
                    && ing.metadata.namespace.as_deref() == Some("ns1")
            })
            .times(1)
            .returning(|ing| Ok(ObjectKey::of(ing)));

        let inventory = Bootstrap::new(Arc::new(client), builder())
            .reconcile()
            .await
            .unwrap();

        assert_eq!(inventory.len(), 1);
        assert_eq!(
            inventory.get(&ObjectKey::new("ns1", "api")),
            Some(&ObjectKey::new("ns1", "api"))
        );
    }

    #[tokio::test]
    async fn test_adopts_existing_ingress() {
        let mut client = MockIngressClient::new();
        client
            .expect_list_services()
            .returning(|| Ok(vec![public("ns1", "api")]));
        client
            .expect_list_ingresses()
            .returning(|| Ok(vec![ingress("ns1", "custom", &["api"])]));
        client.expect_create_ingress().never();

        let inventory = Bootstrap::new(Arc::new(client), builder())
            .reconcile()
            .await
            .unwrap();

        assert_eq!(
            inventory.get(&ObjectKey::new("ns1", "api")),
            Some(&ObjectKey::new("ns1", "custom"))
        );
    }

    #[tokio::test]
    async fn test_drops_ingress_of_service_no_longer_public() {
        let mut client = MockIngressClient::new();
        client.expect_list_services().returning(|| {
            Ok(vec![
                ServiceDescriptor::new("ns1", "unlabeled").with_port(80),
                ServiceDescriptor::new("ns1", "disabled")
                    .with_label("public", "false")
                    .with_port(80),
            ])
        });
        client.expect_list_ingresses().returning(|| {
            Ok(vec![
                ingress("ns1", "unlabeled", &["unlabeled"]),
                ingress("ns1", "disabled", &["disabled"]),
            ])
        });
        client.expect_create_ingress().never();
        client.expect_delete_ingress().never();

        let inventory = Bootstrap::new(Arc::new(client), builder())
            .reconcile()
            .await
            .unwrap();

        assert!(inventory.is_empty());
    }

    #[tokio::test]
    async fn test_inventory_is_exactly_public_services() {
        let mut client = MockIngressClient::new();
        client.expect_list_services().returning(|| {
            Ok(vec![
                public("ns1", "adopted"),
                public("ns1", "created"),
                ServiceDescriptor::new("ns1", "private").with_port(80),
                ServiceDescriptor::new("ns2", "empty-label")
                    .with_label("public", "")
                    .with_port(80),
            ])
        });
        client.expect_list_ingresses().returning(|| {
            Ok(vec![
                ingress("ns1", "adopted", &["adopted"]),
                // Backend service does not exist
                ingress("ns3", "orphan", &["gone"]),
            ])
        });
        client
            .expect_create_ingress()
            .times(1)
            .returning(|ing| Ok(ObjectKey::of(ing)));

        let inventory = Bootstrap::new(Arc::new(client), builder())
            .reconcile()
            .await
            .unwrap();

        assert_eq!(inventory.service_keys(), vec!["ns1/adopted", "ns1/created"]);
    }

    #[tokio::test]
    async fn test_create_failure_aborts() {
        let mut client = MockIngressClient::new();
        client.expect_list_services().returning(|| {
            Ok(vec![
                public("ns1", "a"),
                public("ns1", "b"),
                public("ns1", "c"),
            ])
        });
        client.expect_list_ingresses().returning(|| Ok(vec![]));

        let mut seq = mockall::Sequence::new();
        client
            .expect_create_ingress()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|ing| Ok(ObjectKey::of(ing)));
        client
            .expect_create_ingress()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(CoreError::Internal("quota exceeded".to_string())));

        let result = Bootstrap::new(Arc::new(client), builder()).reconcile().await;

        match result {
            Err(CoreError::Internal(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("expected create error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_failure_aborts() {
        let mut client = MockIngressClient::new();
        client
            .expect_list_services()
            .returning(|| Err(CoreError::Internal("forbidden".to_string())));
        client.expect_list_ingresses().never();

        let result = Bootstrap::new(Arc::new(client), builder()).reconcile().await;
        assert!(result.is_err());
    }
}
