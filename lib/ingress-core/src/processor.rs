//! Live Service event processing

use crate::{CoreError, IngressBuilder, IngressClient, Inventory};
use ingress_api::{ObjectKey, ServiceDescriptor, ServiceEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// What the processor did with one event
#[derive(Debug)]
pub enum Outcome {
    /// An Ingress was created and recorded
    Created(ObjectKey),
    /// An Ingress was deleted and forgotten
    Deleted(ObjectKey),
    /// Nothing to do for this event
    Skipped,
    /// The create or delete call failed; the inventory is unchanged
    Failed(CoreError),
}

/// EventProcessor applies Service label transitions to the inventory
///
/// Events are handled strictly one at a time; the processor is the only
/// owner of the inventory once bootstrap has finished.
pub struct EventProcessor {
    client: Arc<dyn IngressClient>,
    builder: Arc<IngressBuilder>,
    inventory: Inventory,
}

impl EventProcessor {
    pub fn new(
        client: Arc<dyn IngressClient>,
        builder: Arc<IngressBuilder>,
        inventory: Inventory,
    ) -> Self {
        Self {
            client,
            builder,
            inventory,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Consume events until the sending side is dropped
    pub async fn run(mut self, mut events: mpsc::Receiver<ServiceEvent>) {
        info!("Processing service events");

        while let Some(event) = events.recv().await {
            match self.handle(event).await {
                Outcome::Created(_) | Outcome::Deleted(_) => {
                    debug!("Updated inventory: {:?}", self.inventory.service_keys());
                }
                Outcome::Skipped | Outcome::Failed(_) => {}
            }
        }

        warn!("Service event channel closed");
    }

    /// Apply a single event
    pub async fn handle(&mut self, event: ServiceEvent) -> Outcome {
        info!("Service {}: {}", event.kind(), event.key());

        match event {
            ServiceEvent::Added(service) => {
                if self.inventory.contains(&service.key) {
                    debug!("Service {} already has an ingress", service.key);
                    Outcome::Skipped
                } else if service.is_public() {
                    self.create_for(&service).await
                } else {
                    Outcome::Skipped
                }
            }
            ServiceEvent::Updated { new, .. } => match self.inventory.get(&new.key).cloned() {
                Some(ingress) if !new.is_public() => self.delete_for(&new.key, ingress).await,
                Some(_) => Outcome::Skipped,
                None if new.is_public() => self.create_for(&new).await,
                None => Outcome::Skipped,
            },
            ServiceEvent::Deleted(service) => match self.inventory.get(&service.key).cloned() {
                Some(ingress) => self.delete_for(&service.key, ingress).await,
                None => Outcome::Skipped,
            },
        }
    }

    async fn create_for(&mut self, service: &ServiceDescriptor) -> Outcome {
        let ingress = self.builder.build(service);
        match self.client.create_ingress(&ingress).await {
            Ok(created) => {
                info!("Created new ingress {} for service {}", created, service.key);
                self.inventory.insert(service.key.clone(), created.clone());
                Outcome::Created(created)
            }
            Err(e) => {
                error!("Failed to create ingress for service {}: {}", service.key, e);
                Outcome::Failed(e)
            }
        }
    }

    async fn delete_for(&mut self, service: &ObjectKey, ingress: ObjectKey) -> Outcome {
        match self.client.delete_ingress(&ingress).await {
            Ok(()) => {
                info!("Deleted ingress {} for service {}", ingress, service);
                self.inventory.remove(service);
                Outcome::Deleted(ingress)
            }
            Err(e) => {
                error!(
                    "Failed to delete ingress {} for service {}: {}",
                    ingress, service, e
                );
                Outcome::Failed(e)
            }
        }
    }
}
