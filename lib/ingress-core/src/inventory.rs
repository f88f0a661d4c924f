//! Inventory of managed Ingresses, keyed by Service

use ingress_api::ObjectKey;
use std::collections::BTreeMap;
use tracing::debug;

/// Inventory maps each Service to the Ingress the controller believes exists
/// for it.
///
/// It is not synchronized. A single reconciliation context owns it: the
/// bootstrap pass builds it and then hands it to the event processor.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    // service key -> ingress key
    entries: BTreeMap<ObjectKey, ObjectKey>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingress recorded for a Service
    pub fn get(&self, service: &ObjectKey) -> Option<&ObjectKey> {
        self.entries.get(service)
    }

    /// Record the Ingress for a Service, replacing any previous entry
    pub fn insert(&mut self, service: ObjectKey, ingress: ObjectKey) -> Option<ObjectKey> {
        debug!("Recorded ingress {} for service {}", ingress, service);
        self.entries.insert(service, ingress)
    }

    /// Forget the Ingress for a Service
    pub fn remove(&mut self, service: &ObjectKey) -> Option<ObjectKey> {
        let removed = self.entries.remove(service);
        if let Some(ingress) = &removed {
            debug!("Forgot ingress {} for service {}", ingress, service);
        }
        removed
    }

    pub fn contains(&self, service: &ObjectKey) -> bool {
        self.entries.contains_key(service)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked Service keys as `namespace/name`, in order
    pub fn service_keys(&self) -> Vec<String> {
        self.entries.keys().map(ToString::to_string).collect()
    }
}
