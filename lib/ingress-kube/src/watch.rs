//! Service watch feeding the event processor
//!
//! The kube watcher reports Services as `Apply`/`Delete` and re-lists them
//! between `Init` and `InitDone` after (re)connecting. [`ServiceCache`] keeps
//! the last seen state per Service so these can be turned into
//! added/updated/deleted notifications, including deletions that happened
//! while the watch was down.

use futures::StreamExt;
use ingress_api::{ObjectKey, ServiceDescriptor, ServiceEvent};
use k8s_openapi::api::core::v1::Service;
use kube::{Api, Client};
use kube_runtime::watcher;
use kube_runtime::WatchStreamExt;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Last known state of every watched Service
#[derive(Debug, Default)]
pub struct ServiceCache {
    services: BTreeMap<ObjectKey, ServiceDescriptor>,
    // Keys seen since the last Init, while a re-list is in progress
    relisted: Option<BTreeSet<ObjectKey>>,
}

impl ServiceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Translate one watcher event into Service notifications
    pub fn handle(&mut self, event: watcher::Event<Service>) -> Vec<ServiceEvent> {
        match event {
            watcher::Event::Init => {
                debug!("Service re-list started");
                self.relisted = Some(BTreeSet::new());
                Vec::new()
            }
            watcher::Event::InitApply(svc) => {
                let svc = ServiceDescriptor::from(&svc);
                if let Some(seen) = self.relisted.as_mut() {
                    seen.insert(svc.key.clone());
                }
                vec![self.apply(svc)]
            }
            watcher::Event::InitDone => self.finish_relist(),
            watcher::Event::Apply(svc) => vec![self.apply(ServiceDescriptor::from(&svc))],
            watcher::Event::Delete(svc) => {
                let svc = ServiceDescriptor::from(&svc);
                self.services.remove(&svc.key);
                vec![ServiceEvent::Deleted(svc)]
            }
        }
    }

    fn apply(&mut self, new: ServiceDescriptor) -> ServiceEvent {
        match self.services.insert(new.key.clone(), new.clone()) {
            Some(old) => ServiceEvent::Updated { old, new },
            None => ServiceEvent::Added(new),
        }
    }

    fn finish_relist(&mut self) -> Vec<ServiceEvent> {
        let Some(seen) = self.relisted.take() else {
            return Vec::new();
        };

        let gone: Vec<ObjectKey> = self
            .services
            .keys()
            .filter(|key| !seen.contains(*key))
            .cloned()
            .collect();

        if !gone.is_empty() {
            debug!("{} services disappeared during re-list", gone.len());
        }

        gone.iter()
            .filter_map(|key| self.services.remove(key))
            .map(ServiceEvent::Deleted)
            .collect()
    }
}

/// ServiceWatch streams Service changes from the cluster into a channel
pub struct ServiceWatch {
    client: Client,
}

impl ServiceWatch {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Watch Services in all namespaces until the receiver is dropped
    pub async fn run(self, events: mpsc::Sender<ServiceEvent>) {
        let services: Api<Service> = Api::all(self.client);
        let stream = watcher(services, watcher::Config::default()).default_backoff();
        futures::pin_mut!(stream);

        let mut cache = ServiceCache::new();
        info!("Starting Service watcher");

        while let Some(event) = stream.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    warn!("Service watcher error: {}", e);
                    continue;
                }
            };

            if matches!(event, watcher::Event::InitDone) {
                info!("Service watcher initial sync complete");
            }

            for notification in cache.handle(event) {
                if events.send(notification).await.is_err() {
                    warn!("Event processor is gone, stopping Service watcher");
                    return;
                }
            }
        }

        warn!("Service watch stream ended");
    }
}
