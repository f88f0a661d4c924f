//! Service change notifications

use crate::{ObjectKey, ServiceDescriptor};

/// A change to a Service, as delivered to the event processor
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceEvent {
    Added(ServiceDescriptor),
    Updated {
        old: ServiceDescriptor,
        new: ServiceDescriptor,
    },
    Deleted(ServiceDescriptor),
}

impl ServiceEvent {
    /// Key of the Service this event is about
    pub fn key(&self) -> &ObjectKey {
        match self {
            ServiceEvent::Added(svc) | ServiceEvent::Deleted(svc) => &svc.key,
            ServiceEvent::Updated { new, .. } => &new.key,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServiceEvent::Added(_) => "added",
            ServiceEvent::Updated { .. } => "updated",
            ServiceEvent::Deleted(_) => "deleted",
        }
    }
}
