//! Domain types for the auto-ingress controller
//!
//! This library defines the views of cluster objects the controller works on:
//! - ObjectKey: namespace/name identity shared by Services and Ingresses
//! - ServiceDescriptor: the parts of a Service that drive ingress provisioning
//! - IngressDescriptor: an existing Ingress and the services it routes to
//! - ServiceEvent: a change notification for a Service

pub mod event;
pub mod ingress;
pub mod key;
pub mod service;

pub use event::ServiceEvent;
pub use ingress::IngressDescriptor;
pub use key::ObjectKey;
pub use service::{is_public, ServiceDescriptor};

/// Label that marks a Service for automatic ingress provisioning
pub const PUBLIC_LABEL: &str = "public";
/// The only value of [`PUBLIC_LABEL`] that counts as public
pub const PUBLIC_VALUE: &str = "true";
