//! Service descriptor

use crate::{ObjectKey, PUBLIC_LABEL, PUBLIC_VALUE};
use k8s_openapi::api::core::v1::Service;
use kube::ResourceExt;
use std::collections::BTreeMap;

/// The parts of a Kubernetes Service that drive ingress provisioning
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Namespace and name of the Service
    pub key: ObjectKey,

    /// Service labels
    pub labels: BTreeMap<String, String>,

    /// Exposed port numbers, in declaration order
    pub ports: Vec<i32>,
}

impl ServiceDescriptor {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: ObjectKey::new(namespace, name),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_port(mut self, port: i32) -> Self {
        self.ports.push(port);
        self
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    /// Whether the Service carries `public=true`
    pub fn is_public(&self) -> bool {
        is_public(&self.labels)
    }

    /// First exposed port in declaration order
    pub fn first_port(&self) -> Option<i32> {
        self.ports.first().copied()
    }
}

impl From<&Service> for ServiceDescriptor {
    fn from(svc: &Service) -> Self {
        let ports = svc
            .spec
            .as_ref()
            .and_then(|spec| spec.ports.as_ref())
            .map(|ports| ports.iter().map(|p| p.port).collect())
            .unwrap_or_default();

        Self {
            key: ObjectKey::of(svc),
            labels: svc.labels().clone(),
            ports,
        }
    }
}

/// Public marker check. Only the exact value `"true"` counts; a missing
/// label, `"false"`, `""` or anything else is not public.
pub fn is_public(labels: &BTreeMap<String, String>) -> bool {
    labels.get(PUBLIC_LABEL).map(String::as_str) == Some(PUBLIC_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(value: serde_json::Value) -> Service {
        serde_json::from_value(value).expect("valid Service")
    }

    #[test]
    fn test_from_service() {
        let svc = service(json!({
            "metadata": {
                "name": "api",
                "namespace": "ns1",
                "labels": { "public": "true", "app": "api" }
            },
            "spec": {
                "ports": [{ "port": 8080 }, { "port": 9090 }]
            }
        }));

        let desc = ServiceDescriptor::from(&svc);
        assert_eq!(desc.key, ObjectKey::new("ns1", "api"));
        assert_eq!(desc.ports, vec![8080, 9090]);
        assert_eq!(desc.first_port(), Some(8080));
        assert_eq!(desc.labels.get("app").map(String::as_str), Some("api"));
        assert!(desc.is_public());
    }

    #[test]
    fn test_from_service_without_spec() {
        let svc = service(json!({
            "metadata": { "name": "bare", "namespace": "default" }
        }));

        let desc = ServiceDescriptor::from(&svc);
        assert!(desc.ports.is_empty());
        assert!(desc.labels.is_empty());
        assert_eq!(desc.first_port(), None);
        assert!(!desc.is_public());
    }

    #[test]
    fn test_public_marker_values() {
        let base = ServiceDescriptor::new("ns1", "api");
        assert!(base.clone().with_label("public", "true").is_public());
        assert!(!base.clone().with_label("public", "false").is_public());
        assert!(!base.clone().with_label("public", "").is_public());
        assert!(!base.clone().with_label("public", "TRUE").is_public());
        assert!(!base.clone().with_label("other", "true").is_public());
        assert!(!base.is_public());
    }
}
