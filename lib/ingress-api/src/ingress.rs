//! Existing Ingress view used during bootstrap

use crate::ObjectKey;
use k8s_openapi::api::networking::v1::Ingress;

/// An existing Ingress and the backend services its rules point at
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngressDescriptor {
    pub key: ObjectKey,

    /// Backend service names, in rule and path order. Names are relative to
    /// the Ingress namespace.
    pub backend_services: Vec<String>,
}

impl IngressDescriptor {
    pub fn new(key: ObjectKey, backend_services: Vec<String>) -> Self {
        Self {
            key,
            backend_services,
        }
    }

    /// Keys of the backend services, resolved in the Ingress namespace
    pub fn backend_keys(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.backend_services
            .iter()
            .map(|name| ObjectKey::new(self.key.namespace.clone(), name.clone()))
    }
}

impl From<&Ingress> for IngressDescriptor {
    fn from(ingress: &Ingress) -> Self {
        let backend_services = ingress
            .spec
            .iter()
            .flat_map(|spec| spec.rules.iter().flatten())
            .filter_map(|rule| rule.http.as_ref())
            .flat_map(|http| http.paths.iter())
            .filter_map(|path| path.backend.service.as_ref())
            .map(|svc| svc.name.clone())
            .collect();

        Self {
            key: ObjectKey::of(ingress),
            backend_services,
        }
    }
}
