//! Ingress construction for public Services

use ingress_api::ServiceDescriptor;
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Path type of the single generated path; matches the untyped paths of the
/// legacy extensions/v1beta1 API.
pub const PATH_TYPE: &str = "ImplementationSpecific";

/// Builds the Ingress for a Service from process-wide settings
#[derive(Clone, Debug)]
pub struct IngressBuilder {
    /// DNS wildcard domain, e.g. example.com
    pub wildcard_domain: String,
    /// TLS secret referenced by every generated Ingress
    pub tls_secret: String,
}

impl IngressBuilder {
    pub fn new(wildcard_domain: impl Into<String>, tls_secret: impl Into<String>) -> Self {
        Self {
            wildcard_domain: wildcard_domain.into(),
            tls_secret: tls_secret.into(),
        }
    }

    /// Hostname served for a Service: `{name}.{wildcard_domain}`
    pub fn hostname(&self, service: &ServiceDescriptor) -> String {
        format!("{}.{}", service.name(), self.wildcard_domain)
    }

    /// Backend for the first declared port. A Service without ports gets a
    /// backend with an empty service reference.
    pub fn backend(&self, service: &ServiceDescriptor) -> IngressBackend {
        let service_backend = match service.first_port() {
            Some(port) => IngressServiceBackend {
                name: service.name().to_string(),
                port: Some(ServiceBackendPort {
                    number: Some(port),
                    name: None,
                }),
            },
            None => IngressServiceBackend::default(),
        };

        IngressBackend {
            service: Some(service_backend),
            resource: None,
        }
    }

    /// Build the Ingress for a Service
    pub fn build(&self, service: &ServiceDescriptor) -> Ingress {
        let host = self.hostname(service);

        Ingress {
            metadata: ObjectMeta {
                name: Some(service.name().to_string()),
                namespace: Some(service.namespace().to_string()),
                ..Default::default()
            },
            spec: Some(IngressSpec {
                tls: Some(vec![IngressTLS {
                    hosts: Some(vec![host.clone()]),
                    secret_name: Some(self.tls_secret.clone()),
                }]),
                rules: Some(vec![IngressRule {
                    host: Some(host),
                    http: Some(HTTPIngressRuleValue {
                        paths: vec![HTTPIngressPath {
                            path: Some("/".to_string()),
                            path_type: PATH_TYPE.to_string(),
                            backend: self.backend(service),
                        }],
                    }),
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
