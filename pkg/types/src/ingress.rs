use serde::{Deserialize, Serialize};

use crate::meta::ObjectMeta;

/// Backend service port reference. The apiserver serializes either a
/// number or a named port; the tracer only labels edges with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceBackendPort {
    #[serde(default)]
    pub number: Option<u16>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ServiceBackendPort {
    /// Human-readable port label for trace edges.
    pub fn display(&self) -> String {
        match (&self.number, &self.name) {
            (Some(n), _) => n.to_string(),
            (None, Some(name)) => name.clone(),
            (None, None) => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngressServiceBackend {
    pub name: String,
    #[serde(default)]
    pub port: ServiceBackendPort,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngressBackend {
    #[serde(default)]
    pub service: Option<IngressServiceBackend>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpIngressPath {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "pathType")]
    pub path_type: Option<String>,
    #[serde(default)]
    pub backend: IngressBackend,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpIngressRuleValue {
    #[serde(default)]
    pub paths: Vec<HttpIngressPath>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngressRule {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub http: Option<HttpIngressRuleValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngressSpec {
    #[serde(default)]
    pub rules: Vec<IngressRule>,
}

/// networking.k8s.io/v1 Ingress, trimmed to what the tracer walks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ingress {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: IngressSpec,
}

impl Ingress {
    /// All service backends referenced by this Ingress's HTTP path rules,
    /// in declaration order.
    pub fn service_backends(&self) -> Vec<&IngressServiceBackend> {
        self.spec
            .rules
            .iter()
            .filter_map(|r| r.http.as_ref())
            .flat_map(|h| h.paths.iter())
            .filter_map(|p| p.backend.service.as_ref())
            .collect()
    }

    /// True if any HTTP path rule points at the named Service.
    pub fn references_service(&self, service_name: &str) -> bool {
        self.service_backends()
            .iter()
            .any(|b| b.name == service_name)
    }
}
