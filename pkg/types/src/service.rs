use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::meta::ObjectMeta;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicePort {
    #[serde(default)]
    pub name: Option<String>,
    pub port: u16,
    #[serde(default, rename = "targetPort")]
    pub target_port: Option<serde_json::Value>,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSpec {
    #[serde(default)]
    pub selector: HashMap<String, String>,
    #[serde(default)]
    pub ports: Vec<ServicePort>,
    #[serde(default, rename = "type")]
    pub service_type: Option<String>,
    #[serde(default, rename = "clusterIP")]
    pub cluster_ip: Option<String>,
}

/// v1 Service, trimmed to the fields selector matching needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ServiceSpec,
}

impl Service {
    /// Kubernetes selector semantics: every selector key/value pair must be
    /// present and equal in `labels`. An empty selector matches nothing —
    /// an unconstrained selector would otherwise fan out to every pod in
    /// the namespace.
    pub fn selector_matches(&self, labels: &HashMap<String, String>) -> bool {
        if self.spec.selector.is_empty() {
            return false;
        }
        self.spec
            .selector
            .iter()
            .all(|(k, v)| labels.get(k) == Some(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(selector: &[(&str, &str)]) -> Service {
        Service {
            metadata: ObjectMeta {
                name: "svc".to_string(),
                ..Default::default()
            },
            spec: ServiceSpec {
                selector: selector
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                ..Default::default()
            },
        }
    }

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn selector_subset_of_labels_matches() {
        let s = svc(&[("app", "web")]);
        assert!(s.selector_matches(&labels(&[("app", "web")])));
        // Monotonic: extra labels never break a match
        assert!(s.selector_matches(&labels(&[("app", "web"), ("tier", "frontend")])));
    }

    #[test]
    fn mismatched_or_missing_key_does_not_match() {
        let s = svc(&[("app", "web"), ("tier", "frontend")]);
        assert!(!s.selector_matches(&labels(&[("app", "web")])));
        assert!(!s.selector_matches(&labels(&[("app", "api"), ("tier", "frontend")])));
    }

    #[test]
    fn empty_selector_matches_nothing() {
        let s = svc(&[]);
        assert!(!s.selector_matches(&labels(&[("app", "web")])));
        assert!(!s.selector_matches(&HashMap::new()));
    }
}
