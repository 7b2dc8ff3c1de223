use serde_json::Value;

/// Metadata fields the apiserver manages; they make exported manifests
/// non-reapplyable and are stripped before the YAML/JSON export.
const MANAGED_METADATA_FIELDS: &[&str] = &[
    "managedFields",
    "resourceVersion",
    "uid",
    "creationTimestamp",
    "generation",
    "selfLink",
];

/// Strip server-managed fields from a manifest in place: the listed
/// metadata fields, the whole `status` subtree, and the kubectl
/// last-applied annotation.
pub fn strip_managed_fields(manifest: &mut Value) {
    if let Some(obj) = manifest.as_object_mut() {
        obj.remove("status");
    }
    if let Some(metadata) = manifest.get_mut("metadata").and_then(Value::as_object_mut) {
        for field in MANAGED_METADATA_FIELDS {
            metadata.remove(*field);
        }
        if let Some(annotations) = metadata
            .get_mut("annotations")
            .and_then(Value::as_object_mut)
        {
            annotations.remove("kubectl.kubernetes.io/last-applied-configuration");
            if annotations.is_empty() {
                metadata.remove("annotations");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_status_and_managed_metadata() {
        let mut manifest = json!({
            "metadata": {
                "name": "web",
                "uid": "abc-123",
                "resourceVersion": "42",
                "creationTimestamp": "2026-01-01T00:00:00Z",
                "managedFields": [{"manager": "kubectl"}],
                "labels": {"app": "web"},
                "annotations": {
                    "kubectl.kubernetes.io/last-applied-configuration": "{}",
                    "team": "platform"
                }
            },
            "spec": {"replicas": 3},
            "status": {"readyReplicas": 3}
        });
        strip_managed_fields(&mut manifest);

        assert!(manifest.get("status").is_none());
        let metadata = manifest.get("metadata").unwrap();
        assert_eq!(metadata.get("name").unwrap(), "web");
        assert!(metadata.get("uid").is_none());
        assert!(metadata.get("resourceVersion").is_none());
        assert!(metadata.get("managedFields").is_none());
        // User annotations survive, the kubectl bookkeeping one does not
        let annotations = metadata.get("annotations").unwrap();
        assert_eq!(annotations.get("team").unwrap(), "platform");
        assert!(
            annotations
                .get("kubectl.kubernetes.io/last-applied-configuration")
                .is_none()
        );
        assert_eq!(manifest.get("spec").unwrap().get("replicas").unwrap(), 3);
    }

    #[test]
    fn empty_annotation_map_is_dropped() {
        let mut manifest = json!({
            "metadata": {
                "name": "web",
                "annotations": {
                    "kubectl.kubernetes.io/last-applied-configuration": "{}"
                }
            }
        });
        strip_managed_fields(&mut manifest);
        assert!(manifest["metadata"].get("annotations").is_none());
    }
}
