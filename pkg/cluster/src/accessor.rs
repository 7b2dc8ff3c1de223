use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::ClusterClient;
use crate::error::AccessError;
use kview_kinds::ResolvedKind;
use kview_rbac::AuthorizationContext;
use kview_types::ingress::Ingress;
use kview_types::pod::Pod;
use kview_types::service::Service;

/// Every list/get/update the dashboard performs goes through here.
/// Kind resolution and authorization are settled before any network
/// call, so a rejected request costs no cluster round-trip.
#[derive(Clone)]
pub struct ResourceAccessor {
    client: Arc<dyn ClusterClient>,
}

impl ResourceAccessor {
    pub fn new(client: Arc<dyn ClusterClient>) -> Self {
        Self { client }
    }

    /// Reconcile the requested namespace with the caller's restriction.
    ///
    /// Cluster-scoped kinds bypass the check entirely. For namespaced
    /// kinds an unset request is forced to the restriction, while a
    /// conflicting request is Forbidden outright — never a silent redirect.
    fn effective_namespace(
        resolved: &ResolvedKind,
        requested: Option<&str>,
        ctx: &AuthorizationContext,
    ) -> Result<Option<String>, AccessError> {
        if resolved.cluster_scoped {
            return Ok(None);
        }
        let requested = requested.filter(|ns| !ns.is_empty());
        match (&ctx.namespace_restriction, requested) {
            (Some(restriction), None) => Ok(Some(restriction.clone())),
            (Some(restriction), Some(ns)) if ns == restriction => Ok(Some(ns.to_string())),
            (Some(restriction), Some(ns)) => {
                warn!(
                    "Denied {}: namespace '{}' conflicts with restriction '{}'",
                    ctx.email, ns, restriction
                );
                Err(AccessError::Forbidden(format!(
                    "access restricted to namespace '{}'",
                    restriction
                )))
            }
            (None, requested) => Ok(requested.map(str::to_string)),
        }
    }

    fn resolve(kind: &str) -> ResolvedKind {
        let resolved = kview_kinds::resolve(kind);
        if resolved.is_guessed() {
            debug!(
                "Kind '{}' not in the static table; querying guessed coordinate {}",
                kind, resolved.gvr
            );
        }
        resolved
    }

    pub async fn list(
        &self,
        kind: &str,
        namespace: Option<&str>,
        ctx: &AuthorizationContext,
    ) -> Result<Vec<Value>, AccessError> {
        let resolved = Self::resolve(kind);
        let ns = Self::effective_namespace(&resolved, namespace, ctx)?;
        self.client.list(&resolved.gvr, ns.as_deref()).await
    }

    pub async fn get(
        &self,
        kind: &str,
        namespace: Option<&str>,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<Value, AccessError> {
        let resolved = Self::resolve(kind);
        let ns = Self::effective_namespace(&resolved, namespace, ctx)?;
        if !resolved.cluster_scoped && ns.is_none() {
            return Err(AccessError::InvalidPayload(format!(
                "kind '{}' is namespaced; a namespace is required",
                kind
            )));
        }
        self.client.get(&resolved.gvr, ns.as_deref(), name).await
    }

    pub async fn update(
        &self,
        kind: &str,
        namespace: Option<&str>,
        name: &str,
        payload: Value,
        ctx: &AuthorizationContext,
    ) -> Result<Value, AccessError> {
        if !ctx.role.can_update() {
            warn!(
                "Denied update of {}/{} by {}: role '{}' is not privileged",
                kind, name, ctx.email, ctx.role
            );
            return Err(AccessError::Forbidden(format!(
                "role '{}' may not modify resources",
                ctx.role
            )));
        }
        let resolved = Self::resolve(kind);
        let ns = Self::effective_namespace(&resolved, namespace, ctx)?;
        let payload_name = payload
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str);
        match payload_name {
            None => {
                return Err(AccessError::InvalidPayload(
                    "manifest is missing metadata.name".to_string(),
                ));
            }
            Some(n) if n != name => {
                return Err(AccessError::InvalidPayload(format!(
                    "manifest names '{}' but the request targets '{}'",
                    n, name
                )));
            }
            Some(_) => {}
        }
        self.client
            .update(&resolved.gvr, ns.as_deref(), name, payload)
            .await
    }

    /// Events for one object: the core events collection filtered by the
    /// involved object's name. The apiserver offers field selectors for
    /// this; filtering client-side keeps the mock path identical.
    pub async fn events(
        &self,
        namespace: Option<&str>,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<Vec<Value>, AccessError> {
        let events = self.list("events", namespace, ctx).await?;
        Ok(events
            .into_iter()
            .filter(|e| {
                e.get("involvedObject")
                    .and_then(|o| o.get("name"))
                    .and_then(Value::as_str)
                    == Some(name)
            })
            .collect())
    }

    // --- Typed views used by the topology tracer ---

    pub async fn get_ingress(
        &self,
        namespace: &str,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<Ingress, AccessError> {
        let value = self.get("ingresses", Some(namespace), name, ctx).await?;
        serde_json::from_value(value).map_err(AccessError::upstream)
    }

    pub async fn get_service(
        &self,
        namespace: &str,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<Service, AccessError> {
        let value = self.get("services", Some(namespace), name, ctx).await?;
        serde_json::from_value(value).map_err(AccessError::upstream)
    }

    pub async fn get_pod(
        &self,
        namespace: &str,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<Pod, AccessError> {
        let value = self.get("pods", Some(namespace), name, ctx).await?;
        serde_json::from_value(value).map_err(AccessError::upstream)
    }

    pub async fn list_ingresses(
        &self,
        namespace: &str,
        ctx: &AuthorizationContext,
    ) -> Result<Vec<Ingress>, AccessError> {
        let values = self.list("ingresses", Some(namespace), ctx).await?;
        Ok(values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }

    pub async fn list_services(
        &self,
        namespace: &str,
        ctx: &AuthorizationContext,
    ) -> Result<Vec<Service>, AccessError> {
        let values = self.list("services", Some(namespace), ctx).await?;
        Ok(values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }

    pub async fn list_pods(
        &self,
        namespace: &str,
        ctx: &AuthorizationContext,
    ) -> Result<Vec<Pod>, AccessError> {
        let values = self.list("pods", Some(namespace), ctx).await?;
        Ok(values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClusterClient;
    use kview_rbac::{AuthorizationContext, Role};
    use serde_json::json;

    fn restricted_ctx(namespace: &str) -> AuthorizationContext {
        AuthorizationContext {
            email: "alice@example.com".to_string(),
            role: Role::NamespaceAdmin,
            namespace_restriction: Some(namespace.to_string()),
        }
    }

    fn accessor_with_mock() -> (ResourceAccessor, Arc<MockClusterClient>) {
        let mock = Arc::new(MockClusterClient::seeded());
        (ResourceAccessor::new(mock.clone()), mock)
    }

    #[tokio::test]
    async fn restricted_get_in_foreign_namespace_fails_before_any_call() {
        let (accessor, mock) = accessor_with_mock();
        let ctx = restricted_ctx("default");
        let err = accessor
            .get("pods", Some("kube-system"), "coredns-x", &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Forbidden(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn restricted_list_in_own_namespace_succeeds() {
        let (accessor, _) = accessor_with_mock();
        let ctx = restricted_ctx("demo");
        let pods = accessor.list("pods", Some("demo"), &ctx).await.unwrap();
        assert_eq!(pods.len(), 2);
    }

    #[tokio::test]
    async fn unset_namespace_is_forced_to_restriction() {
        let (accessor, _) = accessor_with_mock();
        let ctx = restricted_ctx("demo");
        let pods = accessor.list("pods", None, &ctx).await.unwrap();
        assert_eq!(pods.len(), 2);
    }

    #[tokio::test]
    async fn cluster_scoped_kinds_bypass_the_restriction() {
        let (accessor, _) = accessor_with_mock();
        let ctx = restricted_ctx("default");
        // "demo" namespace exists in the mock even though the caller is
        // pinned to "default" — namespaces are cluster-scoped.
        let namespaces = accessor.list("namespaces", None, &ctx).await.unwrap();
        assert_eq!(namespaces.len(), 1);
    }

    #[tokio::test]
    async fn viewer_update_is_forbidden_without_a_cluster_call() {
        let (accessor, mock) = accessor_with_mock();
        let ctx = AuthorizationContext::viewer("nobody@example.com");
        let payload = json!({"metadata": {"name": "web"}});
        let err = accessor
            .update("services", Some("demo"), "web", payload, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Forbidden(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn developer_update_is_forbidden() {
        let (accessor, _) = accessor_with_mock();
        let ctx = AuthorizationContext {
            email: "dev@example.com".to_string(),
            role: Role::ClusterDeveloper,
            namespace_restriction: None,
        };
        let payload = json!({"metadata": {"name": "web"}});
        let err = accessor
            .update("services", Some("demo"), "web", payload, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Forbidden(_)));
    }

    #[tokio::test]
    async fn update_rejects_name_mismatch() {
        let (accessor, mock) = accessor_with_mock();
        let ctx = AuthorizationContext {
            email: "admin@example.com".to_string(),
            role: Role::ClusterAdmin,
            namespace_restriction: None,
        };
        let payload = json!({"metadata": {"name": "other"}});
        let err = accessor
            .update("services", Some("demo"), "web", payload, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidPayload(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn admin_update_goes_through() {
        let (accessor, _) = accessor_with_mock();
        let ctx = AuthorizationContext {
            email: "admin@example.com".to_string(),
            role: Role::ClusterAdmin,
            namespace_restriction: None,
        };
        let payload = json!({
            "metadata": {"name": "web", "namespace": "demo"},
            "spec": {"selector": {"app": "web-v2"}}
        });
        let updated = accessor
            .update("services", Some("demo"), "web", payload, &ctx)
            .await
            .unwrap();
        assert_eq!(updated["spec"]["selector"]["app"], "web-v2");
    }

    #[tokio::test]
    async fn get_missing_object_is_not_found() {
        let (accessor, _) = accessor_with_mock();
        let ctx = AuthorizationContext::viewer("n@example.com");
        let err = accessor
            .get("pods", Some("demo"), "no-such-pod", &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::NotFound));
    }

    #[tokio::test]
    async fn namespaced_get_without_namespace_is_invalid() {
        let (accessor, mock) = accessor_with_mock();
        let ctx = AuthorizationContext::viewer("n@example.com");
        let err = accessor.get("pods", None, "web-7f9b-a1", &ctx).await.unwrap_err();
        assert!(matches!(err, AccessError::InvalidPayload(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn events_filter_by_involved_object() {
        let (accessor, mock) = accessor_with_mock();
        mock.insert(
            "events",
            Some("demo"),
            json!({
                "metadata": {"name": "web-7f9b-a1.1", "namespace": "demo"},
                "involvedObject": {"kind": "Pod", "name": "web-7f9b-a1"},
                "reason": "Scheduled"
            }),
        );
        mock.insert(
            "events",
            Some("demo"),
            json!({
                "metadata": {"name": "other.1", "namespace": "demo"},
                "involvedObject": {"kind": "Pod", "name": "other"},
                "reason": "Killing"
            }),
        );
        let ctx = AuthorizationContext::viewer("n@example.com");
        let events = accessor
            .events(Some("demo"), "web-7f9b-a1", &ctx)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["reason"], "Scheduled");
    }
}
