//! Maps dashboard resource-kind strings ("pods", "cluster-roles", "svc", …)
//! to a Group/Version/Resource coordinate and a namespaced/cluster-scoped flag.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// The three-part coordinate Kubernetes uses to address a resource collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gvr {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl Gvr {
    fn new(group: &str, version: &str, resource: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        }
    }
}

impl std::fmt::Display for Gvr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.resource)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.resource)
        }
    }
}

/// Whether the coordinate came from the known-kind table or is a
/// best-effort guess for a kind the table has never heard of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Static,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedKind {
    pub gvr: Gvr,
    pub cluster_scoped: bool,
    pub resolution: Resolution,
}

impl ResolvedKind {
    pub fn is_guessed(&self) -> bool {
        self.resolution == Resolution::Fallback
    }
}

/// Kinds that exist once per cluster rather than once per namespace.
/// Must match the real apiserver's scope or list calls degrade silently
/// to empty results.
const CLUSTER_SCOPED: &[&str] = &[
    "namespaces",
    "nodes",
    "persistentvolumes",
    "storageclasses",
    "customresourcedefinitions",
    "clusterroles",
    "clusterrolebindings",
    "ingressclasses",
];

static TABLE: LazyLock<HashMap<&'static str, Gvr>> = LazyLock::new(|| {
    let mut t = HashMap::new();
    // Core group
    for r in [
        "pods",
        "services",
        "endpoints",
        "namespaces",
        "nodes",
        "configmaps",
        "secrets",
        "serviceaccounts",
        "persistentvolumes",
        "persistentvolumeclaims",
        "events",
        "resourcequotas",
        "limitranges",
    ] {
        t.insert(r, Gvr::new("", "v1", r));
    }
    // apps
    for r in ["deployments", "replicasets", "statefulsets", "daemonsets"] {
        t.insert(r, Gvr::new("apps", "v1", r));
    }
    // batch
    t.insert("jobs", Gvr::new("batch", "v1", "jobs"));
    t.insert("cronjobs", Gvr::new("batch", "v1", "cronjobs"));
    // networking.k8s.io
    t.insert("ingresses", Gvr::new("networking.k8s.io", "v1", "ingresses"));
    t.insert(
        "ingressclasses",
        Gvr::new("networking.k8s.io", "v1", "ingressclasses"),
    );
    t.insert(
        "networkpolicies",
        Gvr::new("networking.k8s.io", "v1", "networkpolicies"),
    );
    // rbac.authorization.k8s.io
    for r in ["roles", "rolebindings", "clusterroles", "clusterrolebindings"] {
        t.insert(r, Gvr::new("rbac.authorization.k8s.io", "v1", r));
    }
    // storage.k8s.io
    t.insert(
        "storageclasses",
        Gvr::new("storage.k8s.io", "v1", "storageclasses"),
    );
    // apiextensions.k8s.io
    t.insert(
        "customresourcedefinitions",
        Gvr::new("apiextensions.k8s.io", "v1", "customresourcedefinitions"),
    );
    // autoscaling
    t.insert(
        "horizontalpodautoscalers",
        Gvr::new("autoscaling", "v2", "horizontalpodautoscalers"),
    );
    t
});

/// Short names and dashed spellings accepted anywhere a kind is accepted.
/// Every alias must resolve to exactly the same coordinate as its
/// canonical kind.
static ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("po", "pods"),
        ("svc", "services"),
        ("cm", "configmaps"),
        ("ns", "namespaces"),
        ("no", "nodes"),
        ("sa", "serviceaccounts"),
        ("deploy", "deployments"),
        ("rs", "replicasets"),
        ("sts", "statefulsets"),
        ("ds", "daemonsets"),
        ("ing", "ingresses"),
        ("pv", "persistentvolumes"),
        ("pvc", "persistentvolumeclaims"),
        ("hpa", "horizontalpodautoscalers"),
        ("netpol", "networkpolicies"),
        ("crd", "customresourcedefinitions"),
        ("crds", "customresourcedefinitions"),
        ("sc", "storageclasses"),
        ("quota", "resourcequotas"),
        ("cluster-roles", "clusterroles"),
        ("cluster-role-bindings", "clusterrolebindings"),
        ("role-bindings", "rolebindings"),
        ("ingress-classes", "ingressclasses"),
        ("storage-classes", "storageclasses"),
        ("network-policies", "networkpolicies"),
    ])
});

/// Resolve the canonical spelling of a kind (aliases folded in).
pub fn canonical(kind: &str) -> &str {
    let kind = kind.trim();
    ALIASES.get(kind).copied().unwrap_or(kind)
}

/// Resolve a kind string to its API coordinate and scope. Total: unknown
/// kinds get a plausible-but-unverified core/v1 guess, so callers must
/// treat "resolved" as "attempted", not "guaranteed valid".
pub fn resolve(kind: &str) -> ResolvedKind {
    let canonical = canonical(kind);
    match TABLE.get(canonical) {
        Some(gvr) => ResolvedKind {
            gvr: gvr.clone(),
            cluster_scoped: CLUSTER_SCOPED.contains(&gvr.resource.as_str()),
            resolution: Resolution::Static,
        },
        None => ResolvedKind {
            gvr: Gvr::new("", "v1", canonical),
            cluster_scoped: false,
            resolution: Resolution::Fallback,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_resolve_statically() {
        let pods = resolve("pods");
        assert_eq!(pods.gvr, Gvr::new("", "v1", "pods"));
        assert!(!pods.cluster_scoped);
        assert_eq!(pods.resolution, Resolution::Static);

        let deploys = resolve("deployments");
        assert_eq!(deploys.gvr.group, "apps");

        let ingresses = resolve("ingresses");
        assert_eq!(ingresses.gvr.group, "networking.k8s.io");
    }

    #[test]
    fn aliases_resolve_identically_to_canonical() {
        for (alias, canonical) in ALIASES.iter() {
            assert_eq!(
                resolve(alias),
                resolve(canonical),
                "alias '{}' diverged from '{}'",
                alias,
                canonical
            );
        }
    }

    #[test]
    fn alias_resolution_is_stable() {
        // resolve(canonical(k)) == resolve(k) for every known kind
        for kind in TABLE.keys() {
            assert_eq!(resolve(canonical(kind)), resolve(kind));
        }
    }

    #[test]
    fn cluster_scoped_set() {
        for kind in [
            "namespaces",
            "nodes",
            "persistentvolumes",
            "storageclasses",
            "customresourcedefinitions",
            "clusterroles",
            "clusterrolebindings",
            "ingressclasses",
        ] {
            assert!(resolve(kind).cluster_scoped, "{} should be cluster-scoped", kind);
        }
        assert!(!resolve("pods").cluster_scoped);
        assert!(!resolve("secrets").cluster_scoped);
    }

    #[test]
    fn unknown_kind_falls_back_to_core_v1_guess() {
        let widget = resolve("widgets");
        assert_eq!(widget.gvr, Gvr::new("", "v1", "widgets"));
        assert!(!widget.cluster_scoped);
        assert!(widget.is_guessed());
    }

    #[test]
    fn coordinates_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for gvr in TABLE.values() {
            assert!(seen.insert(gvr.clone()), "duplicate coordinate {}", gvr);
        }
    }
}
