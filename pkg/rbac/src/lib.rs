//! Dashboard-level authorization: a static role-assignment table loaded
//! once at startup, and the per-request context derived from it.
//!
//! This is a coarse gate layered in front of the cluster's native RBAC,
//! not a replacement for it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Env var overriding the assignment file path.
pub const RBAC_PATH_ENV: &str = "KVIEW_RBAC_PATH";
/// Default assignment file location.
pub const DEFAULT_RBAC_PATH: &str = "/etc/kview/rbac/assignments.yaml";

/// The closed, ordered-by-privilege role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    ClusterAdmin,
    ClusterDeveloper,
    ClusterViewer,
    NamespaceAdmin,
    NamespaceDeveloper,
    NamespaceViewer,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "cluster-admin" => Some(Role::ClusterAdmin),
            "cluster-developer" => Some(Role::ClusterDeveloper),
            "cluster-viewer" => Some(Role::ClusterViewer),
            "namespace-admin" => Some(Role::NamespaceAdmin),
            "namespace-developer" => Some(Role::NamespaceDeveloper),
            "namespace-viewer" => Some(Role::NamespaceViewer),
            _ => None,
        }
    }

    /// The privileged subset allowed to issue mutating calls.
    pub fn can_update(&self) -> bool {
        matches!(self, Role::ClusterAdmin | Role::NamespaceAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::ClusterAdmin => "cluster-admin",
            Role::ClusterDeveloper => "cluster-developer",
            Role::ClusterViewer => "cluster-viewer",
            Role::NamespaceAdmin => "namespace-admin",
            Role::NamespaceDeveloper => "namespace-developer",
            Role::NamespaceViewer => "namespace-viewer",
        };
        write!(f, "{}", s)
    }
}

/// One record of the assignment file. `subject` is a user email or a
/// group name; `namespace` restricts the subject to that namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub subject: String,
    pub role: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Per-request authorization context, threaded explicitly into every
/// accessor call. Derived fresh from the assignment table each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationContext {
    pub email: String,
    pub role: Role,
    pub namespace_restriction: Option<String>,
}

impl AuthorizationContext {
    /// The fail-closed default: read-only everywhere, no elevated access.
    pub fn viewer(email: &str) -> Self {
        Self {
            email: email.to_string(),
            role: Role::ClusterViewer,
            namespace_restriction: None,
        }
    }
}

/// Immutable, shared view of the assignment table. A reload constructs a
/// new table and swaps the Arc; the table itself is never mutated.
pub type AssignmentTable = Arc<[RoleAssignment]>;

/// Load the assignment file. A missing file yields an empty table
/// (every caller falls through to the viewer default); a malformed file
/// is a startup error.
pub fn load_assignments(path: &str) -> anyhow::Result<AssignmentTable> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Role assignment file {} not found; all callers get the viewer default", path);
            return Ok(Arc::from(Vec::new()));
        }
        Err(e) => return Err(e.into()),
    };
    let assignments: Vec<RoleAssignment> = serde_yaml::from_str(&content)?;
    Ok(Arc::from(assignments))
}

/// Resolve the assignment file path: env var > configured > default.
pub fn assignment_path(configured: Option<&str>) -> String {
    std::env::var(RBAC_PATH_ENV)
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_RBAC_PATH.to_string())
}

/// Build the caller's context by scanning assignments in file order.
/// The first assignment whose subject equals the email or one of the
/// caller's asserted groups wins; no merging across matches. An
/// assignment naming an unknown role is skipped — it grants nothing.
pub fn build_context(
    email: &str,
    groups: &[String],
    assignments: &[RoleAssignment],
) -> AuthorizationContext {
    for a in assignments {
        let matches = a.subject == email || groups.iter().any(|g| g == &a.subject);
        if !matches {
            continue;
        }
        let Some(role) = Role::parse(&a.role) else {
            warn!(
                "Skipping assignment for '{}': unknown role '{}'",
                a.subject, a.role
            );
            continue;
        };
        let namespace_restriction = a.namespace.clone().filter(|ns| !ns.is_empty());
        return AuthorizationContext {
            email: email.to_string(),
            role,
            namespace_restriction,
        };
    }
    AuthorizationContext::viewer(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(subject: &str, role: &str, namespace: Option<&str>) -> RoleAssignment {
        RoleAssignment {
            subject: subject.to_string(),
            role: role.to_string(),
            namespace: namespace.map(str::to_string),
        }
    }

    #[test]
    fn direct_match_wins() {
        let table = vec![assignment("alice@example.com", "namespace-admin", Some("team-a"))];
        let ctx = build_context("alice@example.com", &[], &table);
        assert_eq!(ctx.role, Role::NamespaceAdmin);
        assert_eq!(ctx.namespace_restriction.as_deref(), Some("team-a"));
    }

    #[test]
    fn group_match_wins() {
        let table = vec![assignment("platform-team", "cluster-developer", None)];
        let ctx = build_context(
            "bob@example.com",
            &["platform-team".to_string()],
            &table,
        );
        assert_eq!(ctx.role, Role::ClusterDeveloper);
        assert!(ctx.namespace_restriction.is_none());
    }

    #[test]
    fn first_match_in_declaration_order_wins() {
        // A personal and a group assignment both match: file order decides.
        let table = vec![
            assignment("platform-team", "namespace-viewer", Some("team-a")),
            assignment("alice@example.com", "cluster-admin", None),
        ];
        let ctx = build_context(
            "alice@example.com",
            &["platform-team".to_string()],
            &table,
        );
        assert_eq!(ctx.role, Role::NamespaceViewer);
        assert_eq!(ctx.namespace_restriction.as_deref(), Some("team-a"));
    }

    #[test]
    fn empty_table_yields_viewer_default() {
        let ctx = build_context("nobody@example.com", &[], &[]);
        assert_eq!(ctx.role, Role::ClusterViewer);
        assert!(ctx.namespace_restriction.is_none());
        assert!(!ctx.role.can_update());
    }

    #[test]
    fn unknown_role_is_skipped_not_granted() {
        let table = vec![
            assignment("alice@example.com", "super-root", None),
            assignment("alice@example.com", "namespace-developer", Some("team-a")),
        ];
        let ctx = build_context("alice@example.com", &[], &table);
        assert_eq!(ctx.role, Role::NamespaceDeveloper);
    }

    #[test]
    fn empty_namespace_means_no_restriction() {
        let table = vec![assignment("alice@example.com", "cluster-viewer", Some(""))];
        let ctx = build_context("alice@example.com", &[], &table);
        assert!(ctx.namespace_restriction.is_none());
    }

    #[test]
    fn only_admin_tier_can_update() {
        assert!(Role::ClusterAdmin.can_update());
        assert!(Role::NamespaceAdmin.can_update());
        assert!(!Role::ClusterDeveloper.can_update());
        assert!(!Role::NamespaceDeveloper.can_update());
        assert!(!Role::ClusterViewer.can_update());
        assert!(!Role::NamespaceViewer.can_update());
    }

    #[test]
    fn assignment_file_parses() {
        let yaml = r#"
- subject: alice@example.com
  role: cluster-admin
- subject: dev-team
  role: namespace-developer
  namespace: staging
"#;
        let assignments: Vec<RoleAssignment> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[1].namespace.as_deref(), Some("staging"));
    }
}
