use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The subset of Kubernetes object metadata the dashboard reads.
/// Unknown fields are ignored on deserialize so any apiserver version works.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}
