use serde::{Deserialize, Serialize};

/// Server configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// port: 8443
/// cluster-endpoint: https://10.0.0.1:6443
/// cluster-token: my-serviceaccount-token
/// rbac-path: /etc/kview/rbac/assignments.yaml
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigFile {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, alias = "cluster-endpoint")]
    pub cluster_endpoint: Option<String>,
    #[serde(default, alias = "cluster-token")]
    pub cluster_token: Option<String>,
    #[serde(default, alias = "rbac-path")]
    pub rbac_path: Option<String>,
    #[serde(default, alias = "insecure-skip-tls-verify")]
    pub insecure_skip_tls_verify: Option<bool>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}
