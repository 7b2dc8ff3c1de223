use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::AccessError;
use kview_kinds::Gvr;

/// Raw list/get/update over arbitrary API coordinates. Implemented by
/// the live HTTP client and by the in-memory mock; the accessor, the
/// tracer, and tests all run against this seam.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn list(&self, gvr: &Gvr, namespace: Option<&str>) -> Result<Vec<Value>, AccessError>;

    async fn get(
        &self,
        gvr: &Gvr,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Value, AccessError>;

    async fn update(
        &self,
        gvr: &Gvr,
        namespace: Option<&str>,
        name: &str,
        payload: Value,
    ) -> Result<Value, AccessError>;
}

/// Live client talking to the Kubernetes API server over HTTPS with a
/// bearer token. No caching, no retries — every call is fresh, and an
/// in-flight request is cancelled when the caller's future is dropped.
pub struct HttpClusterClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClusterClient {
    pub fn new(
        endpoint: &str,
        token: Option<String>,
        insecure_skip_tls_verify: bool,
    ) -> Result<Self, AccessError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_skip_tls_verify)
            .build()
            .map_err(AccessError::upstream)?;
        Ok(Self {
            http,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Build the apiserver path for a coordinate: the core group lives
    /// under `/api/v1`, everything else under `/apis/{group}/{version}`.
    fn collection_url(&self, gvr: &Gvr, namespace: Option<&str>) -> String {
        let mut url = if gvr.group.is_empty() {
            format!("{}/api/{}", self.base_url, gvr.version)
        } else {
            format!("{}/apis/{}/{}", self.base_url, gvr.group, gvr.version)
        };
        if let Some(ns) = namespace {
            url.push_str(&format!("/namespaces/{}", ns));
        }
        url.push_str(&format!("/{}", gvr.resource));
        url
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn check(resp: reqwest::Response) -> Result<Value, AccessError> {
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AccessError::NotFound);
        }
        let body = resp.text().await.map_err(AccessError::unreachable)?;
        if !status.is_success() {
            return Err(AccessError::Upstream(format!(
                "apiserver returned {}: {}",
                status,
                body.trim()
            )));
        }
        serde_json::from_str(&body).map_err(AccessError::upstream)
    }
}

#[async_trait]
impl ClusterClient for HttpClusterClient {
    async fn list(&self, gvr: &Gvr, namespace: Option<&str>) -> Result<Vec<Value>, AccessError> {
        let url = self.collection_url(gvr, namespace);
        debug!("GET {}", url);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(AccessError::unreachable)?;
        let body = Self::check(resp).await?;
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(items)
    }

    async fn get(
        &self,
        gvr: &Gvr,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Value, AccessError> {
        let url = format!("{}/{}", self.collection_url(gvr, namespace), name);
        debug!("GET {}", url);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(AccessError::unreachable)?;
        Self::check(resp).await
    }

    async fn update(
        &self,
        gvr: &Gvr,
        namespace: Option<&str>,
        name: &str,
        payload: Value,
    ) -> Result<Value, AccessError> {
        let url = format!("{}/{}", self.collection_url(gvr, namespace), name);
        debug!("PUT {}", url);
        let resp = self
            .request(reqwest::Method::PUT, &url)
            .json(&payload)
            .send()
            .await
            .map_err(AccessError::unreachable)?;
        Self::check(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClusterClient {
        HttpClusterClient::new("https://10.0.0.1:6443/", None, true).unwrap()
    }

    #[test]
    fn core_group_paths() {
        let c = client();
        let pods = Gvr {
            group: String::new(),
            version: "v1".to_string(),
            resource: "pods".to_string(),
        };
        assert_eq!(
            c.collection_url(&pods, Some("default")),
            "https://10.0.0.1:6443/api/v1/namespaces/default/pods"
        );
        let nodes = Gvr {
            group: String::new(),
            version: "v1".to_string(),
            resource: "nodes".to_string(),
        };
        assert_eq!(
            c.collection_url(&nodes, None),
            "https://10.0.0.1:6443/api/v1/nodes"
        );
    }

    #[test]
    fn named_group_paths() {
        let c = client();
        let ingresses = Gvr {
            group: "networking.k8s.io".to_string(),
            version: "v1".to_string(),
            resource: "ingresses".to_string(),
        };
        assert_eq!(
            c.collection_url(&ingresses, Some("demo")),
            "https://10.0.0.1:6443/apis/networking.k8s.io/v1/namespaces/demo/ingresses"
        );
    }
}
