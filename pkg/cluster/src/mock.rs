use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::client::ClusterClient;
use crate::error::AccessError;
use kview_kinds::Gvr;

/// In-memory cluster stand-in. Keeps the dashboard fully usable with no
/// live cluster and backs the accessor/tracer tests; counts calls so
/// tests can assert that rejected requests never reach the cluster.
#[derive(Default)]
pub struct MockClusterClient {
    // (resource, namespace) -> objects
    objects: Mutex<HashMap<(String, Option<String>), Vec<Value>>>,
    calls: AtomicUsize,
}

impl MockClusterClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total list/get/update calls issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn insert(&self, resource: &str, namespace: Option<&str>, object: Value) {
        let key = (resource.to_string(), namespace.map(str::to_string));
        self.objects
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .push(object);
    }

    fn name_of(object: &Value) -> Option<&str> {
        object.get("metadata")?.get("name")?.as_str()
    }

    /// A self-contained demo namespace: an ingress fronting a healthy
    /// service with two running pods, plus a path pointing at a service
    /// that does not exist — so every trace shape is visible out of the box.
    pub fn seeded() -> Self {
        let mock = Self::new();
        let ns = "demo";
        mock.insert("namespaces", None, json!({"metadata": {"name": ns}}));
        mock.insert(
            "ingresses",
            Some(ns),
            json!({
                "metadata": {"name": "demo-ingress", "namespace": ns},
                "spec": {"rules": [{"host": "demo.local", "http": {"paths": [
                    {"path": "/", "pathType": "Prefix",
                     "backend": {"service": {"name": "web", "port": {"number": 80}}}},
                    {"path": "/legacy", "pathType": "Prefix",
                     "backend": {"service": {"name": "legacy", "port": {"number": 8080}}}}
                ]}}]}
            }),
        );
        mock.insert(
            "services",
            Some(ns),
            json!({
                "metadata": {"name": "web", "namespace": ns},
                "spec": {"selector": {"app": "web"},
                         "ports": [{"port": 80, "targetPort": 8080}]}
            }),
        );
        for (name, phase) in [("web-7f9b-a1", "Running"), ("web-7f9b-b2", "Running")] {
            mock.insert(
                "pods",
                Some(ns),
                json!({
                    "metadata": {"name": name, "namespace": ns, "labels": {"app": "web"}},
                    "status": {"phase": phase}
                }),
            );
        }
        mock
    }
}

#[async_trait]
impl ClusterClient for MockClusterClient {
    async fn list(&self, gvr: &Gvr, namespace: Option<&str>) -> Result<Vec<Value>, AccessError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let objects = self.objects.lock().unwrap();
        let key = (gvr.resource.clone(), namespace.map(str::to_string));
        if let Some(items) = objects.get(&key) {
            return Ok(items.clone());
        }
        // Namespace-less list over a namespaced resource: all namespaces.
        if namespace.is_none() {
            let mut all = Vec::new();
            for ((resource, _), items) in objects.iter() {
                if resource == &gvr.resource {
                    all.extend(items.iter().cloned());
                }
            }
            return Ok(all);
        }
        Ok(Vec::new())
    }

    async fn get(
        &self,
        gvr: &Gvr,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Value, AccessError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let objects = self.objects.lock().unwrap();
        let key = (gvr.resource.clone(), namespace.map(str::to_string));
        objects
            .get(&key)
            .and_then(|items| items.iter().find(|o| Self::name_of(o) == Some(name)))
            .cloned()
            .ok_or(AccessError::NotFound)
    }

    async fn update(
        &self,
        gvr: &Gvr,
        namespace: Option<&str>,
        name: &str,
        payload: Value,
    ) -> Result<Value, AccessError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let mut objects = self.objects.lock().unwrap();
        let key = (gvr.resource.clone(), namespace.map(str::to_string));
        let items = objects.get_mut(&key).ok_or(AccessError::NotFound)?;
        let slot = items
            .iter_mut()
            .find(|o| Self::name_of(o) == Some(name))
            .ok_or(AccessError::NotFound)?;
        *slot = payload.clone();
        Ok(payload)
    }
}
