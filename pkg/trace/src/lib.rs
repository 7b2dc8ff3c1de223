//! Reconstructs the Ingress → Service → Pod dependency graph by
//! simulating Kubernetes' own label-selector matching.
//!
//! Broken links are the whole point: a missing Service or a selector
//! matching zero pods becomes an unhealthy node in the graph, never a
//! hard error. Only the starting object's absence propagates as NotFound.

mod graph;

pub use graph::GraphBuilder;

use tracing::debug;

use kview_cluster::{AccessError, ResourceAccessor};
use kview_rbac::AuthorizationContext;
use kview_types::pod::Pod;
use kview_types::service::Service;
use kview_types::trace::{NodeKey, TraceGraph, TraceKind};

/// Sentinel pod-node name when a selector matches nothing.
const NO_MATCH_NODE: &str = "None";

pub struct Tracer<'a> {
    accessor: &'a ResourceAccessor,
}

impl<'a> Tracer<'a> {
    pub fn new(accessor: &'a ResourceAccessor) -> Self {
        Self { accessor }
    }

    /// Walk outward from the starting object and assemble the
    /// deduplicated graph. Walk order is fixed, so node/edge emission
    /// order is deterministic within one call.
    pub async fn trace(
        &self,
        start: TraceKind,
        namespace: &str,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<TraceGraph, AccessError> {
        debug!("Tracing {} {}/{}", start, namespace, name);
        let mut graph = GraphBuilder::new();
        match start {
            TraceKind::Ingress => {
                self.trace_from_ingress(&mut graph, namespace, name, ctx)
                    .await?
            }
            TraceKind::Service => {
                self.trace_from_service(&mut graph, namespace, name, ctx)
                    .await?
            }
            TraceKind::Pod => self.trace_from_pod(&mut graph, namespace, name, ctx).await?,
        }
        Ok(graph.finish())
    }

    async fn trace_from_ingress(
        &self,
        graph: &mut GraphBuilder,
        namespace: &str,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<(), AccessError> {
        let ingress = self.accessor.get_ingress(namespace, name, ctx).await?;
        let ingress_key = NodeKey::new(TraceKind::Ingress, name);
        graph.node(ingress_key.clone(), true, "");

        for backend in ingress.service_backends() {
            let service_key = NodeKey::new(TraceKind::Service, backend.name.clone());
            match self.accessor.get_service(namespace, &backend.name, ctx).await {
                Ok(service) => {
                    graph.node(service_key.clone(), true, "");
                    graph.edge(
                        ingress_key.clone(),
                        service_key.clone(),
                        true,
                        &format!("port {}", backend.port.display()),
                    );
                    self.resolve_service_pods(graph, namespace, &service, ctx)
                        .await?;
                }
                Err(AccessError::NotFound) => {
                    // Surface the broken link instead of aborting the walk.
                    graph.node(service_key.clone(), false, "Service Not Found");
                    graph.edge(ingress_key.clone(), service_key, false, "Missing");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn trace_from_service(
        &self,
        graph: &mut GraphBuilder,
        namespace: &str,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<(), AccessError> {
        let service = self.accessor.get_service(namespace, name, ctx).await?;
        let service_key = NodeKey::new(TraceKind::Service, name);
        graph.node(service_key.clone(), true, "");

        // Reverse lookup: any Ingress in the namespace whose backend
        // references this Service by name.
        for ingress in self.accessor.list_ingresses(namespace, ctx).await? {
            if ingress.references_service(name) {
                let ingress_key = NodeKey::new(TraceKind::Ingress, ingress.metadata.name.clone());
                graph.node(ingress_key.clone(), true, "");
                graph.edge(ingress_key, service_key.clone(), true, "");
            }
        }

        self.resolve_service_pods(graph, namespace, &service, ctx)
            .await
    }

    async fn trace_from_pod(
        &self,
        graph: &mut GraphBuilder,
        namespace: &str,
        name: &str,
        ctx: &AuthorizationContext,
    ) -> Result<(), AccessError> {
        let pod = self.accessor.get_pod(namespace, name, ctx).await?;
        let pod_key = NodeKey::new(TraceKind::Pod, name);
        let message = if pod.is_running() { "" } else { pod.phase() };
        graph.node(pod_key.clone(), pod.is_running(), message);

        for service in self.accessor.list_services(namespace, ctx).await? {
            if service.selector_matches(&pod.metadata.labels) {
                let service_key = NodeKey::new(TraceKind::Service, service.metadata.name.clone());
                graph.node(service_key.clone(), true, "");
                graph.edge(service_key, pod_key.clone(), true, "");
            }
        }
        Ok(())
    }

    /// Shared Service→Pod step: list the namespace's pods and attach
    /// every selector match. A selector matching nothing yields a
    /// sentinel node so the graph shows why the path terminated.
    async fn resolve_service_pods(
        &self,
        graph: &mut GraphBuilder,
        namespace: &str,
        service: &Service,
        ctx: &AuthorizationContext,
    ) -> Result<(), AccessError> {
        let service_key = NodeKey::new(TraceKind::Service, service.metadata.name.clone());
        let pods = self.accessor.list_pods(namespace, ctx).await?;

        let matching: Vec<&Pod> = pods
            .iter()
            .filter(|p| service.selector_matches(&p.metadata.labels))
            .collect();

        if matching.is_empty() {
            let sentinel = NodeKey::new(TraceKind::Pod, NO_MATCH_NODE);
            graph.node(sentinel.clone(), false, "No matching pods");
            graph.edge(service_key, sentinel, false, "Selector Mismatch");
            return Ok(());
        }

        for pod in matching {
            let pod_key = NodeKey::new(TraceKind::Pod, pod.metadata.name.clone());
            let message = if pod.is_running() { "" } else { pod.phase() };
            graph.node(pod_key.clone(), pod.is_running(), message);
            graph.edge(service_key.clone(), pod_key, true, "");
        }
        Ok(())
    }
}
