use axum::{Router, middleware, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::AppState;
use crate::handlers::{resources, stats, trace};
use crate::identity::identity_middleware;
use crate::request_id::request_id_middleware;
use kview_cluster::{ClusterClient, HttpClusterClient, MockClusterClient, ResourceAccessor};
use kview_stats::StatsHistory;

/// Server configuration passed from the binary's CLI.
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub cluster_endpoint: Option<String>,
    pub cluster_token: Option<String>,
    pub insecure_skip_tls_verify: bool,
    pub rbac_path: String,
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let client: Arc<dyn ClusterClient> = match &config.cluster_endpoint {
        Some(endpoint) => {
            info!("Using cluster API at {}", endpoint);
            Arc::new(HttpClusterClient::new(
                endpoint,
                config.cluster_token.clone(),
                config.insecure_skip_tls_verify,
            )?)
        }
        None => {
            warn!("No cluster endpoint configured; serving the built-in demo cluster");
            Arc::new(MockClusterClient::seeded())
        }
    };
    let accessor = ResourceAccessor::new(client);

    let assignments = kview_rbac::load_assignments(&config.rbac_path)?;
    info!(
        "Loaded {} role assignments from {}",
        assignments.len(),
        config.rbac_path
    );

    let stats = StatsHistory::new();
    stats.start_sampler(kview_stats::POLL_INTERVAL);

    let state = AppState {
        accessor,
        assignments,
        stats,
    };

    // Protected API routes
    let api_routes = Router::new()
        .route("/api/resources/{kind}", get(resources::list_resources))
        .route(
            "/api/resources/{kind}/{namespace}/{name}",
            get(resources::get_resource),
        )
        .route(
            "/api/resources/{kind}/{namespace}/{name}/yaml",
            get(resources::get_manifest).put(resources::put_manifest),
        )
        .route(
            "/api/resources/{kind}/{namespace}/{name}/events",
            get(resources::list_events),
        )
        .route(
            "/api/network/trace/{type}/{namespace}/{name}",
            get(trace::trace_topology),
        )
        .route("/api/cluster/stats", get(stats::cluster_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    // Public routes + merged
    let app = Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .merge(api_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state);

    info!("Starting kview API server on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
