use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

use kview_api::server::{ServerConfig, start_server};
use kview_types::config::{ServerConfigFile, load_config_file};

#[derive(Parser, Debug)]
#[command(name = "kview-server", about = "kview cluster dashboard backend")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = "/etc/kview/config.yaml")]
    config: String,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Kubernetes API server endpoint; omit to serve the built-in demo cluster
    #[arg(long)]
    cluster_endpoint: Option<String>,

    /// Bearer token for the cluster API
    #[arg(long)]
    cluster_token: Option<String>,

    /// Skip TLS verification of the cluster API (dev clusters only)
    #[arg(long)]
    insecure_skip_tls_verify: bool,

    /// Path to the role-assignment file
    #[arg(long)]
    rbac_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: ServerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let port = cli.port.or(file_cfg.port).unwrap_or(8443);
    let cluster_endpoint = cli.cluster_endpoint.or(file_cfg.cluster_endpoint);
    let cluster_token = cli.cluster_token.or(file_cfg.cluster_token);
    let insecure_skip_tls_verify = cli.insecure_skip_tls_verify
        || file_cfg.insecure_skip_tls_verify.unwrap_or(false);
    let rbac_path = kview_rbac::assignment_path(
        cli.rbac_path.or(file_cfg.rbac_path).as_deref(),
    );

    info!("Starting kview-server");
    info!("  Port:       {}", port);
    info!(
        "  Cluster:    {}",
        cluster_endpoint.as_deref().unwrap_or("(demo mode)")
    );
    info!("  RBAC file:  {}", rbac_path);

    let config = ServerConfig {
        addr: SocketAddr::from(([0, 0, 0, 0], port)),
        cluster_endpoint,
        cluster_token,
        insecure_skip_tls_verify,
        rbac_path,
    };

    start_server(config).await?;

    Ok(())
}
