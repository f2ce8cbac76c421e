use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tracing::{info, warn};

use sgw_pool::{NodePool, RefreshScheduler};
use sgw_server::{AppState, GatewayConfig, GatewayServer};
use sgw_store::StaticDiscovery;
use sgw_types::{GatewayResult, ObjectKey};

use crate::cli::*;
use crate::logging;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Locate(args) => cmd_locate(args),
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<GatewayConfig> {
    match &args.config {
        Some(path) => GatewayConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(GatewayConfig::default()),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(bind) = args.bind {
        config.api.bind_addr = bind;
    }
    logging::init(&config.app)?;

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(serve(config))
}

async fn serve(config: GatewayConfig) -> anyhow::Result<()> {
    let discovery = Arc::new(StaticDiscovery::in_memory(&config.nodes));
    let pool = Arc::new(NodePool::new());
    let scheduler = RefreshScheduler::new(pool.clone(), discovery, config.pool.clone());
    // Prime the ring so the first requests have somewhere to go.
    if let Err(e) = scheduler.refresh_now().await {
        warn!(error = %e, "initial node discovery failed, serving with an empty ring");
    }
    scheduler.start()?;
    info!(
        nodes = config.nodes.len(),
        interval = ?config.pool.refresh_interval(),
        "node pool scheduled"
    );

    let state = AppState::new(pool, &config.api);
    let server = GatewayServer::new(config.api.clone(), state)
        .with_shutdown_timeout(config.app.shutdown_timeout());
    let result = server.serve().await;

    scheduler.stop();
    result?;
    Ok(())
}

fn cmd_locate(args: LocateArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let pool = pool_from_config(&config);
    let ring = pool.snapshot();
    println!("Ring: {} nodes", ring.len().to_string().bold());
    for entry in ring.entries() {
        println!("  {:#010x}  {}", entry.hash, entry.node.id().cyan());
    }
    println!();

    for (key, owner) in locate_keys(&pool, &args.keys) {
        match owner {
            Ok(node) => println!("  {} → {}", key.yellow(), node.green()),
            Err(e) => println!("  {} {} ({})", key.yellow(), "✗".red(), e),
        }
    }
    Ok(())
}

fn pool_from_config(config: &GatewayConfig) -> NodePool {
    let pool = NodePool::new();
    pool.rebalance(StaticDiscovery::in_memory(&config.nodes).nodes().to_vec());
    pool
}

fn locate_keys(pool: &NodePool, keys: &[String]) -> Vec<(String, GatewayResult<String>)> {
    keys.iter()
        .map(|raw| {
            let owner = ObjectKey::new(raw.as_str())
                .validate()
                .and_then(|_| pool.lookup(raw))
                .map(|node| node.id().to_owned());
            (raw.clone(), owner)
        })
        .collect()
}

fn cmd_check_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    println!("{} Configuration valid", "✓".green().bold());
    println!("  Listen: {}", config.api.bind_addr.to_string().bold());
    println!("  Nodes: {}", config.nodes.len());
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use sgw_store::NodeSpec;
    use sgw_types::GatewayError;

    use super::*;

    fn config(nodes: &[NodeSpec]) -> GatewayConfig {
        GatewayConfig {
            nodes: nodes.to_vec(),
            ..GatewayConfig::default()
        }
    }

    #[test]
    fn locate_reports_owner_or_reason() {
        let pool = pool_from_config(&config(&[NodeSpec::new("storage-1")]));
        let keys = vec!["abc123".to_owned(), "not-valid".to_owned()];
        let results = locate_keys(&pool, &keys);

        assert_eq!(results[0].1.as_deref(), Ok("storage-1"));
        assert_eq!(results[1].1, Err(GatewayError::object_id_not_valid()));
    }

    #[test]
    fn locate_with_no_nodes_is_not_available() {
        let pool = pool_from_config(&config(&[]));
        let results = locate_keys(&pool, &["abc".to_owned()]);
        assert_eq!(results[0].1, Err(GatewayError::storage_not_available()));
    }

    #[test]
    fn locate_honours_offline_nodes() {
        let mut offline = NodeSpec::new("storage-1");
        offline.online = false;
        let pool = pool_from_config(&config(&[offline]));
        let results = locate_keys(&pool, &["abc".to_owned()]);
        assert_eq!(results[0].1, Err(GatewayError::storage_not_available()));
    }

    #[test]
    fn missing_config_path_defaults() {
        let c = load_config(&ConfigArgs { config: None }).unwrap();
        assert_eq!(c, GatewayConfig::default());
    }

    #[test]
    fn unreadable_config_is_reported() {
        let args = ConfigArgs { config: Some("/definitely/not/here.toml".into()) };
        let err = load_config(&args).unwrap_err();
        assert!(err.to_string().contains("here.toml"));
    }
}
