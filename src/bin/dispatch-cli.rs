use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::AsyncBufReadExt;

use route_dispatch::config::{self, load_config, ConfigWatcher};
use route_dispatch::observability;
use route_dispatch::registry::endpoint::{Endpoint, SharedEndpoint};
use route_dispatch::{DispatchTable, EndpointSelector, InMemoryRegistry, RouteValues, Shutdown};

#[derive(Parser)]
#[command(name = "dispatch-cli")]
#[command(about = "Inspect and run a route-value dispatch table", long_about = None)]
struct Cli {
    /// Endpoint configuration file (TOML).
    #[arg(short, long, default_value = "dispatch.toml")]
    config: PathBuf,

    /// Emit JSON instead of plain text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dispatch table built from the config file
    Inspect,
    /// Resolve name=value route values against the config file
    Resolve {
        /// Route values as name=value pairs, in any order
        values: Vec<String>,
    },
    /// Run with hot reload, resolving queries read from stdin
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    observability::init_logging(&config.observability.log_level);

    match cli.command {
        Commands::Inspect => inspect(&config, cli.json)?,
        Commands::Resolve { values } => resolve(&config, &values, cli.json)?,
        Commands::Watch => watch(cli.config, config).await?,
    }

    Ok(())
}

fn selector_for(endpoints: Vec<Endpoint>) -> EndpointSelector {
    let registry = Arc::new(InMemoryRegistry::with_endpoints(endpoints));
    EndpointSelector::new(registry)
}

/// Exact buckets in lexicographic key order, so repeated runs print
/// identically for the same config.
fn sorted_buckets(table: &DispatchTable) -> Vec<(&[String], &[SharedEndpoint])> {
    let mut buckets: Vec<_> = table.exact_buckets().collect();
    buckets.sort_by(|a, b| a.0.cmp(b.0));
    buckets
}

fn inspect(
    config: &config::DispatchConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let selector = selector_for(config.to_endpoints());
    let table = selector.table()?;

    if json {
        let buckets: Vec<serde_json::Value> = sorted_buckets(&table)
            .into_iter()
            .map(|(key, endpoints)| {
                serde_json::json!({
                    "key": key,
                    "endpoints": endpoints.iter().map(|e| e.name()).collect::<Vec<_>>(),
                })
            })
            .collect();
        let view = serde_json::json!({
            "canonical_keys": table.canonical_keys(),
            "endpoints": table.endpoint_count(),
            "buckets": buckets,
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("Canonical key order: {}", table.canonical_keys().join(", "));
        println!("Endpoints: {}", table.endpoint_count());
        for (key, endpoints) in sorted_buckets(&table) {
            let names: Vec<&str> = endpoints.iter().map(|e| e.name()).collect();
            println!("  ({}) -> {}", key.join(", "), names.join(", "));
        }
    }
    Ok(())
}

fn resolve(
    config: &config::DispatchConfig,
    pairs: &[String],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let values = parse_route_values(pairs)?;
    let selector = selector_for(config.to_endpoints());
    let table = selector.table()?;
    let result = table.lookup(&values);

    if json {
        let endpoints: Vec<&Endpoint> = result.endpoints.iter().map(|e| e.as_ref()).collect();
        let view = serde_json::json!({
            "match": result.kind.as_label(),
            "endpoints": endpoints,
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else if result.endpoints.is_empty() {
        println!("no match");
    } else {
        println!("match: {}", result.kind.as_label());
        for endpoint in result.endpoints {
            println!("{}", endpoint.name());
        }
    }
    Ok(())
}

async fn watch(
    path: PathBuf,
    config: config::DispatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(config = ?path, "dispatch service starting");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let registry = Arc::new(InMemoryRegistry::with_endpoints(config.to_endpoints()));
    let selector = EndpointSelector::new(registry.clone());

    // Keep the watcher handle alive; dropping it stops file notifications.
    let _watcher = if config.watch.enabled {
        let (watcher, updates) = ConfigWatcher::new(&path);
        let handle = watcher.run(Duration::from_secs(config.watch.poll_interval_secs))?;
        tokio::spawn(config::watcher::run_update_loop(
            registry.clone(),
            updates,
            shutdown.subscribe(),
        ));
        Some(handle)
    } else {
        tracing::info!("Hot reload disabled by config");
        None
    };

    println!("Enter route values as name=value pairs (Ctrl+C to exit):");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => {
                        let pairs: Vec<String> =
                            line.split_whitespace().map(str::to_string).collect();
                        match parse_route_values(&pairs) {
                            Ok(values) => match selector.select(&values) {
                                Ok(matched) if matched.is_empty() => println!("no match"),
                                Ok(matched) => {
                                    for endpoint in &matched {
                                        println!("{}", endpoint.name());
                                    }
                                }
                                Err(e) => eprintln!("Error: {}", e),
                            },
                            Err(e) => eprintln!("Error: {}", e),
                        }
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, shutting down");
                break;
            }
        }
    }

    shutdown.trigger();
    selector.dispose();
    tracing::info!("Shutdown complete");
    Ok(())
}

fn parse_route_values(pairs: &[String]) -> Result<RouteValues, Box<dyn std::error::Error>> {
    let mut values = RouteValues::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            return Err(format!("'{}' is not a name=value pair", pair).into());
        };
        values.set(name, value);
    }
    Ok(values)
}
