//! Folio Server
//!
//! Schema-less JSON document server: any URL path is a collection.
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use folio_core::core::{config, factory::create_app_state, Config};
use folio_core::log_info;
use folio_server::{api::api_server::start_api_server, telemetry};

fn cli() -> Command {
    Command::new("folio")
        .version(folio_core::VERSION)
        .about("Schema-less JSON document server")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .value_parser(clap::value_parser!(SocketAddr))
                .help("HTTP bind address, e.g. 0.0.0.0:3000"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16))
                .help("HTTP port, keeping the configured host"),
        )
        .arg(
            Arg::new("data-dir")
                .short('d')
                .long("data-dir")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Root directory of the file backend"),
        )
        .arg(
            Arg::new("storage-type")
                .long("storage-type")
                .value_name("TYPE")
                .value_parser(["file", "memory"])
                .help("Storage backend"),
        )
        .arg(
            Arg::new("put-semantics")
                .long("put-semantics")
                .value_name("MODE")
                .value_parser(["replace", "merge"])
                .help("Whether PUT replaces or merges the stored document"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .help("Default log level when RUST_LOG is unset"),
        )
}

/// Command-line flags override file and environment settings
fn apply_cli_overrides(config: &mut Config, matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(addr) = matches.get_one::<SocketAddr>("http-addr") {
        config.server.http_addr = *addr;
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.http_addr.set_port(*port);
    }
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config.storage.data_dir = dir.clone();
    }
    if let Some(kind) = matches.get_one::<String>("storage-type") {
        config.storage.storage_type = kind.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(mode) = matches.get_one::<String>("put-semantics") {
        config.storage.put_semantics = mode.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(Path::new);
    let mut config = config::load_config_or_default(config_path).context("loading configuration")?;
    apply_cli_overrides(&mut config, &matches)?;
    config.validate().context("validating configuration")?;

    // Initialize logging
    telemetry::init_tracing(&config.logging)?;

    log_info!("Starting Folio {}", folio_core::VERSION);
    log_info!(
        "Storage: {:?} at {}, PUT semantics {:?}",
        config.storage.storage_type,
        config.storage.data_dir.display(),
        config.storage.put_semantics
    );

    // Create AppState using factory pattern
    let configured_app_state = create_app_state(config).context("initialising storage")?;
    log_info!("AppState created successfully");

    start_api_server(configured_app_state).await?;

    log_info!("Shutdown complete");
    Ok(())
}
