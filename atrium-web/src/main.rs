//! Atrium Web Server
//!
//! Backend-for-frontend over a Salesforce CRM, fronted by a remote
//! authorization gate.

use clap::Parser;
use atrium_core::AtriumConfig;
use atrium_web::server::AtriumServer;
use atrium_web::{init_logging, WebConfig};

/// Atrium web server - Salesforce BFF with a remote authorization gate
#[derive(Parser)]
#[command(name = "atrium-web")]
#[command(about = "Backend-for-frontend for the Atrium CRM")]
#[command(version)]
struct Args {
    /// Server host to bind to (overrides ATRIUM_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on (overrides ATRIUM_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    std::env::set_var(
        "RUST_LOG",
        format!("atrium_web={},atrium_auth={},tower_http=debug", args.log_level, args.log_level),
    );
    init_logging();

    // Load environment variables
    dotenvy::dotenv().ok();

    // File config first, then environment, then command line
    let mut config = match &args.config {
        Some(path) => {
            let mut core = match AtriumConfig::from_file(path) {
                Ok(core) => core,
                Err(e) => {
                    eprintln!("Failed to load configuration from {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            core.apply_env();

            WebConfig {
                core,
                ..WebConfig::from_env()
            }
        }
        None => WebConfig::from_env(),
    };

    apply_cli_overrides(&mut config, args.host, args.port);

    if let Err(e) = config.core.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let server = match AtriumServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Command-line bind arguments win over environment and file settings, but
/// only when actually supplied
fn apply_cli_overrides(config: &mut WebConfig, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
}
