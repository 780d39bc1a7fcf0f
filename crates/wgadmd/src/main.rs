//! wgadmd - WireGuard appliance admin gateway daemon
//!
//! Exposes a remote wg-easy appliance's administrative API as a typed
//! HTTP/JSON surface.
//!
//! Usage:
//!   wgadmd [config.toml]
//!
//! Appliance credentials can also come from the environment:
//!   WGADM_APPLIANCE_ADDRESS, WGADM_APPLIANCE_PASSWORD
//!
//! When credentials are available the daemon connects eagerly at startup;
//! a failed attempt is logged and the server still comes up, since Connect
//! can be re-issued over the API at any time.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wgadm_api::{create_router, AppState};
use wgadm_client::{ApplianceClient, ADMIN_PORT};

/// Default port the gateway listens on
const DEFAULT_PORT: u16 = 8090;

/// Parsed command-line arguments
struct Args {
    /// Server config file (TOML)
    config_path: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args { config_path: None };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(arg.to_string());
                i += 1;
            }
            _ => {
                tracing::warn!("Unknown argument: {}", args[i]);
                i += 1;
            }
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"wgadmd - WireGuard appliance admin gateway daemon

Usage: wgadmd [config.toml]

Options:
  -h, --help    Print this help message

Config file (TOML):
  [server]
  port = 8090

  [appliance]
  address = "10.0.0.5"
  password = "secret"
  port = 51821          # only needed behind a port remap

Environment overrides:
  WGADM_APPLIANCE_ADDRESS, WGADM_APPLIANCE_PASSWORD
"#
    );
}

/// Resolved daemon configuration
struct Config {
    port: u16,
    appliance_address: Option<String>,
    appliance_password: Option<String>,
    appliance_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            appliance_address: None,
            appliance_password: None,
            appliance_port: ADMIN_PORT,
        }
    }
}

/// Load configuration from an optional TOML file, then apply environment
/// overrides
fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    let mut config = Config::default();

    if let Some(path) = path {
        tracing::info!("Loading config from: {}", path);
        let content = std::fs::read_to_string(path)?;
        let value: toml::Value = toml::from_str(&content)?;

        if let Some(port) = value
            .get("server")
            .and_then(|s| s.get("port"))
            .and_then(|p| p.as_integer())
        {
            config.port = port as u16;
        }

        if let Some(appliance) = value.get("appliance") {
            config.appliance_address = appliance
                .get("address")
                .and_then(|a| a.as_str())
                .map(|s| s.to_string());
            config.appliance_password = appliance
                .get("password")
                .and_then(|p| p.as_str())
                .map(|s| s.to_string());
            if let Some(port) = appliance.get("port").and_then(|p| p.as_integer()) {
                config.appliance_port = port as u16;
            }
        }
    }

    if let Ok(address) = std::env::var("WGADM_APPLIANCE_ADDRESS") {
        config.appliance_address = Some(address);
    }
    if let Ok(password) = std::env::var("WGADM_APPLIANCE_PASSWORD") {
        config.appliance_password = Some(password);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wgadmd=info,wgadm_api=info,wgadm_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting wgadmd (WireGuard appliance admin gateway)");

    let args = parse_args();
    let config = load_config(args.config_path.as_deref())?;

    let state = AppState::with_appliance_port(config.appliance_port);

    // Eager connect so the gateway is usable immediately
    match (&config.appliance_address, &config.appliance_password) {
        (Some(address), Some(password)) => {
            match ApplianceClient::connect_with_port(address, config.appliance_port, password)
                .await
            {
                Ok(client) => {
                    state.replace_session(client).await;
                    tracing::info!(address = %address, "connected to appliance");
                }
                Err(e) => {
                    tracing::error!(address = %address, error = %e, "failed to connect to appliance")
                }
            }
        }
        _ => tracing::info!("no appliance credentials configured, waiting for connect call"),
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gracefully stopped");

    Ok(())
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
