//! wcscanner control client
//!
//! Connects to the scanner, keeps the connection alive and turns lines
//! typed on stdin into scanner commands.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wc_client::input::{self, Input, USAGE};
use wc_client::{ClientRuntime, LinkEvent, LogRenderer, UserAction, WsConnector};
use wc_core::config::{self, ClientConfig};

#[derive(Parser)]
#[command(name = "wc-client")]
#[command(about = "wcscanner control client - drive the turntable over WebSocket")]
#[command(version)]
struct Args {
    /// Scanner address (ws:// URL, host or host:port)
    /// Example: wcscanner.local or 192.168.1.20:6789
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Run in foreground with verbose output
    #[arg(short, long)]
    foreground: bool,

    /// Liveness check period in milliseconds (overrides config)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Reconnect attempts before giving up (overrides config)
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    init_config: bool,

    /// Overwrite an existing config file with --init-config
    #[arg(long, requires = "init_config")]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.foreground { "debug" } else { &args.log_level };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("wcscanner client starting...");

    // Load configuration
    let mut config: ClientConfig = if args.init_config {
        ClientConfig::default()
    } else if let Some(config_path) = &args.config {
        config::load_config(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        let default_path = config::default_config_path();
        if default_path.exists() {
            config::load_config(&default_path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
                ClientConfig::default()
            })
        } else {
            tracing::info!("Using default configuration");
            ClientConfig::default()
        }
    };

    // Apply command-line overrides
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = config::normalize_endpoint(endpoint);
    }
    if let Some(ms) = args.interval_ms {
        config.liveness_interval = Duration::from_millis(ms);
    }
    if let Some(max_attempts) = args.max_attempts {
        config.retry.max_attempts = max_attempts;
    }
    config.validate().context("Invalid configuration")?;

    if args.init_config {
        return init_config(args.config, &config, args.force);
    }

    tracing::info!(
        "Scanner endpoint: {} (liveness every {:?}, up to {} reconnects)",
        config.endpoint,
        config.liveness_interval,
        config.retry.max_attempts
    );

    // Create cancellation token for graceful shutdown
    let cancel = CancellationToken::new();

    // Setup signal handlers
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating shutdown...");
            }
        }

        cancel_clone.cancel();
    });

    let (action_tx, action_rx) = mpsc::channel::<UserAction>(32);

    // Read commands from stdin
    tokio::spawn(read_commands(action_tx, cancel.clone()));

    let mut runtime = ClientRuntime::new(&config, WsConnector::new(), LogRenderer);

    // Tell the user about connectivity changes whatever the log level
    let mut links = runtime.manager().subscribe();
    tokio::spawn(async move {
        loop {
            match links.recv().await {
                Ok(LinkEvent::Online) => println!("scanner online"),
                Ok(LinkEvent::Offline) => println!("scanner offline"),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    runtime
        .run(action_rx, cancel)
        .await
        .context("Scanner connection lost")?;

    tracing::info!("wcscanner client stopped");
    Ok(())
}

/// Save `config` as the client's config file
fn init_config(path: Option<PathBuf>, config: &ClientConfig, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(config::default_config_path);

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {:?}. Use --force to overwrite.",
            path
        );
    }

    config::save_config(&path, config)
        .with_context(|| format!("Failed to write config to {:?}", path))?;
    println!("Created config file at {:?}", path);
    Ok(())
}

/// Forward stdin lines to the runtime until input ends or `quit` is typed
async fn read_commands(actions: mpsc::Sender<UserAction>, cancel: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => return,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::debug!("End of input");
                break;
            }
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };

        match input::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Input::Help)) => println!("{}", USAGE),
            Ok(Some(Input::Quit)) => break,
            Ok(Some(Input::Show(view))) => {
                if actions.send(UserAction::Show(view)).await.is_err() {
                    return;
                }
            }
            Ok(Some(Input::Command(command))) => {
                let action = command.action();
                let (request, reply) = UserAction::send(command);
                if actions.send(request).await.is_err() {
                    return;
                }
                match reply.await {
                    Ok(Ok(())) => println!("sent {}", action),
                    Ok(Err(e)) => eprintln!("error: {}", e),
                    Err(_) => return,
                }
            }
            Err(e) => eprintln!("error: {} (type 'help' for commands)", e),
        }
    }

    cancel.cancel();
}
