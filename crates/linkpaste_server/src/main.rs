//! Headless API server entrypoint.

use linkpaste_core::config::env_flag_enabled;
use linkpaste_core::DEFAULT_PORT;
use linkpaste_server::{config::Config, db::Database, serve_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "linkpaste=info,linkpaste_server=info,linkpaste_core=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;
    tracing::info!(
        "Opened {} stored paste(s) from {}",
        database.pastes.len()?,
        config.db_path
    );

    let state = AppState::new(config.clone(), database);

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }
    if config.trust_forwarded_for {
        tracing::warn!("TRUST_FORWARDED_FOR enabled - rate limiting keys on X-Forwarded-For");
    }

    let bind_addr = linkpaste_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("LinkPaste running at http://{}", actual_addr);
    tracing::info!("Share links use base URL {}", config.base_url());

    serve_router(listener, state, allow_public, shutdown_signal()).await?;
    tracing::info!("LinkPaste stopped");

    Ok(())
}

fn print_help() {
    println!("LinkPaste Server\n");
    println!("Usage: linkpaste [OPTIONS]\n");
    println!("Options:");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database directory (default: ~/.cache/linkpaste/db)");
    println!(
        "  PORT              Server port (default: {})",
        DEFAULT_PORT
    );
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
    println!("  MAX_PASTE_SIZE    Maximum paste size in bytes (default: 10MB)");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin and non-loopback binds");
    println!("  PUBLIC_BASE_URL   Base URL used in share links (default: http://localhost:PORT)");
    println!("  RATE_LIMIT_MAX_REQUESTS  Pastes per client per window, 0 disables (default: 5)");
    println!("  RATE_LIMIT_WINDOW_SECS   Rate limit window in seconds (default: 60)");
    println!("  TRUST_FORWARDED_FOR      Key rate limits on X-Forwarded-For");
    println!("  RUST_LOG          Log filter (default: linkpaste=info,tower_http=warn)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (
                vec!["linkpaste".to_string(), "--force-unlock".to_string()],
                "Unknown option",
            ),
            (
                vec!["linkpaste".to_string(), "serve".to_string()],
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_help() {
        for flag in ["--help", "-h"] {
            let args = vec!["linkpaste".to_string(), flag.to_string()];
            let flags = parse_cli_flags(&args).expect("known options should parse");
            assert_eq!(flags, CliFlags { help: true });
        }
        let flags = parse_cli_flags(&["linkpaste".to_string()]).expect("no options");
        assert_eq!(flags, CliFlags::default());
    }
}
