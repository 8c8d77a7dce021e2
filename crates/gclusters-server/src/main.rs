//! gclusters site server.
//!
//! Serves the single-page site from a directory: clean page URLs answer
//! with `index.html`, legacy `.html` page URLs are redirected, assets are
//! served as files, and `POST /ads-proxy` forwards ADS API requests with
//! the server-side token.

mod config;
mod proxy;
mod routes;
mod spa;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "gclusters-server", version, about = "Serve the gclusters site")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Interface to bind; overrides SPA_HOST.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind; overrides SPA_PORT.
    #[arg(short, long)]
    port: Option<u16>,

    /// Site directory containing index.html.
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Environment file read at startup.
    #[arg(long, value_name = "FILE", default_value = ".env")]
    env_file: PathBuf,
}

impl Cli {
    fn resolve(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ServerConfig::default(),
        };

        let env = config::load_env(&self.env_file)
            .with_context(|| format!("reading {}", self.env_file.display()))?;
        config.apply_env(&env)?;

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(root) = self.root {
            config.root = root;
        }

        config.validate()?;
        Ok(config)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().resolve()?;
    if !config.index_file().is_file() {
        log::warn!("No index.html in {}", config.root.display());
    }
    if config.ads_token.is_none() {
        log::warn!("ADS_TOKEN not set; /ads-proxy will refuse requests");
    }

    let state = routes::AppState::new(&config)?;
    let app = routes::router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("Serving SPA at http://{addr}");
    log::info!("Press Ctrl+C to stop the server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["gclusters-server", "--env-file", "/nonexistent/.env"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn flags_override_defaults() {
        let config = cli(&["--host", "0.0.0.0", "--port", "9000", "--root", "site"])
            .resolve()
            .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.root, PathBuf::from("site"));
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "port = 8100\nproxy_timeout_secs = 5").unwrap();
        let config = cli(&["--config", path.to_str().unwrap()]).resolve().unwrap();
        assert_eq!(config.proxy_timeout_secs, 5);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(cli(&["--config", "/nonexistent/server.toml"]).resolve().is_err());
    }
}
