//! Server configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then environment variables (`SPA_HOST`, `SPA_PORT`, `ADS_TOKEN`), then
//! command-line flags. Variables from a `.env` file override the process
//! environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use gclusters_types::error::{GcError, Result};

pub const ENV_HOST: &str = "SPA_HOST";
pub const ENV_PORT: &str = "SPA_PORT";
pub const ENV_ADS_TOKEN: &str = "ADS_TOKEN";

/// Environment variables visible to the server.
pub type EnvMap = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding `index.html` and the static assets.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Bearer token forwarded to the ADS. Usually set through `ADS_TOKEN`.
    #[serde(default)]
    pub ads_token: Option<String>,
    /// Only URLs starting with this prefix are proxied.
    #[serde(default = "default_ads_api_prefix")]
    pub ads_api_prefix: String,
    #[serde(default = "default_proxy_timeout_secs")]
    pub proxy_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    8002
}
fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_ads_api_prefix() -> String {
    "https://api.adsabs.harvard.edu".to_string()
}
fn default_proxy_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: default_root(),
            ads_token: None,
            ads_api_prefix: default_ads_api_prefix(),
            proxy_timeout_secs: default_proxy_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Override settings from environment variables.
    ///
    /// An unparsable `SPA_PORT` is an error rather than silently ignored.
    pub fn apply_env(&mut self, env: &EnvMap) -> Result<()> {
        if let Some(host) = env.get(ENV_HOST).filter(|h| !h.is_empty()) {
            self.host = host.clone();
        }
        if let Some(port) = env.get(ENV_PORT).filter(|p| !p.is_empty()) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| GcError::Config(format!("{ENV_PORT} is not a port: {port}")))?;
        }
        if let Some(token) = env.get(ENV_ADS_TOKEN).filter(|t| !t.is_empty()) {
            self.ads_token = Some(token.clone());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(GcError::Config("host must not be empty".into()));
        }
        if !self.ads_api_prefix.starts_with("http") {
            return Err(GcError::Config(format!(
                "ads_api_prefix must be an http(s) URL, got {}",
                self.ads_api_prefix
            )));
        }
        if self.proxy_timeout_secs == 0 {
            return Err(GcError::Config("proxy_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_timeout_secs)
    }

    pub fn index_file(&self) -> PathBuf {
        self.root.join("index.html")
    }
}

// -----------------------------------------------------------------------
// .env files
// -----------------------------------------------------------------------

/// Parse `KEY=value` lines. Blank lines, comments and lines without `=`
/// are skipped; values are taken verbatim after the first `=`.
pub fn parse_dotenv(source: &str) -> EnvMap {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .collect()
}

/// The process environment overlaid with the `.env` file at `path`, if it
/// exists.
pub fn load_env(path: &Path) -> Result<EnvMap> {
    let mut env: EnvMap = std::env::vars().collect();
    match std::fs::read_to_string(path) {
        Ok(source) => {
            let file = parse_dotenv(&source);
            log::debug!("Loaded {} variables from {}", file.len(), path.display());
            env.extend(file);
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
        Err(e) => return Err(e.into()),
    }
    Ok(env)
}
