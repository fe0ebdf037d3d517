use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Parser, Debug, Default)]
#[command(name = "catalog_browser", about = "Browse a product catalog")]
pub struct Cli {
    /// Catalog endpoint returning `{ "record": [...] }`.
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Defaults to `catalog.toml` in the working directory when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_endpoint: Option<String>,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: None,
            request_timeout_secs: client_core::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn endpoint(&self) -> anyhow::Result<&str> {
        match self.api_endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => Ok(endpoint),
            _ => bail!(
                "no catalog endpoint configured; pass --endpoint, set CATALOG_API_ENDPOINT or \
                 add api_endpoint to {DEFAULT_CONFIG_FILE}"
            ),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

/// Layers defaults, the config file, the environment (through `lookup`) and CLI flags, in
/// that order.
pub fn load_settings(
    cli: &Cli,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(file_cfg) = read_config_file(cli.config.as_deref())? {
        if let Some(v) = file_cfg.api_endpoint {
            settings.api_endpoint = Some(v);
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    if let Some(v) = lookup("CATALOG_API_ENDPOINT") {
        settings.api_endpoint = Some(v);
    }
    if let Some(v) = lookup("APP__API_ENDPOINT") {
        settings.api_endpoint = Some(v);
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .trim()
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = &cli.endpoint {
        settings.api_endpoint = Some(v.clone());
    }
    if let Some(v) = cli.timeout_secs {
        settings.request_timeout_secs = v;
    }

    Ok(settings)
}

fn read_config_file(explicit: Option<&Path>) -> anyhow::Result<Option<FileConfig>> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                return Ok(None);
            }
            fallback
        }
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let parsed = toml::from_str::<FileConfig>(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(Some(parsed))
}
