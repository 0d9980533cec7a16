//! YAML configuration: sheet locators, the shared dashboard password, cache
//! TTL, and the currency label used in rendered metrics.
//!
//! Local file overrides take precedence over the remote locator so the tool
//! works offline and tests never touch the network. The password may be
//! supplied via the `SALES_INSIGHT_PASSWORD` environment variable instead of
//! the config file.

use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::source::SheetSource;

pub const PASSWORD_ENV: &str = "SALES_INSIGHT_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sheet_id: Option<String>,
    #[serde(default)]
    pub inventory_gid: Option<String>,
    #[serde(default)]
    pub sales_gid: Option<String>,
    /// Local CSV overrides; preferred over the remote locator when set.
    #[serde(default)]
    pub inventory_file: Option<PathBuf>,
    #[serde(default)]
    pub sales_file: Option<PathBuf>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_currency() -> String {
    "Ksh".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading configuration file {path:?}"))?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing configuration file {path:?}"))?;
        Ok(config)
    }

    pub fn inventory_source(&self) -> Result<SheetSource> {
        self.resolve_source(&self.inventory_file, &self.inventory_gid, "inventory")
    }

    pub fn sales_source(&self) -> Result<SheetSource> {
        self.resolve_source(&self.sales_file, &self.sales_gid, "sales")
    }

    fn resolve_source(
        &self,
        file: &Option<PathBuf>,
        gid: &Option<String>,
        sheet: &str,
    ) -> Result<SheetSource> {
        if let Some(path) = file {
            return Ok(SheetSource::File(path.clone()));
        }
        match (&self.sheet_id, gid) {
            (Some(sheet_id), Some(gid)) => Ok(SheetSource::Remote {
                sheet_id: sheet_id.clone(),
                gid: gid.clone(),
            }),
            _ => Err(anyhow!(
                "Configuration is missing a {sheet} source: set {sheet}_file, or sheet_id plus {sheet}_gid"
            )),
        }
    }

    /// The stored shared secret the gate compares against.
    pub fn shared_secret(&self) -> Result<&str> {
        self.password
            .as_deref()
            .ok_or_else(|| anyhow!("Configuration is missing the shared password"))
    }

    /// The password the user supplied: CLI flag first, then environment.
    pub fn supplied_password(cli_password: Option<&str>) -> Result<String> {
        if let Some(password) = cli_password {
            return Ok(password.to_string());
        }
        env::var(PASSWORD_ENV)
            .map_err(|_| anyhow!("No password supplied; pass --password or set {PASSWORD_ENV}"))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
