use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::provider::ProviderId;

const ENV_PREFIX: &str = "TRIPCAST";

/// Credentials for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base URL of a remote record store, e.g. "http://localhost:5001/weather".
    /// When unset, records live in a local JSON file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Values taken from the environment. Never written back to disk.
    #[serde(skip)]
    overrides: Overrides,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Overrides {
    api_keys: HashMap<ProviderId, String>,
    store_url: Option<String>,
}

impl Config {
    /// Load config from disk (or the empty default on first run), then
    /// apply `TRIPCAST_*` environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        cfg.apply_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "tripcast", "tripcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Where the local record store keeps its file.
    pub fn records_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("records.json"))
    }

    /// Pick up `TRIPCAST_<PROVIDER>_API_KEY` and `TRIPCAST_STORE_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for id in ProviderId::all() {
            let name = format!("{ENV_PREFIX}_{}_API_KEY", id.as_str().to_uppercase());
            if let Some(key) = lookup(&name).filter(|k| !k.trim().is_empty()) {
                tracing::debug!(provider = %id, "API key taken from {name}");
                self.overrides.api_keys.insert(*id, key);
            }
        }

        self.overrides.store_url =
            lookup(&format!("{ENV_PREFIX}_STORE_URL")).filter(|u| !u.trim().is_empty());
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// API key for a provider, preferring the environment over the file.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.overrides
            .api_keys
            .get(&provider_id)
            .map(String::as_str)
            .or_else(|| self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str()))
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    pub fn set_store_url(&mut self, url: Option<String>) {
        self.store_url = url;
    }

    pub fn effective_store_url(&self) -> Option<&str> {
        self.overrides.store_url.as_deref().or(self.store_url.as_deref())
    }
}
