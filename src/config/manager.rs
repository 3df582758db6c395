//! Configuration file wrangling
// (c) 2025 Ross Younger

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format as _, Serialized, Toml},
    value::{Dict, Map},
};
use tracing::{debug, warn};

use super::{Configuration, ConfigurationOverrides};

/// Prefix for configuration environment variables, e.g. `NETSTORE_CHUNK_SIZE`
pub const ENV_PREFIX: &str = "NETSTORE_";

const BASE_NAME: &str = "netstore-client";

/// Processes and merges all possible configuration sources.
///
/// In increasing order of priority: hard-wired defaults, the system configuration file,
/// the user configuration file, environment variables, and whatever the caller merges
/// afterwards (usually the command line).
///
/// To see which files apply on the current platform, run `netstore-client --config-files`.
#[derive(Debug)]
pub struct Manager {
    data: Figment,
}

impl Manager {
    fn new(apply_config_files: bool, apply_env: bool) -> Self {
        let mut new1 = Self {
            data: Figment::from(SystemDefault {}),
        };
        if apply_config_files {
            new1.add_config("system", system_config_path());
            new1.add_config("user", user_config_path());
        }
        if apply_env {
            new1.merge_provider(Env::prefixed(ENV_PREFIX));
        }
        new1
    }

    /// General constructor for production use
    #[must_use]
    pub fn standard() -> Self {
        Self::new(true, true)
    }

    /// Testing constructor: reads neither files nor environment
    #[cfg(test)]
    #[must_use]
    pub(crate) fn without_files() -> Self {
        Self::new(false, false)
    }

    fn add_config(&mut self, what: &str, path: Option<PathBuf>) {
        let Some(path) = path else {
            warn!("could not determine {what} configuration file path");
            return;
        };
        if !path.exists() {
            debug!("{what} configuration file {path:?} not present");
            return;
        }
        self.merge_file(&path);
    }

    /// Merges in a TOML configuration file.
    pub fn merge_file<P: AsRef<Path>>(&mut self, path: P) {
        self.merge_provider(Toml::file(path.as_ref()));
    }

    /// Merges in a data set, which is some sort of [figment::Provider](https://docs.rs/figment/latest/figment/trait.Provider.html).
    /// This uses figment's `merge` operation, which prefers to _replace_ existing items.
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider);
    }

    /// Returns the list of configuration files we would read.
    #[must_use]
    pub fn config_files() -> Vec<String> {
        system_config_path()
            .into_iter()
            .chain(user_config_path())
            .map(|p| p.to_string_lossy().to_string())
            .collect()
    }

    /// Extracts and validates the merged configuration
    pub fn get(&self) -> Result<Configuration> {
        let cfg: Configuration = self.data.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Renders the merged configuration, with the source of each value
    pub fn describe(&self) -> Result<String> {
        let cfg = self.get()?;
        let mut out = String::new();
        for (field, value) in cfg.fields() {
            let source = self
                .data
                .find_metadata(field)
                .map_or_else(|| "unknown".to_string(), |m| m.name.to_string());
            writeln!(out, "{field:<16} {value:<24} ({source})")?;
        }
        Ok(out)
    }
}

/// A [`figment::Provider`] that holds the hard-wired defaults
struct SystemDefault {}

impl Provider for SystemDefault {
    fn metadata(&self) -> Metadata {
        Metadata::named("default")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(Configuration::system_default()).data()
    }
}

impl Provider for ConfigurationOverrides {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

fn system_config_path() -> Option<PathBuf> {
    if cfg!(unix) {
        Some(PathBuf::from(format!("/etc/{BASE_NAME}.toml")))
    } else {
        None
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(BASE_NAME).join(format!("{BASE_NAME}.toml")))
}
