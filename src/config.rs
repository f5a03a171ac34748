use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::infra::firebase::gateway::{FirebaseConfig, DEFAULT_ROOT_PATH};

pub const ENV_DATABASE_URL: &str = "DELIVERY_ADMIN_DATABASE_URL";
pub const ENV_AUTH_TOKEN: &str = "DELIVERY_ADMIN_AUTH_TOKEN";
pub const ENV_ROOT_PATH: &str = "DELIVERY_ADMIN_ROOT";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// On-disk `config.yml`; every field is optional.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub database_url: Option<String>,
    pub auth_token: Option<String>,
    pub root_path: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub sqlite_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Firebase(FirebaseConfig),
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) => {
            Err(e).with_context(|| format!("failed to read config: {}", path.display()))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ConfigFile {
    /// Environment values win over the file.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = non_empty(lookup(ENV_DATABASE_URL)) {
            self.database_url = Some(url);
        }
        if let Some(token) = non_empty(lookup(ENV_AUTH_TOKEN)) {
            self.auth_token = Some(token);
        }
        if let Some(root) = non_empty(lookup(ENV_ROOT_PATH)) {
            self.root_path = Some(root);
        }
        self
    }

    /// Picks the remote database when a URL is configured, else the local store.
    pub fn resolve(self, data_dir: &Path) -> AppConfig {
        let backend = match non_empty(self.database_url) {
            Some(database_url) => Backend::Firebase(FirebaseConfig {
                database_url,
                auth_token: non_empty(self.auth_token),
                root_path: non_empty(self.root_path)
                    .unwrap_or_else(|| DEFAULT_ROOT_PATH.to_string()),
                request_timeout_secs: self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            }),
            None => Backend::Sqlite {
                path: non_empty(self.sqlite_path)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| data_dir.join("prices.sqlite")),
            },
        };
        AppConfig { backend }
    }
}
