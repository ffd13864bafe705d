//! Client configuration: file, environment, then explicit overrides.

use std::path::Path;

use hdfs_rpc::config::DEFAULT_NAMENODE_PORT;
use hdfs_rpc::{AuthMode, ConnectionOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming the NameNode (`host[:port]`).
pub const ENV_NAMENODE: &str = "HADOOP_NAMENODE";

/// Environment variable naming the effective user.
pub const ENV_USER: &str = "HADOOP_USER_NAME";

/// Settings for a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// NameNode as `host`, `host:port` or `hdfs://host:port`.
    pub namenode: Option<String>,
    /// Effective user; falls back to `HADOOP_USER_NAME`, then `USER`.
    pub user: Option<String>,
    /// Authentication mode.
    pub auth: AuthMode,
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Per-frame read/write timeout in milliseconds.
    pub io_timeout_ms: u64,
    /// Whole-call timeout in milliseconds.
    pub rpc_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let defaults = ConnectionOptions::default();
        Self {
            namenode: None,
            user: None,
            auth: AuthMode::Simple,
            connect_timeout_ms: defaults.connect_timeout_ms,
            io_timeout_ms: defaults.io_timeout_ms,
            rpc_timeout_ms: defaults.rpc_timeout_ms,
        }
    }
}

impl ClientConfig {
    /// Loads a TOML or JSON file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match ext.to_lowercase().as_str() {
            "toml" => Ok(toml::from_str(&contents)?),
            "json" => Ok(serde_json::from_str(&contents)?),
            _ => Err(ConfigError::UnsupportedExtension(ext.to_string())),
        }
    }

    /// Fills unset fields from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Fills unset fields from `lookup`. `HADOOP_NAMENODE` only applies when
    /// no namenode is configured.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.namenode.is_none() {
            self.namenode = lookup(ENV_NAMENODE).filter(|v| !v.is_empty());
        }
        if self.user.is_none() {
            self.user = lookup(ENV_USER)
                .filter(|v| !v.is_empty())
                .or_else(|| lookup("USER").filter(|v| !v.is_empty()));
        }
        self
    }

    /// Builds connection options. Fails without a namenode.
    pub fn connection_options(&self) -> Result<ConnectionOptions, ConfigError> {
        let namenode = self
            .namenode
            .as_deref()
            .ok_or(ConfigError::MissingNamenode)?;
        Ok(ConnectionOptions {
            addr: normalize_addr(namenode),
            user: self.user.clone().unwrap_or_default(),
            auth: self.auth,
            connect_timeout_ms: self.connect_timeout_ms,
            io_timeout_ms: self.io_timeout_ms,
            rpc_timeout_ms: self.rpc_timeout_ms,
            ..Default::default()
        })
    }
}

/// Strips an `hdfs://` scheme and trailing path, and adds the default port.
pub fn normalize_addr(namenode: &str) -> String {
    let trimmed = namenode.trim();
    let without_scheme = trimmed.strip_prefix("hdfs://").unwrap_or(trimmed);
    let authority = without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme);
    let has_port = match authority.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    };
    if has_port && !authority.ends_with(']') {
        authority.to_string()
    } else {
        format!("{}:{}", authority, DEFAULT_NAMENODE_PORT)
    }
}
