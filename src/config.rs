use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

/// Ports below this need privileges the servers never ask for.
pub const MIN_PORT: u16 = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Port must be an integer, got {0:?}")]
    InvalidPort(String),
    #[error("Port must be >= {MIN_PORT}, got {0}")]
    PrivilegedPort(i64),
    #[error("invalid bind address {0:?}")]
    InvalidHost(String),
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// How a server drives its connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServeMode {
    /// Accept, answer and close one connection before accepting the next.
    Sequential,
    /// Poll the listener and every open connection for readiness in one loop.
    Multiplexed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub backlog: u32,
    pub mode: ServeMode,
    /// Upper bound on bytes taken from a socket per readiness notification.
    pub read_chunk: usize,
}

impl ServerConfig {
    /// The socket address the listener binds to.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backlog: 5,
            mode: ServeMode::Sequential,
            read_chunk: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory request paths are resolved against.
    pub root: PathBuf,
    /// Document served for an empty path, if any.
    pub index: Option<String>,
    /// Servable file name suffixes, matched case-sensitively.
    pub extensions: Vec<String>,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: None,
            extensions: vec![".html".to_string(), ".htm".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

impl Config {
    /// Parses a YAML document on top of the library defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::default().overlay_yaml(yaml)
    }

    /// Parses a YAML document on top of `self`. Keys missing from the document
    /// keep the values they had in `self`.
    pub fn overlay_yaml(self, yaml: &str) -> Result<Self, ConfigError> {
        let mut merged = serde_yaml::to_value(&self)?;
        let overlay: Value = serde_yaml::from_str(yaml)?;
        // An empty document leaves everything as it was.
        if !overlay.is_null() {
            merge(&mut merged, overlay);
        }
        Ok(serde_yaml::from_value(merged)?)
    }

    /// Starts from `base`, overlaid by the YAML file at `path` when one is given.
    pub fn load(base: Config, path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                base.overlay_yaml(&text)
            }
            None => Ok(base),
        }
    }

    /// Applies a port taken from the command line and validates the result.
    pub fn with_port(mut self, port: &str) -> Result<Self, ConfigError> {
        self.server.port = parse_port(port)?;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port < MIN_PORT {
            return Err(ConfigError::PrivilegedPort(i64::from(self.server.port)));
        }
        if self.server.backlog == 0 {
            return Err(ConfigError::Zero { field: "server.backlog" });
        }
        if self.server.read_chunk == 0 {
            return Err(ConfigError::Zero { field: "server.read_chunk" });
        }
        Ok(())
    }
}

/// Parses a TCP port argument. Values that are integers but out of the u16 range
/// are reported as invalid rather than wrapped.
pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;

    if value < i64::from(MIN_PORT) {
        return Err(ConfigError::PrivilegedPort(value));
    }

    u16::try_from(value).map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
