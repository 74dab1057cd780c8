//! Errors raised while loading a scenario.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use epicell_core::ConfigError;
use epicell_engine::NetworkError;
use epicell_space::TopologyError;

/// Errors that can occur when loading a scenario or building its network.
#[derive(Debug)]
pub enum LoadError {
    /// The scenario file could not be read.
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The document is not valid JSON or does not match the schema.
    Json(serde_json::Error),
    /// A top-level setting has an unusable value.
    Setting {
        /// The setting's key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A cell block is missing a field or holds a malformed value.
    Config(ConfigError),
    /// The topology described by the document is malformed.
    Topology(TopologyError),
    /// The engine rejected the assembled configuration.
    Network(NetworkError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read scenario '{}': {source}", path.display())
            }
            Self::Json(e) => write!(f, "failed to parse scenario JSON: {e}"),
            Self::Setting { key, reason } => write!(f, "setting '{key}': {reason}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Topology(e) => write!(f, "topology: {e}"),
            Self::Network(e) => write!(f, "{e}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Topology(e) => Some(e),
            Self::Network(e) => Some(e),
            Self::Setting { .. } => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TopologyError> for LoadError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}

impl From<NetworkError> for LoadError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl LoadError {
    /// The underlying cell configuration error, wherever it was raised.
    pub fn config_error(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(e) | Self::Network(NetworkError::Config(e)) => Some(e),
            _ => None,
        }
    }
}
