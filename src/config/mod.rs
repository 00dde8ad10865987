//! Configuration for Hostlens
//!
//! The configuration is loaded from a TOML file and held in a
//! [`ConfigHandle`], which can be reloaded at runtime. Columns never capture
//! configuration values directly; they read them through a
//! [`BasepathProvider`] on every evaluation so that a reload takes effect
//! without rebuilding the schema.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::error::{HostLensError, Result};

/// Default root directory for per-host auxiliary files
pub const DEFAULT_BASEPATH: &str = "/var/lib/check/hostfiles";

/// Default upper bound for a single host file read (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub hostfiles: HostFilesConfig,
}

/// Settings for the host file columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostFilesConfig {
    /// Root directory; each host has a subdirectory named after it
    pub basepath: PathBuf,
    /// Files larger than this are not read
    pub max_file_size: u64,
}

impl Default for HostFilesConfig {
    fn default() -> Self {
        Self {
            basepath: PathBuf::from(DEFAULT_BASEPATH),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HostLensError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| HostLensError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hostfiles.basepath.as_os_str().is_empty() {
            return Err(HostLensError::Config(
                "hostfiles.basepath must not be empty".to_string(),
            ));
        }
        if self.hostfiles.max_file_size == 0 {
            return Err(HostLensError::Config(
                "hostfiles.max_file_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared, reloadable configuration
///
/// Clones share the same underlying configuration; an update through one
/// clone is visible through all of them.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    current: Arc<ArcSwap<Config>>,
    path: Option<PathBuf>,
}

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(config)),
            path: None,
        }
    }

    /// Create a handle backed by a file, which [`ConfigHandle::reload`] re-reads
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::load(&path)?;
        let mut handle = Self::new(config);
        handle.path = Some(path.as_ref().to_path_buf());
        Ok(handle)
    }

    /// Snapshot of the current configuration
    pub fn get(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Replace the configuration after validating it
    pub fn update(&self, config: Config) -> Result<()> {
        config.validate()?;
        tracing::debug!(
            basepath = %config.hostfiles.basepath.display(),
            max_file_size = config.hostfiles.max_file_size,
            "configuration updated"
        );
        self.current.store(Arc::new(config));
        Ok(())
    }

    /// Re-read the backing file. Returns `false` for handles without a file.
    pub fn reload(&self) -> Result<bool> {
        match &self.path {
            Some(path) => {
                let config = Config::load(path)?;
                self.update(config)?;
                tracing::info!(path = %path.display(), "configuration reloaded");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Deferred accessor for the root directory of per-host files
pub trait BasepathProvider: Send + Sync + Debug {
    fn basepath(&self) -> PathBuf;
}

impl BasepathProvider for ConfigHandle {
    fn basepath(&self) -> PathBuf {
        self.current.load().hostfiles.basepath.clone()
    }
}

/// A basepath that never changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBasepath(pub PathBuf);

impl BasepathProvider for FixedBasepath {
    fn basepath(&self) -> PathBuf {
        self.0.clone()
    }
}
