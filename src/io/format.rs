//! Save configuration

use super::transport::Compression;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for saving models
///
/// ```yaml
/// compression: zstd
/// level: 19
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaveConfig {
    /// Compression to apply; `None` detects it from the destination suffix
    pub compression: Option<Compression>,

    /// Compression level for the chosen codec; `None` uses the codec default
    pub level: Option<i32>,
}

impl SaveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a compression regardless of the destination suffix
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// Compression used for `path` under this config
    pub fn compression_for(&self, path: impl AsRef<Path>) -> Compression {
        self.compression
            .unwrap_or_else(|| Compression::from_path(path))
    }

    /// Check the level against the range of the compression it applies to
    ///
    /// With suffix detection the compression is only known per path, so the
    /// level is checked against `compression`.
    pub fn validate(&self, compression: Compression) -> Result<()> {
        let Some(level) = self.level else {
            return Ok(());
        };
        let range = match compression {
            Compression::None => return Ok(()),
            Compression::Gzip => 0..=9,
            Compression::Zstd => zstd::compression_level_range(),
        };
        if !range.contains(&level) {
            return Err(Error::ConfigError(format!(
                "level {level} is outside {}..={} for {compression:?}",
                range.start(),
                range.end()
            )));
        }
        Ok(())
    }

    /// Parse a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))
    }

    /// Load a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&yaml)
    }
}
