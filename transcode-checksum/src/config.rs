//! Sink configuration.

use crate::checksum::ChecksumAlgorithm;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Checksum sink settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SinkConfig {
    /// Checksum algorithm to use.
    #[serde(rename = "checksum-type")]
    pub algorithm: ChecksumAlgorithm,
    /// Emit one checksum per plane instead of one per frame.
    #[serde(rename = "plane-checksum")]
    pub per_plane: bool,
}

impl SinkConfig {
    /// Create a new configuration.
    pub fn new(algorithm: ChecksumAlgorithm, per_plane: bool) -> Self {
        Self {
            algorithm,
            per_plane,
        }
    }

    /// Set the checksum algorithm.
    pub fn with_algorithm(mut self, algorithm: ChecksumAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Enable or disable per-plane checksums.
    pub fn with_per_plane(mut self, per_plane: bool) -> Self {
        self.per_plane = per_plane;
        self
    }
}

/// Configuration handle shared between a sink and its controller.
///
/// Settings may change at any time; a frame already being rendered keeps the
/// snapshot taken when it started.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<SinkConfig>>,
}

impl SharedConfig {
    /// Create a handle holding `config`.
    pub fn new(config: SinkConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> SinkConfig {
        *self.inner.read()
    }

    /// Replace all settings.
    pub fn set(&self, config: SinkConfig) {
        *self.inner.write() = config;
    }

    /// Change the checksum algorithm.
    pub fn set_algorithm(&self, algorithm: ChecksumAlgorithm) {
        self.inner.write().algorithm = algorithm;
    }

    /// Toggle per-plane checksums.
    pub fn set_per_plane(&self, per_plane: bool) {
        self.inner.write().per_plane = per_plane;
    }
}

impl From<SinkConfig> for SharedConfig {
    fn from(config: SinkConfig) -> Self {
        Self::new(config)
    }
}
