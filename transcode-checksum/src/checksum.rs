//! Checksum computation for frame verification
//!
//! Provides MD5, SHA-1 and SHA-256 digests rendered as lowercase hex.

use crate::error::{ChecksumError, Result};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Checksum algorithm type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// MD5, 128-bit digest.
    Md5,
    /// SHA-1, 160-bit digest.
    #[default]
    Sha1,
    /// SHA-256, 256-bit digest.
    Sha256,
}

impl ChecksumAlgorithm {
    /// All supported algorithms.
    pub const ALL: [ChecksumAlgorithm; 3] = [Self::Md5, Self::Sha1, Self::Sha256];

    /// Digest size in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// Length of the hex rendering.
    pub fn hex_len(&self) -> usize {
        self.digest_len() * 2
    }

    /// Short name used in configuration.
    pub fn nick(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Compute the hex digest of `data`.
    ///
    /// Each call starts from a fresh hasher.
    pub fn hex_digest(&self, data: &[u8]) -> String {
        let mut checksummer = Checksummer::new(*self);
        checksummer.update(data);
        checksummer.finalize()
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumAlgorithm::Md5 => write!(f, "MD5"),
            ChecksumAlgorithm::Sha1 => write!(f, "SHA-1"),
            ChecksumAlgorithm::Sha256 => write!(f, "SHA-256"),
        }
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            _ => Err(ChecksumError::InvalidAlgorithm(s.to_string())),
        }
    }
}

/// Checksum calculator for streaming computation
#[derive(Clone)]
pub enum Checksummer {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
}

impl Checksummer {
    /// Create a new checksum calculator
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Md5 => Self::Md5(Md5::new()),
            ChecksumAlgorithm::Sha1 => Self::Sha1(Sha1::new()),
            ChecksumAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
        }
    }

    /// Algorithm in use.
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        match self {
            Self::Md5(_) => ChecksumAlgorithm::Md5,
            Self::Sha1(_) => ChecksumAlgorithm::Sha1,
            Self::Sha256(_) => ChecksumAlgorithm::Sha256,
        }
    }

    /// Update with more data
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(hasher) => hasher.update(data),
            Self::Sha1(hasher) => hasher.update(data),
            Self::Sha256(hasher) => hasher.update(data),
        }
    }

    /// Finalize and get the checksum
    pub fn finalize(self) -> String {
        match self {
            Self::Md5(hasher) => hex::encode(hasher.finalize()),
            Self::Sha1(hasher) => hex::encode(hasher.finalize()),
            Self::Sha256(hasher) => hex::encode(hasher.finalize()),
        }
    }
}

impl fmt::Debug for Checksummer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Checksummer").field(&self.algorithm()).finish()
    }
}
