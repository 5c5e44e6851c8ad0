//! Stream format description.
//!
//! Provides the pixel formats accepted by the checksum sink and the
//! negotiated stream geometry.

use crate::error::{ChecksumError, Result};
use std::fmt;
use std::str::FromStr;

/// Number of planes in every supported format.
pub const NUM_PLANES: usize = 3;

/// Pixel format of a negotiated video stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Planar YUV 4:2:0: Y plane, then Cb, then Cr.
    I420,
    /// Planar YVU 4:2:0: Y plane, then Cr, then Cb.
    Yv12,
    /// Any other negotiated format. Accepted at negotiation, rejected per frame.
    Other(String),
}

impl PixelFormat {
    /// Check if frames in this format can be checksummed.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::I420 | Self::Yv12)
    }

    /// Component stored in a given plane, or `None` for out-of-range planes.
    pub fn component(&self, plane: usize) -> Option<PlaneComponent> {
        match (self, plane) {
            (_, 0) => Some(PlaneComponent::Y),
            (Self::I420, 1) | (Self::Yv12, 2) => Some(PlaneComponent::Cb),
            (Self::I420, 2) | (Self::Yv12, 1) => Some(PlaneComponent::Cr),
            _ => None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I420 => write!(f, "i420"),
            Self::Yv12 => write!(f, "yv12"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for PixelFormat {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i420" | "yuv420p" => Ok(Self::I420),
            "yv12" => Ok(Self::Yv12),
            "" => Err(ChecksumError::InvalidFormat(s.to_string())),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

/// Semantic identity of a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneComponent {
    /// Luma.
    Y,
    /// Blue-difference chroma.
    Cb,
    /// Red-difference chroma.
    Cr,
}

impl fmt::Display for PlaneComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Y => write!(f, "Y"),
            Self::Cb => write!(f, "Cb"),
            Self::Cr => write!(f, "Cr"),
        }
    }
}

/// Negotiated stream geometry, set on every caps change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Pixel format.
    pub format: PixelFormat,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl FrameGeometry {
    /// Create a new geometry.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
        }
    }

    /// Width and height in effect for one frame.
    ///
    /// A crop override replaces the negotiated dimensions. Cropping is
    /// anchored at the origin.
    pub fn effective_size(&self, crop: Option<CropOverride>) -> (u32, u32) {
        match crop {
            Some(crop) => (crop.width, crop.height),
            None => (self.width, self.height),
        }
    }
}

impl fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.format, self.width, self.height)
    }
}

/// Per-buffer crop region, width and height only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropOverride {
    /// Cropped width in pixels.
    pub width: u32,
    /// Cropped height in pixels.
    pub height: u32,
}

impl CropOverride {
    /// Create a new crop override.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for CropOverride {
    type Err = ChecksumError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| ChecksumError::InvalidCrop(s.to_string()))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| ChecksumError::InvalidCrop(s.to_string()))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| ChecksumError::InvalidCrop(s.to_string()))?;
        Ok(Self { width, height })
    }
}
