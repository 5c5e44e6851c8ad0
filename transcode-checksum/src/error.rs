//! Error types for frame checksumming.

use thiserror::Error;

/// Frame checksum errors.
///
/// Every error is fatal for the frame being rendered: no partial output is
/// emitted. Whether processing continues with the next frame is the caller's
/// decision.
#[derive(Error, Debug)]
pub enum ChecksumError {
    /// The negotiated format is not one of the supported 4:2:0 planar layouts.
    #[error("Unsupported raw video format {format}, only i420 and yv12 are supported")]
    UnsupportedFormat { format: String },

    /// A frame arrived before any stream geometry was negotiated.
    #[error("Stream geometry not negotiated")]
    NotNegotiated,

    /// The source buffer could not be mapped for reading.
    #[error("Failed to map frame: {0}")]
    BufferMap(String),

    /// The scratch buffer could not be allocated.
    #[error("Failed to allocate {size} byte scratch buffer")]
    Allocation { size: usize },

    /// The mapped buffer has fewer planes than the format requires.
    #[error("Plane {plane} missing from mapped frame")]
    MissingPlane { plane: usize },

    /// A plane's stride is narrower than its logical row width.
    #[error("Plane {plane} stride {stride} is smaller than width {width}")]
    StrideTooSmall { plane: usize, stride: usize, width: usize },

    /// A plane's data ends before its last logical row.
    #[error("Plane {plane} holds {actual} bytes, need at least {needed}")]
    PlaneTooShort { plane: usize, needed: usize, actual: usize },

    /// Destination region does not match the plane's packed size.
    #[error("Destination holds {actual} bytes, plane needs {expected}")]
    DestinationSize { expected: usize, actual: usize },

    /// Unknown checksum algorithm name.
    #[error("Invalid checksum type: {0}")]
    InvalidAlgorithm(String),

    /// Unknown pixel format name.
    #[error("Invalid pixel format: {0}")]
    InvalidFormat(String),

    /// Malformed crop specification.
    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    /// The input stream ended in the middle of a frame.
    #[error("Truncated frame: expected {expected} bytes, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for checksum operations.
pub type Result<T> = std::result::Result<T, ChecksumError>;
