//! # Transcode Checksum
//!
//! Deterministic content checksums of raw planar video frames, used to verify
//! bit-exact output of a processing stage in regression tests.
//!
//! ## Features
//!
//! - **Formats**: I420 and YV12 (planar 4:2:0)
//! - **Algorithms**: MD5, SHA-1 and SHA-256, rendered as lowercase hex
//! - **Modes**: one checksum per frame, or one per plane
//! - **Stride independence**: row padding is dropped before hashing
//! - **Crop**: a per-buffer crop override restricts the hashed region
//!
//! ## Output
//!
//! Each rendered frame produces one line:
//!
//! ```text
//! FrameChecksum ef46db3751d8e999000fc2a06d4f1c8500ab0a82
//! ```
//!
//! or, with per-plane checksums enabled, the luma digest followed by the two
//! chroma digests in storage order, each followed by two spaces.
//!
//! ## Usage
//!
//! ```
//! use transcode_checksum::{
//!     ChecksumSink, FrameGeometry, PixelFormat, RawFrameBuffer, SinkConfig,
//! };
//!
//! let mut sink = ChecksumSink::with_output(SinkConfig::default(), Vec::new());
//! sink.set_caps(FrameGeometry::new(PixelFormat::I420, 4, 4));
//!
//! let frame = RawFrameBuffer::new(4, 4, 32);
//! let digest = sink.render(&frame)?;
//! assert_eq!(
//!     digest.to_string(),
//!     "FrameChecksum ef46db3751d8e999000fc2a06d4f1c8500ab0a82"
//! );
//! # Ok::<(), transcode_checksum::ChecksumError>(())
//! ```
//!
//! ## Errors
//!
//! Every failure is reported for the frame being rendered and nothing is
//! written for it. A buffer that cannot be mapped is an ordinary
//! [`ChecksumError::BufferMap`] error rather than an abort; callers that
//! must stop on malformed input stop on the first error.

pub mod buffer;
pub mod checksum;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod geometry;
pub mod reader;
pub mod sink;

pub use buffer::{MappedFrame, PlaneDescriptor, RawFrameBuffer, VideoBuffer};
pub use checksum::{ChecksumAlgorithm, Checksummer};
pub use config::{SharedConfig, SinkConfig};
pub use error::{ChecksumError, Result};
pub use extract::extract_plane;
pub use format::{CropOverride, FrameGeometry, PixelFormat, PlaneComponent};
pub use geometry::{plane_dimensions, PlaneLayout};
pub use reader::RawVideoReader;
pub use sink::{checksum_frame, AllocationMeta, ChecksumSink, FrameDigest, PlaneDigest};
