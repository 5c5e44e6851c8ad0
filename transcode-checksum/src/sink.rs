//! Checksum sink.
//!
//! Consumes mapped video frames and emits one checksum line per frame.

use crate::buffer::VideoBuffer;
use crate::checksum::ChecksumAlgorithm;
use crate::config::{SharedConfig, SinkConfig};
use crate::error::{ChecksumError, Result};
use crate::extract::extract_plane;
use crate::format::{PlaneComponent, FrameGeometry, NUM_PLANES};
use crate::geometry::PlaneLayout;
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, error, trace};

/// Buffer metadata the sink asks upstream elements to attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationMeta {
    /// Per-buffer crop region.
    Crop,
    /// Overlay composition.
    OverlayComposition,
    /// Per-plane offsets and strides.
    Video,
}

const ALLOCATION_HINTS: [AllocationMeta; 3] = [
    AllocationMeta::Crop,
    AllocationMeta::OverlayComposition,
    AllocationMeta::Video,
];

/// Checksum of a single plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneDigest {
    /// Plane index in storage order.
    pub plane: usize,
    /// What the plane holds under the negotiated format.
    pub component: PlaneComponent,
    /// Hex digest.
    pub checksum: String,
}

/// Result of checksumming one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameDigest {
    /// One digest per plane, in storage order.
    Planes(Vec<PlaneDigest>),
    /// One digest over the packed frame.
    Frame(String),
}

impl FrameDigest {
    /// All hex digests in emission order.
    pub fn checksums(&self) -> Vec<&str> {
        match self {
            Self::Planes(planes) => planes.iter().map(|p| p.checksum.as_str()).collect(),
            Self::Frame(checksum) => vec![checksum.as_str()],
        }
    }
}

/// Formats the output line without its terminating newline.
///
/// Per-plane digests are each followed by two spaces; a whole-frame digest
/// is prefixed with `FrameChecksum`.
impl fmt::Display for FrameDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planes(planes) => {
                for plane in planes {
                    write!(f, "{}  ", plane.checksum)?;
                }
                Ok(())
            }
            Self::Frame(checksum) => write!(f, "FrameChecksum {}", checksum),
        }
    }
}

/// Checksum one frame.
///
/// Planes are packed back to back into a scratch buffer sized
/// `w*h + 2*(w/2)*(h/2)`, where `w`/`h` come from the buffer's crop override
/// if present and from `geometry` otherwise. The scratch buffer and the
/// mapping are released when this returns, on success or failure.
pub fn checksum_frame<B>(
    geometry: &FrameGeometry,
    buffer: &B,
    config: SinkConfig,
) -> Result<FrameDigest>
where
    B: VideoBuffer + ?Sized,
{
    if !geometry.format.is_supported() {
        return Err(ChecksumError::UnsupportedFormat {
            format: geometry.format.to_string(),
        });
    }

    let (width, height) = geometry.effective_size(buffer.crop());
    let layout = PlaneLayout::new(width, height)?;
    let size = layout.total_size();

    let mapped = buffer.map_read(geometry)?;

    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(size)
        .map_err(|_| ChecksumError::Allocation { size })?;
    scratch.resize(size, 0u8);

    let mut planes = Vec::with_capacity(if config.per_plane { NUM_PLANES } else { 0 });
    for plane in 0..NUM_PLANES {
        let (w, h) = layout.dimensions(plane);
        let range = layout.range(plane);
        let descriptor = mapped.descriptor(plane, w, h)?;
        extract_plane(&descriptor, &mut scratch[range.clone()])?;

        if config.per_plane {
            let component = geometry
                .format
                .component(plane)
                .unwrap_or(PlaneComponent::Y);
            planes.push(PlaneDigest {
                plane,
                component,
                checksum: config.algorithm.hex_digest(&scratch[range]),
            });
        }
    }

    if config.per_plane {
        Ok(FrameDigest::Planes(planes))
    } else {
        Ok(FrameDigest::Frame(config.algorithm.hex_digest(&scratch)))
    }
}

/// A sink that checksums every frame it receives.
pub struct ChecksumSink<W: Write = io::Stdout> {
    config: SharedConfig,
    geometry: Option<FrameGeometry>,
    output: W,
    frames_rendered: u64,
}

impl ChecksumSink<io::Stdout> {
    /// Create a sink writing to standard output.
    pub fn new(config: impl Into<SharedConfig>) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl<W: Write> ChecksumSink<W> {
    /// Create a sink writing checksum lines to `output`.
    pub fn with_output(config: impl Into<SharedConfig>, output: W) -> Self {
        Self {
            config: config.into(),
            geometry: None,
            output,
            frames_rendered: 0,
        }
    }

    /// Configuration handle; clones may be used to change settings between frames.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Negotiated stream geometry.
    pub fn geometry(&self) -> Option<&FrameGeometry> {
        self.geometry.as_ref()
    }

    /// Accept a new stream geometry.
    ///
    /// Any format is accepted here; unsupported formats are rejected per frame.
    pub fn set_caps(&mut self, geometry: FrameGeometry) {
        debug!("Negotiated {}", geometry);
        self.geometry = Some(geometry);
    }

    /// Metadata upstream should attach to buffers when it can.
    pub fn allocation_hints(&self) -> &'static [AllocationMeta] {
        &ALLOCATION_HINTS
    }

    /// Checksum a frame without emitting anything.
    pub fn process<B: VideoBuffer + ?Sized>(&self, buffer: &B) -> Result<FrameDigest> {
        let geometry = self.geometry.as_ref().ok_or(ChecksumError::NotNegotiated)?;
        let config = self.config.snapshot();
        checksum_frame(geometry, buffer, config)
    }

    /// Checksum a frame and write its output line.
    pub fn render<B: VideoBuffer + ?Sized>(&mut self, buffer: &B) -> Result<FrameDigest> {
        let digest = match self.process(buffer) {
            Ok(digest) => digest,
            Err(e) => {
                error!("Frame {} rejected: {}", self.frames_rendered, e);
                return Err(e);
            }
        };

        writeln!(self.output, "{}", digest)?;
        self.frames_rendered += 1;
        trace!("Frame {}: {}", self.frames_rendered, digest);

        Ok(digest)
    }

    /// Flush the output.
    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    /// Number of frames successfully rendered.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Algorithm that the next frame will use.
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.config.snapshot().algorithm
    }

    /// Get the output writer.
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Consume the sink and return its output writer.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> fmt::Debug for ChecksumSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumSink")
            .field("config", &self.config.snapshot())
            .field("geometry", &self.geometry)
            .field("frames_rendered", &self.frames_rendered)
            .finish()
    }
}
