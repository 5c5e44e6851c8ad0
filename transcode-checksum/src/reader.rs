//! Raw planar video reader.
//!
//! Reads consecutive frames from a headerless `.yuv` stream. Each frame is
//! the three planes stored back to back; every row occupies `stride` bytes
//! of which the first `width` are visible.

use crate::buffer::RawFrameBuffer;
use crate::error::{ChecksumError, Result};
use crate::format::{CropOverride, FrameGeometry, NUM_PLANES};
use crate::geometry::plane_dimensions;
use std::io::{ErrorKind, Read};
use tracing::debug;

/// Reader producing one [`RawFrameBuffer`] per frame.
pub struct RawVideoReader<R> {
    inner: R,
    geometry: FrameGeometry,
    strides: [usize; NUM_PLANES],
    crop: Option<CropOverride>,
    frames_read: u64,
}

impl<R: Read> RawVideoReader<R> {
    /// Create a reader for tightly packed frames.
    pub fn new(inner: R, geometry: FrameGeometry) -> Self {
        let strides = std::array::from_fn(|plane| {
            plane_dimensions(plane, geometry.width, geometry.height).0 as usize
        });

        Self {
            inner,
            geometry,
            strides,
            crop: None,
            frames_read: 0,
        }
    }

    /// Use padded rows: `luma_stride` for plane 0, half of it for chroma.
    pub fn with_stride(mut self, luma_stride: usize) -> Self {
        self.strides = [luma_stride, luma_stride / 2, luma_stride / 2];
        self
    }

    /// Attach a crop override to every frame read.
    pub fn with_crop(mut self, crop: CropOverride) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Stream geometry.
    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    /// Bytes occupied by one frame in the stream.
    pub fn frame_size(&self) -> usize {
        (0..NUM_PLANES)
            .map(|plane| self.plane_size(plane))
            .sum()
    }

    /// Number of frames returned so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn plane_size(&self, plane: usize) -> usize {
        let (_, h) = plane_dimensions(plane, self.geometry.width, self.geometry.height);
        self.strides[plane] * h as usize
    }

    /// Read the next frame, or `None` at a clean end of stream.
    pub fn read_frame(&mut self) -> Result<Option<RawFrameBuffer>> {
        let expected = self.frame_size();
        let mut data = vec![0u8; expected];
        let filled = read_full(&mut self.inner, &mut data)?;

        if filled == 0 {
            debug!("End of stream after {} frames", self.frames_read);
            return Ok(None);
        }
        if filled < expected {
            return Err(ChecksumError::TruncatedFrame {
                expected,
                actual: filled,
            });
        }

        let mut planes = Vec::with_capacity(NUM_PLANES);
        let mut rest = data.as_slice();
        for plane in 0..NUM_PLANES {
            let (head, tail) = rest.split_at(self.plane_size(plane));
            planes.push((head.to_vec(), self.strides[plane]));
            rest = tail;
        }

        let mut buffer = RawFrameBuffer::from_planes(planes);
        buffer.set_crop(self.crop);
        self.frames_read += 1;

        Ok(Some(buffer))
    }
}

impl<R: Read> Iterator for RawVideoReader<R> {
    type Item = Result<RawFrameBuffer>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
