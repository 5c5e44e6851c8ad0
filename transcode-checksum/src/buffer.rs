//! Mappable video buffers.
//!
//! The sink reads frames through the [`VideoBuffer`] trait: a buffer is
//! mapped for reading once per frame and yields one `(data, stride)` pair per
//! plane. [`RawFrameBuffer`] is an owned in-memory implementation.

use crate::error::{ChecksumError, Result};
use crate::format::{CropOverride, FrameGeometry, NUM_PLANES};
use crate::geometry::plane_dimensions;

/// One plane of a mapped frame.
#[derive(Debug, Clone, Copy)]
pub struct PlaneDescriptor<'a> {
    /// Plane index in storage order.
    pub index: u8,
    /// Visible bytes per row.
    pub logical_width: u32,
    /// Visible rows.
    pub logical_height: u32,
    /// Distance in bytes between the starts of consecutive rows.
    pub stride: u32,
    /// Plane memory, valid for the duration of the mapping.
    pub data: &'a [u8],
}

/// Read access to the planes of a frame.
#[derive(Debug, Clone)]
pub struct MappedFrame<'a> {
    planes: Vec<MappedPlane<'a>>,
}

#[derive(Debug, Clone, Copy)]
struct MappedPlane<'a> {
    data: &'a [u8],
    stride: usize,
}

impl<'a> MappedFrame<'a> {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self {
            planes: Vec::with_capacity(NUM_PLANES),
        }
    }

    /// Append the next plane.
    pub fn push_plane(&mut self, data: &'a [u8], stride: usize) {
        self.planes.push(MappedPlane { data, stride });
    }

    /// Get the number of mapped planes.
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Get a plane's data.
    pub fn plane(&self, index: usize) -> Option<&'a [u8]> {
        self.planes.get(index).map(|p| p.data)
    }

    /// Get the stride for a plane.
    pub fn stride(&self, index: usize) -> usize {
        self.planes.get(index).map(|p| p.stride).unwrap_or(0)
    }

    /// Describe a plane with the given logical dimensions.
    pub fn descriptor(&self, index: usize, width: u32, height: u32) -> Result<PlaneDescriptor<'a>> {
        let plane = self
            .planes
            .get(index)
            .ok_or(ChecksumError::MissingPlane { plane: index })?;
        let stride = u32::try_from(plane.stride).map_err(|_| ChecksumError::StrideTooSmall {
            plane: index,
            stride: plane.stride,
            width: width as usize,
        })?;

        Ok(PlaneDescriptor {
            index: index as u8,
            logical_width: width,
            logical_height: height,
            stride,
            data: plane.data,
        })
    }
}

impl Default for MappedFrame<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// A frame buffer that can be mapped for reading.
pub trait VideoBuffer {
    /// Map all planes for reading.
    ///
    /// May block until the memory is accessible.
    fn map_read(&self, geometry: &FrameGeometry) -> Result<MappedFrame<'_>>;

    /// Crop override attached to this buffer, if any.
    fn crop(&self) -> Option<CropOverride> {
        None
    }
}

/// An owned frame held in memory.
#[derive(Clone)]
pub struct RawFrameBuffer {
    planes: Vec<PlaneData>,
    crop: Option<CropOverride>,
}

#[derive(Clone)]
struct PlaneData {
    data: Vec<u8>,
    stride: usize,
}

impl RawFrameBuffer {
    /// Create a zeroed frame for the given geometry.
    ///
    /// Each plane's stride is its width rounded up to a multiple of `align`
    /// (an `align` of 0 or 1 gives tightly packed rows).
    pub fn new(width: u32, height: u32, align: usize) -> Self {
        let planes = (0..NUM_PLANES)
            .map(|plane| {
                let (w, h) = plane_dimensions(plane, width, height);
                let stride = align_up(w as usize, align);
                PlaneData {
                    data: vec![0u8; stride * h as usize],
                    stride,
                }
            })
            .collect();

        Self { planes, crop: None }
    }

    /// Build a frame from existing plane memory.
    pub fn from_planes(planes: Vec<(Vec<u8>, usize)>) -> Self {
        Self {
            planes: planes
                .into_iter()
                .map(|(data, stride)| PlaneData { data, stride })
                .collect(),
            crop: None,
        }
    }

    /// Attach a crop override.
    pub fn with_crop(mut self, crop: CropOverride) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Replace or clear the crop override.
    pub fn set_crop(&mut self, crop: Option<CropOverride>) {
        self.crop = crop;
    }

    /// Get the number of planes.
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Get a plane's data.
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        self.planes.get(index).map(|p| p.data.as_slice())
    }

    /// Get a mutable reference to a plane's data.
    pub fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.planes.get_mut(index).map(|p| p.data.as_mut_slice())
    }

    /// Get the stride for a plane.
    pub fn stride(&self, index: usize) -> usize {
        self.planes.get(index).map(|p| p.stride).unwrap_or(0)
    }

    /// Fill one plane with a value.
    pub fn fill_plane(&mut self, index: usize, value: u8) {
        if let Some(plane) = self.planes.get_mut(index) {
            plane.data.fill(value);
        }
    }

    /// Fill all planes with a value.
    pub fn fill(&mut self, value: u8) {
        for plane in &mut self.planes {
            plane.data.fill(value);
        }
    }

    /// Exchange two planes.
    pub fn swap_planes(&mut self, a: usize, b: usize) {
        self.planes.swap(a, b);
    }
}

impl VideoBuffer for RawFrameBuffer {
    fn map_read(&self, _geometry: &FrameGeometry) -> Result<MappedFrame<'_>> {
        let mut mapped = MappedFrame::new();
        for plane in &self.planes {
            mapped.push_plane(&plane.data, plane.stride);
        }
        Ok(mapped)
    }

    fn crop(&self) -> Option<CropOverride> {
        self.crop
    }
}

impl std::fmt::Debug for RawFrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFrameBuffer")
            .field("planes", &self.planes.len())
            .field(
                "strides",
                &self.planes.iter().map(|p| p.stride).collect::<Vec<_>>(),
            )
            .field("crop", &self.crop)
            .finish()
    }
}

fn align_up(value: usize, align: usize) -> usize {
    if align <= 1 {
        value
    } else {
        value.div_ceil(align) * align
    }
}
