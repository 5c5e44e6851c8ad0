//! Plane geometry for 4:2:0 frames.

use crate::error::{ChecksumError, Result};
use crate::format::NUM_PLANES;
use std::ops::Range;

/// Logical dimensions of a plane.
///
/// Plane 0 is full resolution; every other plane is half width and half
/// height, rounded down.
pub fn plane_dimensions(plane: usize, width: u32, height: u32) -> (u32, u32) {
    if plane == 0 {
        (width, height)
    } else {
        (width / 2, height / 2)
    }
}

/// Placement of each plane inside the packed frame buffer.
///
/// Planes are stored back to back in plane-index order, without padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneLayout {
    width: u32,
    height: u32,
    ranges: [Range<usize>; NUM_PLANES],
}

impl PlaneLayout {
    /// Compute the packed layout for a frame of the given size.
    ///
    /// Fails with [`ChecksumError::Allocation`] when the packed size does not
    /// fit in `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut ranges: [Range<usize>; NUM_PLANES] = Default::default();
        let mut offset = 0usize;

        for (plane, range) in ranges.iter_mut().enumerate() {
            let (w, h) = plane_dimensions(plane, width, height);
            let len = (w as usize)
                .checked_mul(h as usize)
                .ok_or(ChecksumError::Allocation { size: usize::MAX })?;
            let end = offset
                .checked_add(len)
                .ok_or(ChecksumError::Allocation { size: usize::MAX })?;
            *range = offset..end;
            offset = end;
        }

        Ok(Self {
            width,
            height,
            ranges,
        })
    }

    /// Frame width the layout was computed for.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height the layout was computed for.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Logical dimensions of a plane.
    pub fn dimensions(&self, plane: usize) -> (u32, u32) {
        plane_dimensions(plane, self.width, self.height)
    }

    /// Byte range of a plane inside the packed buffer.
    pub fn range(&self, plane: usize) -> Range<usize> {
        self.ranges[plane].clone()
    }

    /// Total packed size: `w*h + 2 * (w/2) * (h/2)`.
    pub fn total_size(&self) -> usize {
        self.ranges[NUM_PLANES - 1].end
    }
}
