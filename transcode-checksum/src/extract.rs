//! Plane extraction.
//!
//! Copies the visible rows of a stride-padded plane into a tightly packed
//! destination, dropping row padding.

use crate::buffer::PlaneDescriptor;
use crate::error::{ChecksumError, Result};

/// De-stride one plane into `dst`.
///
/// `dst` must be exactly `logical_width * logical_height` bytes. The source
/// must hold `(logical_height - 1) * stride + logical_width` bytes.
pub fn extract_plane(plane: &PlaneDescriptor<'_>, dst: &mut [u8]) -> Result<()> {
    let index = plane.index as usize;
    let width = plane.logical_width as usize;
    let height = plane.logical_height as usize;
    let stride = plane.stride as usize;

    if stride < width {
        return Err(ChecksumError::StrideTooSmall {
            plane: index,
            stride,
            width,
        });
    }

    let expected = width * height;
    if dst.len() != expected {
        return Err(ChecksumError::DestinationSize {
            expected,
            actual: dst.len(),
        });
    }
    if expected == 0 {
        return Ok(());
    }

    let needed = (height - 1) * stride + width;
    if plane.data.len() < needed {
        return Err(ChecksumError::PlaneTooShort {
            plane: index,
            needed,
            actual: plane.data.len(),
        });
    }

    for (dst_row, src_row) in dst
        .chunks_exact_mut(width)
        .zip(plane.data.chunks(stride))
    {
        dst_row.copy_from_slice(&src_row[..width]);
    }

    Ok(())
}
