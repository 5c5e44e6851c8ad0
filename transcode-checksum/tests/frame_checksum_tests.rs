//! Frame checksum integration tests.
//!
//! Drives the sink end to end with in-memory frames.

use transcode_checksum::{
    checksum_frame, ChecksumAlgorithm, ChecksumError, ChecksumSink, CropOverride, FrameDigest,
    FrameGeometry, MappedFrame, PixelFormat, PlaneComponent, PlaneLayout,
    RawFrameBuffer, RawVideoReader, SinkConfig, VideoBuffer,
};

const SHA1_24_ZEROS: &str = "ef46db3751d8e999000fc2a06d4f1c8500ab0a82";

/// Create a frame with distinct content in every plane.
fn create_pattern_frame(width: u32, height: u32, align: usize) -> RawFrameBuffer {
    let mut frame = RawFrameBuffer::new(width, height, align);
    for plane in 0..frame.num_planes() {
        let stride = frame.stride(plane);
        let data = frame.plane_mut(plane).unwrap();
        for (i, byte) in data.iter_mut().enumerate() {
            let (x, y) = (i % stride, i / stride);
            *byte = ((x * 7 + y * 13 + plane * 61) % 251) as u8;
        }
    }
    frame
}

/// Create a frame with uniform luma and distinct constant chroma planes.
fn create_chroma_frame(width: u32, height: u32, cb: u8, cr: u8) -> RawFrameBuffer {
    let mut frame = RawFrameBuffer::new(width, height, 0);
    frame.fill_plane(0, 0x40);
    frame.fill_plane(1, cb);
    frame.fill_plane(2, cr);
    frame
}

fn i420(width: u32, height: u32) -> FrameGeometry {
    FrameGeometry::new(PixelFormat::I420, width, height)
}

fn whole_frame(algorithm: ChecksumAlgorithm) -> SinkConfig {
    SinkConfig::new(algorithm, false)
}

fn per_plane(algorithm: ChecksumAlgorithm) -> SinkConfig {
    SinkConfig::new(algorithm, true)
}

/// A buffer whose memory can never be mapped.
struct UnmappableBuffer;

impl VideoBuffer for UnmappableBuffer {
    fn map_read(&self, _geometry: &FrameGeometry) -> transcode_checksum::Result<MappedFrame<'_>> {
        Err(ChecksumError::BufferMap("memory not readable".into()))
    }
}

// === Concrete scenarios ===

/// 4x4 I420 zero frame, SHA-1 over the 24 packed bytes.
#[test]
fn test_zero_frame_whole_checksum() {
    let frame = RawFrameBuffer::new(4, 4, 0);
    let digest = checksum_frame(&i420(4, 4), &frame, SinkConfig::default()).unwrap();
    assert_eq!(digest, FrameDigest::Frame(SHA1_24_ZEROS.to_string()));
}

/// Same frame in per-plane mode: 16 zero bytes, then 4 and 4.
#[test]
fn test_zero_frame_plane_checksums() {
    let mut sink = ChecksumSink::with_output(per_plane(ChecksumAlgorithm::Sha1), Vec::new());
    sink.set_caps(i420(4, 4));
    sink.render(&RawFrameBuffer::new(4, 4, 0)).unwrap();

    let luma = ChecksumAlgorithm::Sha1.hex_digest(&[0u8; 16]);
    let chroma = ChecksumAlgorithm::Sha1.hex_digest(&[0u8; 4]);
    let line = String::from_utf8(sink.into_output()).unwrap();
    assert_eq!(line, format!("{}  {}  {}  \n", luma, chroma, chroma));
    assert_eq!(line.lines().count(), 1);
}

// === Properties ===

/// Repeated calls over the same input produce identical output.
#[test]
fn test_determinism() {
    let frame = create_pattern_frame(16, 8, 32);
    for algorithm in ChecksumAlgorithm::ALL {
        for config in [whole_frame(algorithm), per_plane(algorithm)] {
            let first = checksum_frame(&i420(16, 8), &frame, config).unwrap();
            let second = checksum_frame(&i420(16, 8), &frame, config).unwrap();
            assert_eq!(first, second);
        }
    }
}

/// Row padding does not influence the checksum.
#[test]
fn test_stride_independence() {
    let packed = create_pattern_frame(10, 6, 0);
    let mut padded = RawFrameBuffer::new(10, 6, 64);

    for plane in 0..3 {
        let width = packed.stride(plane);
        let stride = padded.stride(plane);
        let src = packed.plane(plane).unwrap().to_vec();
        let dst = padded.plane_mut(plane).unwrap();
        dst.fill(0xEE);
        for (row, chunk) in src.chunks(width).enumerate() {
            dst[row * stride..row * stride + width].copy_from_slice(chunk);
        }
    }

    for config in [whole_frame(ChecksumAlgorithm::Sha256), per_plane(ChecksumAlgorithm::Md5)] {
        assert_eq!(
            checksum_frame(&i420(10, 6), &packed, config).unwrap(),
            checksum_frame(&i420(10, 6), &padded, config).unwrap()
        );
    }
}

/// A crop override hashes a smaller, origin-anchored region.
#[test]
fn test_crop_changes_digest() {
    let geometry = i420(16, 16);
    let frame = create_pattern_frame(16, 16, 0);
    let cropped = frame.clone().with_crop(CropOverride::new(8, 6));
    let config = whole_frame(ChecksumAlgorithm::Sha1);

    let full = checksum_frame(&geometry, &frame, config).unwrap();
    let crop = checksum_frame(&geometry, &cropped, config).unwrap();
    assert_ne!(full, crop);

    assert_eq!(PlaneLayout::new(16, 16).unwrap().total_size(), 384);
    assert_eq!(PlaneLayout::new(8, 6).unwrap().total_size(), 8 * 6 + 2 * 4 * 3);

    // The crop region equals a standalone 8x6 frame cut from the origin.
    let mut manual = RawFrameBuffer::new(8, 6, 0);
    for plane in 0..3 {
        let (w, src_stride) = (manual.stride(plane), frame.stride(plane));
        let src = frame.plane(plane).unwrap().to_vec();
        for (row, dst_row) in manual.plane_mut(plane).unwrap().chunks_mut(w).enumerate() {
            dst_row.copy_from_slice(&src[row * src_stride..row * src_stride + w]);
        }
    }
    assert_eq!(crop, checksum_frame(&i420(8, 6), &manual, config).unwrap());
}

/// Digest length depends only on the algorithm, in both modes.
#[test]
fn test_digest_lengths() {
    let frame = create_pattern_frame(8, 8, 16);
    for (algorithm, len) in [
        (ChecksumAlgorithm::Md5, 32),
        (ChecksumAlgorithm::Sha1, 40),
        (ChecksumAlgorithm::Sha256, 64),
    ] {
        for config in [whole_frame(algorithm), per_plane(algorithm)] {
            let digest = checksum_frame(&i420(8, 8), &frame, config).unwrap();
            for checksum in digest.checksums() {
                assert_eq!(checksum.len(), len);
            }
        }
    }
}

/// Physically swapped chroma planes swap the per-plane sequence while the
/// Cb and Cr digests stay attached to their components.
#[test]
fn test_plane_order_distinction() {
    let config = per_plane(ChecksumAlgorithm::Sha1);
    let yuv = create_chroma_frame(8, 4, 0x10, 0xF0);
    let mut yvu = yuv.clone();
    yvu.swap_planes(1, 2);

    let FrameDigest::Planes(yuv_planes) =
        checksum_frame(&i420(8, 4), &yuv, config).unwrap()
    else {
        panic!("expected per-plane digest");
    };
    let FrameDigest::Planes(yvu_planes) =
        checksum_frame(&FrameGeometry::new(PixelFormat::Yv12, 8, 4), &yvu, config).unwrap()
    else {
        panic!("expected per-plane digest");
    };

    assert_eq!(yuv_planes[0].checksum, yvu_planes[0].checksum);
    assert_eq!(yuv_planes[1].checksum, yvu_planes[2].checksum);
    assert_eq!(yuv_planes[2].checksum, yvu_planes[1].checksum);
    assert_ne!(yuv_planes[1].checksum, yvu_planes[1].checksum);

    assert_eq!(yuv_planes[1].component, PlaneComponent::Cb);
    assert_eq!(yvu_planes[2].component, PlaneComponent::Cb);
    assert_eq!(yvu_planes[1].component, PlaneComponent::Cr);
}

/// The format only relabels planes; the packed bytes follow storage order.
#[test]
fn test_format_does_not_reorder_storage() {
    let frame = create_chroma_frame(8, 4, 0x10, 0xF0);
    let yv12 = FrameGeometry::new(PixelFormat::Yv12, 8, 4);

    for config in [whole_frame(ChecksumAlgorithm::Sha256), per_plane(ChecksumAlgorithm::Sha256)] {
        let a = checksum_frame(&i420(8, 4), &frame, config).unwrap();
        let b = checksum_frame(&yv12, &frame, config).unwrap();
        assert_eq!(a.checksums(), b.checksums());
    }
}

// === Failures ===

/// Unsupported formats fail before anything is written.
#[test]
fn test_unsupported_format() {
    for name in ["nv12", "yuy2", "rgba"] {
        let mut sink = ChecksumSink::with_output(SinkConfig::default(), Vec::new());
        sink.set_caps(FrameGeometry::new(name.parse().unwrap(), 4, 4));

        let err = sink.render(&RawFrameBuffer::new(4, 4, 0)).unwrap_err();
        assert!(matches!(err, ChecksumError::UnsupportedFormat { ref format } if format == name));
        assert!(sink.into_output().is_empty());
    }
}

/// Unsupported formats are rejected even when the buffer cannot be mapped.
#[test]
fn test_format_checked_before_mapping() {
    let geometry = FrameGeometry::new(PixelFormat::Other("nv12".into()), 4, 4);
    let err = checksum_frame(&geometry, &UnmappableBuffer, SinkConfig::default()).unwrap_err();
    assert!(matches!(err, ChecksumError::UnsupportedFormat { .. }));
}

/// A mapping failure fails the frame and the sink keeps working.
#[test]
fn test_map_failure_is_per_frame() {
    let mut sink = ChecksumSink::with_output(SinkConfig::default(), Vec::new());
    sink.set_caps(i420(4, 4));

    let err = sink.render(&UnmappableBuffer).unwrap_err();
    assert!(matches!(err, ChecksumError::BufferMap(_)));

    sink.render(&RawFrameBuffer::new(4, 4, 0)).unwrap();
    assert_eq!(sink.frames_rendered(), 1);
    let out = String::from_utf8(sink.into_output()).unwrap();
    assert_eq!(out, format!("FrameChecksum {}\n", SHA1_24_ZEROS));
}

/// A stride narrower than the visible width is a malformed buffer.
#[test]
fn test_stride_smaller_than_width() {
    let frame = RawFrameBuffer::from_planes(vec![
        (vec![0u8; 16], 3),
        (vec![0u8; 4], 2),
        (vec![0u8; 4], 2),
    ]);
    let err = checksum_frame(&i420(4, 4), &frame, SinkConfig::default()).unwrap_err();
    assert!(matches!(err, ChecksumError::StrideTooSmall { plane: 0, .. }));
}

/// A crop larger than the buffer runs past the plane memory.
#[test]
fn test_crop_beyond_buffer() {
    let frame = RawFrameBuffer::new(4, 4, 0).with_crop(CropOverride::new(8, 8));
    let err = checksum_frame(&i420(4, 4), &frame, SinkConfig::default()).unwrap_err();
    assert!(matches!(err, ChecksumError::StrideTooSmall { .. }));
}

/// Dimensions whose packed size exceeds the address space fail cleanly,
/// before the buffer is mapped.
#[test]
fn test_oversized_frame_fails_allocation() {
    let geometry = i420(u32::MAX, u32::MAX);
    for config in [whole_frame(ChecksumAlgorithm::Sha1), per_plane(ChecksumAlgorithm::Md5)] {
        let err = checksum_frame(&geometry, &UnmappableBuffer, config).unwrap_err();
        assert!(matches!(err, ChecksumError::Allocation { .. }));
    }

    let cropped = RawFrameBuffer::new(4, 4, 0).with_crop(CropOverride::new(u32::MAX, u32::MAX));
    let err = checksum_frame(&i420(4, 4), &cropped, SinkConfig::default()).unwrap_err();
    assert!(matches!(err, ChecksumError::Allocation { .. }));
}

/// Missing planes fail the frame.
#[test]
fn test_missing_plane() {
    let frame = RawFrameBuffer::from_planes(vec![(vec![0u8; 16], 4)]);
    let err = checksum_frame(&i420(4, 4), &frame, SinkConfig::default()).unwrap_err();
    assert!(matches!(err, ChecksumError::MissingPlane { plane: 1 }));
}

// === Reader ===

/// Frames read from a raw stream checksum like the in-memory originals.
#[test]
fn test_reader_feeds_sink() {
    let frame = create_pattern_frame(6, 4, 0);
    let mut stream = Vec::new();
    for _ in 0..3 {
        for plane in 0..3 {
            stream.extend_from_slice(frame.plane(plane).unwrap());
        }
    }

    let expected = checksum_frame(&i420(6, 4), &frame, SinkConfig::default()).unwrap();
    let reader = RawVideoReader::new(std::io::Cursor::new(stream), i420(6, 4));

    let mut sink = ChecksumSink::with_output(SinkConfig::default(), Vec::new());
    sink.set_caps(reader.geometry().clone());
    for buffer in reader {
        assert_eq!(sink.render(&buffer.unwrap()).unwrap(), expected);
    }

    let out = String::from_utf8(sink.into_output()).unwrap();
    assert_eq!(out.lines().count(), 3);
    assert!(out.lines().all(|line| line == expected.to_string()));
}
