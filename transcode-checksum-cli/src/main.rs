//! Transcode Checksum CLI - per-frame checksums of raw planar video.

use anyhow::Context;
use clap::Parser;
use console::style;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use transcode_checksum::{
    ChecksumAlgorithm, ChecksumSink, CropOverride, FrameGeometry, PixelFormat, RawVideoReader,
    SinkConfig,
};

/// Command-line arguments for the checksum tool.
#[derive(Parser, Debug)]
#[command(name = "transcode-checksum")]
#[command(version)]
#[command(about = "Print a checksum for every frame of a raw I420/YV12 video")]
#[command(long_about = "Reads headerless planar 4:2:0 video and prints one checksum line per frame.\n\n\
    Whole-frame mode prints `FrameChecksum <hex>`; with --plane-checksum each \n\
    line holds the Y digest followed by the two chroma digests in storage order.\n\n\
    EXAMPLES:\n    \
    transcode-checksum -i out.yuv --width 1920 --height 1080\n    \
    transcode-checksum -i out.yuv --width 1920 --height 1080 --format yv12 --plane-checksum\n    \
    transcode-checksum -i out.yuv --width 1920 --height 1088 --crop 1920x1080 --checksum-type md5")]
struct Args {
    /// Input raw video file ("-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Frame width in pixels
    #[arg(long)]
    width: u32,

    /// Frame height in pixels
    #[arg(long)]
    height: u32,

    /// Pixel format (i420, yv12)
    #[arg(short, long, default_value = "i420")]
    format: PixelFormat,

    /// Checksum algorithm (md5, sha1, sha256) [default: sha1]
    #[arg(short = 'c', long)]
    checksum_type: Option<ChecksumAlgorithm>,

    /// Print one checksum per plane instead of one per frame
    #[arg(short, long, overrides_with = "no_plane_checksum")]
    plane_checksum: bool,

    /// Print one checksum per frame, even if the config file enables per-plane
    #[arg(long, overrides_with = "plane_checksum")]
    no_plane_checksum: bool,

    /// Crop every frame to WIDTHxHEIGHT, anchored at the top-left corner
    #[arg(long)]
    crop: Option<CropOverride>,

    /// Luma row stride in bytes when rows are padded (chroma uses half)
    #[arg(long)]
    stride: Option<usize>,

    /// Stop after this many frames
    #[arg(short = 'n', long)]
    max_frames: Option<u64>,

    /// JSON file with sink settings ({"checksum-type": ..., "plane-checksum": ...})
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode (only checksum lines)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    /// Resolve sink settings: config file first, then command-line overrides.
    fn sink_config(&self) -> anyhow::Result<SinkConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => SinkConfig::default(),
        };

        if let Some(algorithm) = self.checksum_type {
            config.algorithm = algorithm;
        }
        if self.plane_checksum {
            config.per_plane = true;
        } else if self.no_plane_checksum {
            config.per_plane = false;
        }

        Ok(config)
    }
}

/// Checksum every frame of `input`, writing one line per frame to `output`.
fn run<R: io::Read, W: io::Write>(args: &Args, input: R, output: W) -> anyhow::Result<u64> {
    let geometry = FrameGeometry::new(args.format.clone(), args.width, args.height);
    let config = args.sink_config()?;
    info!(
        "Checksumming {} with {}{}",
        geometry,
        config.algorithm,
        if config.per_plane { " per plane" } else { "" }
    );

    let mut reader = RawVideoReader::new(input, geometry.clone());
    if let Some(stride) = args.stride {
        if stride < args.width as usize {
            anyhow::bail!("Stride {} is smaller than width {}", stride, args.width);
        }
        reader = reader.with_stride(stride);
    }
    if let Some(crop) = args.crop {
        if crop.width > args.width || crop.height > args.height {
            anyhow::bail!(
                "Crop {}x{} exceeds frame {}x{}",
                crop.width,
                crop.height,
                args.width,
                args.height
            );
        }
        reader = reader.with_crop(crop);
    }
    debug!("Frame size in stream: {} bytes", reader.frame_size());

    let mut sink = ChecksumSink::with_output(config, output);
    sink.set_caps(geometry);

    for buffer in reader {
        if args.max_frames.is_some_and(|max| sink.frames_rendered() >= max) {
            break;
        }
        let buffer = buffer.with_context(|| {
            format!("Failed to read frame {}", sink.frames_rendered())
        })?;
        sink.render(&buffer)
            .with_context(|| format!("Frame {} failed", sink.frames_rendered()))?;
    }
    sink.flush()?;

    Ok(sink.frames_rendered())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !args.quiet {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(if args.verbose {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            })
            .with_target(false)
            .with_writer(io::stderr)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    let start = Instant::now();
    let output = BufWriter::new(io::stdout().lock());
    let result = if args.input.as_os_str() == "-" {
        run(&args, io::stdin().lock(), output)
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("File not found: {}", args.input.display()))?;
        run(&args, BufReader::new(file), output)
    };

    match result {
        Ok(frames) => {
            if !args.quiet {
                eprintln!(
                    "{} {} frames in {:.2}s",
                    style("Done:").green().bold(),
                    frames,
                    start.elapsed().as_secs_f64()
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}
