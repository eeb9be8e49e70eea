//! Video inspection and thumbnail extraction.
//!
//! The decoding work itself is delegated to ffmpeg/ffprobe; this crate wraps
//! the two invocations behind the [`VideoToolkit`] trait, computes the target
//! thumbnail geometry, and manages the request-scoped staging directory.

pub mod ffmpeg;
pub mod geometry;
pub mod staging;
pub mod toolkit;

pub use ffmpeg::FfmpegToolkit;
pub use geometry::ThumbnailSize;
pub use staging::Staging;
pub use toolkit::{VideoStreamInfo, VideoToolkit};
