//! # reframer
//!
//! Rebuild a video from individually edited still frames while keeping the
//! source video's audio track, frame rate and duration.
//!
//! Frames are rendered in fixed-size chunks. Each chunk video on disk is a
//! checkpoint, so an interrupted run picks up where it stopped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reframer::{config::Config, media::FfmpegEngine, pipeline::Rebuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let engine = FfmpegEngine::new(config.media.clone());
//!
//! // Images 0001.jpg, 0002.jpg, ... live in the current directory
//! let rebuilder = Rebuilder::new(config, engine, ".");
//! let report = rebuilder.run("original.mp4").await?;
//!
//! println!("Wrote {:?} from {} chunks", report.output, report.chunks);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`media`] - External media engine interface and the ffmpeg implementation
//! - [`frames`] - Replacement image discovery and naming
//! - [`pipeline`] - Chunk planning, resume, rendering, concatenation and cleanup
//! - [`config`] - Configuration management

pub mod config;
pub mod error;
pub mod frames;
pub mod media;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{RebuildError, Result},
    media::{FfmpegEngine, MediaEngine, VideoInfo},
    pipeline::{RebuildReport, Rebuilder},
};
