//! # Media Engine Module
//!
//! The external media engine (stream probing, encoding, concatenation, muxing)
//! is reached only through the [`MediaEngine`] trait. The pipeline never builds
//! command lines itself, so a native binding can replace [`FfmpegEngine`]
//! without touching the orchestration code.

pub mod ffmpeg;
pub mod probe;

use std::path::Path;

use crate::error::Result;

pub use ffmpeg::FfmpegEngine;
pub use probe::VideoInfo;

/// Operations the reconstruction pipeline needs from a media engine
///
/// Every call blocks (or awaits) until the underlying work is finished; the
/// pipeline issues them strictly one after another.
#[allow(async_fn_in_trait)]
pub trait MediaEngine {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Read frame rate, duration and audio presence of the source video
    async fn probe(&self, video: &Path) -> Result<VideoInfo>;

    /// Stream-copy the audio track of `video` into `audio_out`
    async fn extract_audio(&self, video: &Path, audio_out: &Path) -> Result<()>;

    /// Encode the images listed in a frame manifest into a chunk video
    ///
    /// # Arguments
    ///
    /// * `frame_manifest` - ffconcat file pairing image paths with durations
    /// * `frame_rate` - Output frame rate
    /// * `chunk_out` - Chunk video to write (overwritten if present)
    async fn encode_frames(
        &self,
        frame_manifest: &Path,
        frame_rate: u64,
        chunk_out: &Path,
    ) -> Result<()>;

    /// Concatenate the videos listed in a chunk manifest without re-encoding
    async fn concat(&self, chunk_manifest: &Path, merged_out: &Path) -> Result<()>;

    /// Attach `audio` to `video` without re-encoding either stream
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()>;
}
