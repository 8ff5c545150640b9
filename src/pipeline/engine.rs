use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{PipelineError, Result},
    frames::FrameSet,
    media::{MediaEngine, VideoInfo},
    pipeline::{
        chunk::{partition, ChunkRange},
        cleanup::remove_files,
        manifest::{write_chunk_manifest, write_frame_manifest},
        progress::{format_minutes, projected_finish, RenderProgress},
        resume::ResumeState,
    },
};

/// Rebuilds a video from replacement frames, one resumable chunk at a time
///
/// The pipeline is strictly sequential:
/// 1. Probe - frame rate, duration and audio presence of the source
/// 2. Frame scan - count the replacement images
/// 3. Partition - split the frame range into fixed-size chunks
/// 4. Audio extraction - stream copy of the source audio
/// 5. Resume scan - find chunk videos left by an earlier run
/// 6. Render - encode every pending chunk
/// 7. Concatenate - join the chunk videos without re-encoding
/// 8. Mux - put the original audio back
/// 9. Cleanup - remove the intermediates
pub struct Rebuilder<E: MediaEngine> {
    config: Config,
    engine: E,
    work_dir: PathBuf,
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RebuildReport {
    pub video: VideoInfo,
    pub images: u64,
    pub chunks: usize,
    pub skipped: usize,
    pub rendered: usize,
    pub output: PathBuf,
}

impl<E: MediaEngine> Rebuilder<E> {
    /// Create a rebuilder working in `work_dir`, where the images live and all
    /// intermediate and output files are written
    pub fn new<P: Into<PathBuf>>(config: Config, engine: E, work_dir: P) -> Self {
        Self {
            config,
            engine,
            work_dir: work_dir.into(),
        }
    }

    fn work_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    /// Run the whole pipeline for `video`
    pub async fn run<P: AsRef<Path>>(&self, video: P) -> Result<RebuildReport> {
        let video = video.as_ref();

        info!("Starting reconstruction with {} engine", self.engine.name());
        info!("   Video: {:?}", video);
        info!("   Frames: {:?}", self.work_dir);

        let info = self.probe(video).await?;
        let frames = FrameSet::scan(&self.work_dir, &self.config.frames)?;
        info!("Found {} replacement frames", frames.count());
        let chunks = self.plan_chunks(&info)?;

        if info.has_audio {
            info!("Extracting audio from video...");
            self.engine
                .extract_audio(video, &self.work_path(&self.config.output.audio_file))
                .await?;
        } else {
            warn!("Source video has no audio stream; output will be silent");
        }

        let resume = ResumeState::scan(&self.work_dir, &chunks);
        if resume.skipped() > 0 {
            info!(
                "Resuming: {} of {} chunks already rendered",
                resume.skipped(),
                chunks.len()
            );
        }

        let (concat_list, rendered) = self.render_chunks(&chunks, &resume, &frames, &info).await?;

        let merged = self.concatenate(&concat_list).await?;
        let output = self.attach_audio(&merged, &info).await?;

        if self.config.output.keep_intermediates {
            info!("Keeping intermediate files");
        } else {
            self.cleanup(&chunks)?;
        }

        info!("Reconstruction complete! Output saved to: {:?}", output);

        Ok(RebuildReport {
            video: info,
            images: frames.count(),
            chunks: chunks.len(),
            skipped: resume.skipped(),
            rendered,
            output,
        })
    }

    /// Probe the source video
    pub async fn probe(&self, video: &Path) -> Result<VideoInfo> {
        info!("Extracting FPS and duration from video...");
        let info = self.engine.probe(video).await?;
        info!(
            "   FPS: {}, duration: {}s, audio: {}",
            info.frame_rate,
            info.duration_secs,
            if info.has_audio { "yes" } else { "no" }
        );
        Ok(info)
    }

    /// Chunk plan for a probed video
    pub fn plan_chunks(&self, info: &VideoInfo) -> Result<Vec<ChunkRange>> {
        let chunk_size = self.config.chunking.chunk_size;
        let chunks = partition(info.frame_rate, info.duration_secs, chunk_size)?;

        if chunks.is_empty() {
            return Err(PipelineError::NoFrames {
                frame_rate: info.frame_rate,
                duration_secs: info.duration_secs,
            }
            .into());
        }

        debug!(
            "{} frames in {} chunks of up to {}",
            chunks.iter().map(ChunkRange::len).sum::<u64>(),
            chunks.len(),
            chunk_size
        );
        Ok(chunks)
    }

    /// Chunk videos already present in the working directory
    pub fn resume_state(&self, chunks: &[ChunkRange]) -> ResumeState {
        ResumeState::scan(&self.work_dir, chunks)
    }

    /// Render every chunk from the resume point on
    ///
    /// Returns the chunk file names to concatenate, in order, and how many
    /// chunks this run encoded.
    async fn render_chunks(
        &self,
        chunks: &[ChunkRange],
        resume: &ResumeState,
        frames: &FrameSet,
        info: &VideoInfo,
    ) -> Result<(Vec<String>, usize)> {
        let mut concat_list: Vec<String> = resume
            .completed
            .iter()
            .map(|&i| chunks[i].file_name())
            .collect();

        let frame_manifest = self.work_path(&self.config.output.frame_manifest);
        let mut progress = RenderProgress::start(chunks.len());

        for (i, chunk) in chunks.iter().enumerate().skip(resume.resume_index) {
            info!("Processing chunk {} out of {}...", i + 1, chunks.len());

            if chunk.frames_available(frames.count()).is_empty() {
                warn!("Chunk {} (frames {}) has no replacement images; skipping", i + 1, chunk);
                continue;
            }

            let written =
                write_frame_manifest(&frame_manifest, chunk, frames, info.frame_duration())?;
            if written < chunk.len() {
                warn!("Chunk {} only has {} of {} frames", i + 1, written, chunk.len());
            }

            // A chunk only gets its final name once the encoder has exited cleanly,
            // so a killed encode never looks like a finished checkpoint.
            let chunk_file = chunk.file_name();
            let partial = self.work_path(&chunk.partial_file_name());
            self.engine
                .encode_frames(&frame_manifest, info.frame_rate, &partial)
                .await?;
            std::fs::rename(&partial, self.work_path(&chunk_file))?;
            concat_list.push(chunk_file);

            let remaining = progress.chunk_done(i);
            info!(
                "Finished processing chunk {}. Estimated time remaining: {} minutes (around {})",
                i + 1,
                format_minutes(remaining),
                projected_finish(remaining).format("%H:%M:%S")
            );
        }

        Ok((concat_list, progress.rendered()))
    }

    /// Join the chunk videos into the silent merged video
    async fn concatenate(&self, concat_list: &[String]) -> Result<PathBuf> {
        if concat_list.is_empty() {
            return Err(PipelineError::NothingToConcat.into());
        }

        info!("Concatenating {} chunks...", concat_list.len());
        let chunk_manifest = self.work_path(&self.config.output.chunk_manifest);
        write_chunk_manifest(&chunk_manifest, concat_list)?;

        let merged = self.work_path(&self.config.output.merged_file);
        self.engine.concat(&chunk_manifest, &merged).await?;
        Ok(merged)
    }

    /// Produce the final output from the merged video
    async fn attach_audio(&self, merged: &Path, info: &VideoInfo) -> Result<PathBuf> {
        let output = self.work_path(&self.config.output.output_file);

        if info.has_audio {
            info!("Adding audio to the video...");
            let audio = self.work_path(&self.config.output.audio_file);
            self.engine.mux(merged, &audio, &output).await?;
        } else {
            std::fs::rename(merged, &output)?;
        }

        Ok(output)
    }

    /// Delete chunk videos (finished or partial), extracted audio, the merged
    /// video and the manifests
    fn cleanup(&self, chunks: &[ChunkRange]) -> Result<()> {
        info!("Cleaning up intermediary files...");

        let output = &self.config.output;
        let intermediates = chunks
            .iter()
            .flat_map(|chunk| {
                [
                    self.work_path(&chunk.file_name()),
                    self.work_path(&chunk.partial_file_name()),
                ]
            })
            .chain([
                self.work_path(&output.audio_file),
                self.work_path(&output.merged_file),
                self.work_path(&output.frame_manifest),
                self.work_path(&output.chunk_manifest),
            ]);

        let removed = remove_files(intermediates)?;
        info!("Cleanup done! Removed {} files", removed.len());
        Ok(())
    }
}
