use std::path::Path;
use std::process::{Command, Output, Stdio};

use tokio::task;
use tracing::debug;

use crate::config::MediaConfig;
use crate::error::{MediaError, ProbeError, Result};
use crate::media::probe::{self, VideoInfo};
use crate::media::MediaEngine;

/// Media engine backed by the `ffmpeg` and `ffprobe` command line tools
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    config: MediaConfig,
}

impl FfmpegEngine {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Check that both ffmpeg and ffprobe can be executed
    pub fn check_available(&self) -> bool {
        [&self.config.ffmpeg, &self.config.ffprobe].iter().all(|bin| {
            Command::new(bin)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false)
        })
    }

    fn ffprobe(&self, entries: &str, select: Option<&str>, video: &Path) -> Command {
        let mut cmd = Command::new(&self.config.ffprobe);
        cmd.args(["-v", "error"]);
        if let Some(streams) = select {
            cmd.args(["-select_streams", streams]);
        }
        cmd.args([
            "-of", "default=noprint_wrappers=1:nokey=1",
            "-show_entries", entries,
        ]);
        cmd.arg(video);
        cmd
    }

    /// ffmpeg invocation with overwrite and quiet logging already applied
    fn ffmpeg(&self) -> Command {
        let mut cmd = Command::new(&self.config.ffmpeg);
        cmd.args(["-y", "-hide_banner", "-loglevel"]).arg(&self.config.log_level);
        cmd
    }

    async fn run(&self, step: &str, mut cmd: Command) -> Result<Output> {
        debug!("Running command: {:?}", cmd);

        let tool = cmd.get_program().to_string_lossy().into_owned();
        cmd.stdin(Stdio::null());

        let output = task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| MediaError::SpawnFailed {
                tool: tool.clone(),
                reason: format!("worker task failed: {}", e),
            })?
            .map_err(|e| MediaError::SpawnFailed {
                tool: tool.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::CommandFailed {
                step: step.to_string(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        Ok(output)
    }

    async fn run_for_text(&self, step: &str, cmd: Command) -> Result<String> {
        let tool = cmd.get_program().to_string_lossy().into_owned();
        let output = self.run(step, cmd).await?;
        String::from_utf8(output.stdout)
            .map_err(|_| MediaError::InvalidOutput { tool }.into())
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new(MediaConfig::default())
    }
}

impl MediaEngine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, video: &Path) -> Result<VideoInfo> {
        let rate_cmd = self.ffprobe("stream=r_frame_rate", Some("v:0"), video);
        let rate = self.run_for_text("probe frame rate", rate_cmd).await?;
        if rate.trim().is_empty() {
            return Err(ProbeError::EmptyOutput {
                path: video.display().to_string(),
            }
            .into());
        }
        let frame_rate = probe::parse_frame_rate(&rate)?;

        let duration = self
            .run_for_text("probe duration", self.ffprobe("format=duration", None, video))
            .await?;
        let duration_secs = probe::parse_duration(&duration)?;

        let audio = self
            .run_for_text("probe audio", self.ffprobe("stream=codec_type", Some("a"), video))
            .await?;

        Ok(VideoInfo {
            frame_rate,
            duration_secs,
            has_audio: probe::parse_has_audio(&audio),
        })
    }

    async fn extract_audio(&self, video: &Path, audio_out: &Path) -> Result<()> {
        let mut cmd = self.ffmpeg();
        cmd.arg("-i").arg(video);
        cmd.args(["-vn", "-acodec", "copy"]);
        cmd.arg(audio_out);

        self.run("extract audio", cmd).await?;
        Ok(())
    }

    async fn encode_frames(
        &self,
        frame_manifest: &Path,
        frame_rate: u64,
        chunk_out: &Path,
    ) -> Result<()> {
        let mut cmd = self.ffmpeg();
        cmd.args(["-f", "concat", "-safe", "0", "-i"]).arg(frame_manifest);
        cmd.arg("-c:v").arg(&self.config.video_codec);
        cmd.arg("-r").arg(frame_rate.to_string());
        cmd.arg("-pix_fmt").arg(&self.config.pixel_format);
        cmd.arg(chunk_out);

        self.run("encode chunk", cmd).await?;
        Ok(())
    }

    async fn concat(&self, chunk_manifest: &Path, merged_out: &Path) -> Result<()> {
        let mut cmd = self.ffmpeg();
        cmd.args(["-f", "concat", "-safe", "0", "-i"]).arg(chunk_manifest);
        cmd.args(["-c", "copy"]);
        cmd.arg(merged_out);

        self.run("concatenate chunks", cmd).await?;
        Ok(())
    }

    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.ffmpeg();
        cmd.arg("-i").arg(video);
        cmd.arg("-i").arg(audio);
        cmd.args(["-c", "copy"]);
        cmd.arg(output);

        self.run("mux audio", cmd).await?;
        Ok(())
    }
}
