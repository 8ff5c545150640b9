use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for reframer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// External media engine settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Replacement frame naming
    #[serde(default)]
    pub frames: FramesConfig,

    /// Chunked rendering settings
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Intermediate and final file names
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.media.validate()?;
        self.frames.validate()?;
        self.chunking.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

fn require_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: format!("{:?}", value),
        }
        .into());
    }
    Ok(())
}

/// Media engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// ffmpeg binary name or path
    pub ffmpeg: String,

    /// ffprobe binary name or path
    pub ffprobe: String,

    /// Encoder used for chunk videos
    pub video_codec: String,

    /// Pixel format of chunk videos
    pub pixel_format: String,

    /// `-loglevel` passed to ffmpeg
    pub log_level: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            log_level: "error".to_string(),
        }
    }
}

impl MediaConfig {
    fn validate(&self) -> Result<()> {
        require_non_empty("media.ffmpeg", &self.ffmpeg)?;
        require_non_empty("media.ffprobe", &self.ffprobe)?;
        require_non_empty("media.video_codec", &self.video_codec)?;
        require_non_empty("media.pixel_format", &self.pixel_format)?;
        Ok(())
    }
}

/// Replacement frame naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramesConfig {
    /// Image file extension, without the dot
    pub extension: String,

    /// Zero-padded width of the frame number
    pub digits: usize,
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            extension: "jpg".to_string(),
            digits: 4,
        }
    }
}

impl FramesConfig {
    fn validate(&self) -> Result<()> {
        require_non_empty("frames.extension", &self.extension)?;

        if self.extension.starts_with('.') {
            return Err(ConfigError::InvalidValue {
                key: "frames.extension".to_string(),
                value: self.extension.clone(),
            }
            .into());
        }

        if !(1..=9).contains(&self.digits) {
            return Err(ConfigError::InvalidValue {
                key: "frames.digits".to_string(),
                value: self.digits.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Chunked rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Frames per chunk video
    pub chunk_size: u64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 1000 }
    }
}

impl ChunkingConfig {
    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chunking.chunk_size".to_string(),
                value: self.chunk_size.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// File names written into the working directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extracted source audio
    pub audio_file: String,

    /// Concatenated video without audio
    pub merged_file: String,

    /// Final muxed video
    pub output_file: String,

    /// Per-chunk image manifest
    pub frame_manifest: String,

    /// Chunk video manifest
    pub chunk_manifest: String,

    /// Leave chunk videos and other intermediates on disk
    pub keep_intermediates: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            audio_file: "audio.aac".to_string(),
            merged_file: "output_no_audio.mp4".to_string(),
            output_file: "output.mp4".to_string(),
            frame_manifest: "frames.txt".to_string(),
            chunk_manifest: "videos.txt".to_string(),
            keep_intermediates: false,
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        require_non_empty("output.audio_file", &self.audio_file)?;
        require_non_empty("output.merged_file", &self.merged_file)?;
        require_non_empty("output.output_file", &self.output_file)?;
        require_non_empty("output.frame_manifest", &self.frame_manifest)?;
        require_non_empty("output.chunk_manifest", &self.chunk_manifest)?;

        if self.output_file == self.merged_file {
            return Err(ConfigError::InvalidValue {
                key: "output.output_file".to_string(),
                value: self.output_file.clone(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.chunking.chunk_size = 250;
        original_config.frames.extension = "png".to_string();

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.chunking.chunk_size, 250);
        assert_eq!(loaded_config.frames.extension, "png");
        assert_eq!(loaded_config.output.output_file, "output.mp4");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[chunking]\nchunk_size = 500\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.frames.digits, 4);
        assert_eq!(config.media.video_codec, "libx264");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::from_file(dir.path().join("nope.toml"));
        assert!(matches!(
            result,
            Err(crate::error::RebuildError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = Config::default();
        config.chunking.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let mut config = Config::default();
        config.frames.extension = ".jpg".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_must_differ_from_merged() {
        let mut config = Config::default();
        config.output.output_file = config.output.merged_file.clone();
        assert!(config.validate().is_err());
    }
}
