use thiserror::Error;

/// Main error type for the reframer library
#[derive(Error, Debug)]
pub enum RebuildError {
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Media engine error: {0}")]
    Media(#[from] MediaError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading stream information from the source video
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Unparsable frame rate: {raw:?}")]
    InvalidFrameRate { raw: String },

    #[error("Frame rate has a zero denominator: {raw:?}")]
    ZeroDenominator { raw: String },

    #[error("Unparsable duration: {raw:?}")]
    InvalidDuration { raw: String },

    #[error("Probe returned no output for {path}")]
    EmptyOutput { path: String },
}

/// Errors raised by the external media engine
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to run {tool}: {reason}")]
    SpawnFailed { tool: String, reason: String },

    #[error("{step} failed ({status}): {stderr}")]
    CommandFailed {
        step: String,
        status: String,
        stderr: String,
    },

    #[error("Output of {tool} is not valid UTF-8")]
    InvalidOutput { tool: String },
}

/// Errors in the reconstruction pipeline itself
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No *.{extension} images found in {dir}")]
    NoImages { dir: String, extension: String },

    #[error("Video has no frames to replace ({frame_rate} fps x {duration_secs}s)")]
    NoFrames { frame_rate: u64, duration_secs: u64 },

    #[error("Frame count overflows ({frame_rate} fps x {duration_secs}s)")]
    TooManyFrames { frame_rate: u64, duration_secs: u64 },

    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("No chunk videos available to concatenate")]
    NothingToConcat,
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using RebuildError
pub type Result<T> = std::result::Result<T, RebuildError>;

impl RebuildError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Media(MediaError::SpawnFailed { tool, .. }) => {
                format!(
                    "Could not run '{}'. Please check that FFmpeg is installed and on your PATH.",
                    tool
                )
            }
            Self::Pipeline(PipelineError::NoImages { dir, extension }) => {
                format!(
                    "No replacement frames found in '{}'. Expected numbered images like 0001.{}.",
                    dir, extension
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
