use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};

use reframer::{
    config::Config,
    media::FfmpegEngine,
    pipeline::Rebuilder,
    RebuildError,
};

#[derive(Parser)]
#[command(
    name = "reframer",
    version,
    about = "Replace the frames of a video with edited images",
    long_about = "Reframer rebuilds a video from a directory of numbered still frames, keeping the original frame rate, duration and audio track. Work is split into chunks so an interrupted run resumes where it stopped."
)]
struct Cli {
    /// Path to the source video
    video: PathBuf,

    /// Directory holding the numbered images; all outputs are written here
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Frames per chunk video
    #[arg(long)]
    chunk_size: Option<u64>,

    /// Image extension (jpg, png)
    #[arg(short, long)]
    extension: Option<String>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leave chunk videos, extracted audio and manifests on disk
    #[arg(long)]
    keep_intermediates: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => {
                info!("Loading configuration from {:?}", config_path);
                Config::from_file(config_path)?
            }
            None => Config::default(),
        };

        if let Some(chunk_size) = self.chunk_size {
            config.chunking.chunk_size = chunk_size;
        }
        if let Some(extension) = &self.extension {
            config.frames.extension = extension.trim_start_matches('.').to_string();
        }
        if self.keep_intermediates {
            config.output.keep_intermediates = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting reframer v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.load_config()?;
    let engine = FfmpegEngine::new(config.media.clone());
    let rebuilder = Rebuilder::new(config, engine, &cli.dir);

    let report = rebuilder
        .run(&cli.video)
        .await
        .map_err(|e: RebuildError| {
            anyhow::anyhow!(e.user_message()).context("reconstruction failed")
        })?;

    info!(
        "Done: {} chunks ({} rendered, {} reused), {} images, output {:?}",
        report.chunks,
        report.rendered,
        report.skipped,
        report.images,
        report.output
    );
    Ok(())
}
