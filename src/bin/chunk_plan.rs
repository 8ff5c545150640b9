// Prints the chunk plan for a video and which chunks are already on disk,
// without rendering anything.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use reframer::{config::Config, media::FfmpegEngine, pipeline::Rebuilder};

#[derive(Parser)]
#[command(name = "chunk-plan", version, about = "Show the chunk plan and resume point for a video")]
struct Cli {
    /// Path to the source video
    video: PathBuf,

    /// Directory holding the numbered images and chunk videos
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Frames per chunk video
    #[arg(long, default_value_t = 1000)]
    chunk_size: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let mut config = Config::default();
    config.chunking.chunk_size = cli.chunk_size;
    config.validate()?;

    let engine = FfmpegEngine::new(config.media.clone());
    require_tools(&engine)?;

    let rebuilder = Rebuilder::new(config, engine, &cli.dir);
    let info = rebuilder.probe(&cli.video).await?;
    let chunks = rebuilder.plan_chunks(&info)?;
    let resume = rebuilder.resume_state(&chunks);

    println!(
        "{} fps x {}s = {} frames (audio: {})",
        info.frame_rate,
        info.duration_secs,
        info.total_frames().unwrap_or_default(),
        if info.has_audio { "yes" } else { "no" }
    );
    println!("{} chunks of up to {} frames\n", chunks.len(), cli.chunk_size);

    for (i, chunk) in chunks.iter().enumerate() {
        let status = if resume.completed.contains(&i) {
            "done"
        } else if resume.gaps.contains(&i) {
            "missing (will not be re-rendered)"
        } else {
            "pending"
        };
        println!("   {:>4}  {:<28} {}", i + 1, chunk.file_name(), status);
    }

    if resume.is_complete(chunks.len()) {
        println!("\nAll chunks rendered; a run will only concatenate and mux.");
    } else {
        println!("\nA run would resume at chunk {}.", resume.resume_index + 1);
    }

    Ok(())
}

/// Fail with install hints when ffmpeg or ffprobe cannot be run
fn require_tools(engine: &FfmpegEngine) -> Result<()> {
    if !engine.check_available() {
        println!("❌ ffmpeg/ffprobe not available. Install with:");
        println!("   macOS: brew install ffmpeg");
        println!("   Ubuntu: sudo apt install ffmpeg");
        bail!("ffmpeg/ffprobe not available");
    }
    Ok(())
}
