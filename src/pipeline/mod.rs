//! # Reconstruction Pipeline
//!
//! Probe, partition, resume, render, concatenate, mux and clean up. The
//! pipeline talks to the media engine only through [`MediaEngine`](crate::media::MediaEngine);
//! chunk videos on disk are its only checkpoint between runs.

pub mod chunk;
pub mod cleanup;
pub mod engine;
pub mod manifest;
pub mod progress;
pub mod resume;

// Re-exports for convenience
pub use chunk::{partition, ChunkRange};
pub use engine::{RebuildReport, Rebuilder};
pub use resume::ResumeState;
