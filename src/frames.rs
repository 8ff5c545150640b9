//! # Replacement Frames
//!
//! Edited frames sit in the working directory as zero-padded, 1-based
//! numbered images (`0001.jpg`, `0002.jpg`, ...). Only their count is
//! inspected; image contents are handed to the media engine untouched.

use std::path::Path;

use tracing::debug;

use crate::config::FramesConfig;
use crate::error::{PipelineError, Result};

/// The set of replacement images available in a directory
#[derive(Debug, Clone)]
pub struct FrameSet {
    extension: String,
    digits: usize,
    count: u64,
}

impl FrameSet {
    /// Count the images with the configured extension in `dir`
    ///
    /// Hidden files (such as macOS `._0001.jpg` resource forks) are not frames.
    pub fn scan<P: AsRef<Path>>(dir: P, config: &FramesConfig) -> Result<Self> {
        let dir = dir.as_ref();
        let mut count = 0u64;

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(true, |name| name.starts_with('.'));
            let matches = !hidden
                && path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(config.extension.as_str());
            if matches {
                count += 1;
            }
        }

        debug!("Found {} *.{} images in {:?}", count, config.extension, dir);

        if count == 0 {
            return Err(PipelineError::NoImages {
                dir: dir.display().to_string(),
                extension: config.extension.clone(),
            }
            .into());
        }

        Ok(Self {
            extension: config.extension.clone(),
            digits: config.digits,
            count,
        })
    }

    /// Number of replacement images, i.e. the highest frame that can be replaced
    pub fn count(&self) -> u64 {
        self.count
    }

    /// File name of the image for a 1-based frame number
    pub fn file_name(&self, frame: u64) -> String {
        format!("{:0width$}.{}", frame, self.extension, width = self.digits)
    }
}
