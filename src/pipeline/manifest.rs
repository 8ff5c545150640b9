use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::frames::FrameSet;
use crate::pipeline::chunk::ChunkRange;

/// Quote a path for the concat demuxer: `'` closes, escapes, and reopens the quote
fn quote(name: &str) -> String {
    format!("'{}'", name.replace('\'', r"'\''"))
}

/// Write the image list for one chunk
///
/// Every frame gets a `file` line and a `duration` line of `frame_duration`
/// seconds. Frames past the number of available images are left out.
/// Returns how many frames were written.
pub fn write_frame_manifest(
    path: &Path,
    chunk: &ChunkRange,
    frames: &FrameSet,
    frame_duration: f64,
) -> Result<u64> {
    let mut file = BufWriter::new(File::create(path)?);
    let mut written = 0;

    for frame in chunk.frames_available(frames.count()) {
        writeln!(file, "file {}", quote(&frames.file_name(frame)))?;
        writeln!(file, "duration {}", frame_duration)?;
        written += 1;
    }

    file.flush()?;
    Ok(written)
}

/// Write the ordered list of chunk videos to concatenate
pub fn write_chunk_manifest<S: AsRef<str>>(path: &Path, chunk_files: &[S]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    for name in chunk_files {
        writeln!(file, "file {}", quote(name.as_ref()))?;
    }

    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FramesConfig;
    use tempfile::tempdir;

    fn frame_set(dir: &Path, count: u64) -> FrameSet {
        for i in 1..=count {
            std::fs::write(dir.join(format!("{:04}.jpg", i)), b"").unwrap();
        }
        FrameSet::scan(dir, &FramesConfig::default()).unwrap()
    }

    #[test]
    fn test_frame_entries_and_durations() {
        let dir = tempdir().unwrap();
        let frames = frame_set(dir.path(), 12);
        let manifest = dir.path().join("frames.txt");

        let written =
            write_frame_manifest(&manifest, &ChunkRange::new(1, 10), &frames, 1.0 / 30.0).unwrap();
        assert_eq!(written, 10);

        let content = std::fs::read_to_string(&manifest).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 20);
        assert_eq!(lines[0], "file '0001.jpg'");
        assert_eq!(lines[18], "file '0010.jpg'");

        for line in lines.iter().skip(1).step_by(2) {
            let value: f64 = line.strip_prefix("duration ").unwrap().parse().unwrap();
            assert_eq!(value, 1.0 / 30.0);
        }
    }

    #[test]
    fn test_frames_capped_at_available_images() {
        let dir = tempdir().unwrap();
        let frames = frame_set(dir.path(), 15);
        let manifest = dir.path().join("frames.txt");

        let written =
            write_frame_manifest(&manifest, &ChunkRange::new(11, 20), &frames, 0.04).unwrap();
        assert_eq!(written, 5);

        let content = std::fs::read_to_string(&manifest).unwrap();
        let files: Vec<&str> = content.lines().filter(|l| l.starts_with("file ")).collect();
        assert_eq!(files.first(), Some(&"file '0011.jpg'"));
        assert_eq!(files.last(), Some(&"file '0015.jpg'"));
    }

    #[test]
    fn test_chunk_beyond_images_writes_nothing() {
        let dir = tempdir().unwrap();
        let frames = frame_set(dir.path(), 3);
        let manifest = dir.path().join("frames.txt");

        let written =
            write_frame_manifest(&manifest, &ChunkRange::new(11, 20), &frames, 0.04).unwrap();
        assert_eq!(written, 0);
        assert_eq!(std::fs::read_to_string(&manifest).unwrap(), "");
    }

    #[test]
    fn test_chunk_manifest_order_and_quoting() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("videos.txt");

        let names = ["chunk_1_1000.mp4", "chunk_1001_1200.mp4", "it's.mp4"];
        write_chunk_manifest(&manifest, &names).unwrap();

        let content = std::fs::read_to_string(&manifest).unwrap();
        assert_eq!(
            content,
            "file 'chunk_1_1000.mp4'\nfile 'chunk_1001_1200.mp4'\nfile 'it'\\''s.mp4'\n"
        );
    }
}
