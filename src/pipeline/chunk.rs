use std::fmt;

use crate::error::{PipelineError, Result};

/// Inclusive, 1-based range of frames rendered into one chunk video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of frames covered by this chunk
    pub fn len(&self) -> u64 {
        self.end + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Deterministic chunk video name; doubles as the resume checkpoint
    pub fn file_name(&self) -> String {
        format!("chunk_{}_{}.mp4", self.start, self.end)
    }

    /// Name the encoder writes to before the chunk is renamed into place
    pub fn partial_file_name(&self) -> String {
        format!("chunk_{}_{}.part.mp4", self.start, self.end)
    }

    /// Frames of this chunk that have a replacement image, given `available` images
    pub fn frames_available(&self, available: u64) -> std::ops::RangeInclusive<u64> {
        self.start..=self.end.min(available)
    }
}

impl fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Split `frame_rate * duration_secs` frames into contiguous chunks of `chunk_size`
///
/// The last chunk is shorter when the total is not a multiple of the chunk size.
/// A video with no frames yields an empty plan. A frame count that does not
/// fit in a `u64` is rejected.
pub fn partition(frame_rate: u64, duration_secs: u64, chunk_size: u64) -> Result<Vec<ChunkRange>> {
    if chunk_size == 0 {
        return Err(PipelineError::InvalidChunkSize.into());
    }

    let total = frame_rate
        .checked_mul(duration_secs)
        .ok_or(PipelineError::TooManyFrames {
            frame_rate,
            duration_secs,
        })?;
    let full = total / chunk_size;

    let mut chunks: Vec<ChunkRange> = (0..full)
        .map(|i| ChunkRange::new(i * chunk_size + 1, (i + 1) * chunk_size))
        .collect();

    if total % chunk_size != 0 {
        chunks.push(ChunkRange::new(full * chunk_size + 1, total));
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(chunks: &[ChunkRange], total: u64, chunk_size: u64) {
        assert_eq!(chunks.first().map(|c| c.start), Some(1));
        assert_eq!(chunks.last().map(|c| c.end), Some(total));

        for pair in chunks.windows(2) {
            assert_eq!(pair[1].start, pair[0].end + 1, "gap between {} and {}", pair[0], pair[1]);
        }
        for chunk in chunks {
            assert!(chunk.len() <= chunk_size);
            assert!(!chunk.is_empty());
        }
        assert_eq!(chunks.iter().map(ChunkRange::len).sum::<u64>(), total);
    }

    #[test]
    fn test_even_split() {
        let chunks = partition(30, 100, 1000).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], ChunkRange::new(1, 1000));
        assert_eq!(chunks[2], ChunkRange::new(2001, 3000));
        assert_covers(&chunks, 3000, 1000);
    }

    #[test]
    fn test_short_final_chunk() {
        let chunks = partition(24, 50, 1000).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], ChunkRange::new(1001, 1200));
        assert_eq!(chunks[1].len(), 200);
        assert_covers(&chunks, 1200, 1000);
    }

    #[test]
    fn test_total_below_chunk_size() {
        let chunks = partition(30, 10, 1000).unwrap();
        assert_eq!(chunks, vec![ChunkRange::new(1, 300)]);
    }

    #[test]
    fn test_property_over_many_shapes() {
        for frame_rate in [1, 23, 25, 29, 30, 60] {
            for duration in [1, 7, 33, 120] {
                for chunk_size in [1, 7, 100, 1000, 5000] {
                    let chunks = partition(frame_rate, duration, chunk_size).unwrap();
                    assert_covers(&chunks, frame_rate * duration, chunk_size);
                }
            }
        }
    }

    #[test]
    fn test_zero_frames_and_zero_chunk_size() {
        assert!(partition(30, 0, 1000).unwrap().is_empty());
        assert!(partition(30, 10, 0).is_err());
    }

    #[test]
    fn test_overflowing_frame_count_is_error() {
        let result = partition(u64::MAX, 2, 1000);
        assert!(matches!(
            result,
            Err(crate::error::RebuildError::Pipeline(PipelineError::TooManyFrames {
                frame_rate: u64::MAX,
                duration_secs: 2,
            }))
        ));

        let duration = crate::media::probe::parse_duration("1e18").unwrap();
        assert!(partition(30, duration, 1000).is_err());
    }

    #[test]
    fn test_file_name_is_deterministic() {
        let first = partition(30, 100, 1000).unwrap();
        let second = partition(30, 100, 1000).unwrap();
        let names: Vec<String> = first.iter().map(ChunkRange::file_name).collect();

        assert_eq!(names, second.iter().map(ChunkRange::file_name).collect::<Vec<_>>());
        assert_eq!(names[1], "chunk_1001_2000.mp4");
        assert_eq!(first[1].partial_file_name(), "chunk_1001_2000.part.mp4");
    }

    #[test]
    fn test_frames_available_caps_at_image_count() {
        let chunk = ChunkRange::new(1001, 2000);
        assert_eq!(chunk.frames_available(5000), 1001..=2000);
        assert_eq!(chunk.frames_available(1500), 1001..=1500);
        assert!(chunk.frames_available(900).is_empty());
    }
}
