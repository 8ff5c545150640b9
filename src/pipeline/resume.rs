use std::path::Path;

use tracing::{debug, warn};

use crate::pipeline::chunk::ChunkRange;

/// Which chunks a run can skip, derived from chunk videos already on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeState {
    /// First chunk index that will be rendered
    pub resume_index: usize,

    /// Chunk indices before `resume_index` whose video exists, in order
    pub completed: Vec<usize>,

    /// Chunk indices before `resume_index` whose video is missing
    pub gaps: Vec<usize>,
}

impl ResumeState {
    /// Scan `dir` for the chunk videos of `chunks`
    ///
    /// Rendering resumes right after the last chunk found on disk. Missing
    /// chunks before that point are reported as gaps and are not re-rendered.
    pub fn scan(dir: &Path, chunks: &[ChunkRange]) -> Self {
        let existing: Vec<usize> = chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| dir.join(chunk.file_name()).is_file())
            .map(|(i, _)| i)
            .collect();

        let resume_index = existing.last().map_or(0, |&last| last + 1);
        let gaps: Vec<usize> = (0..resume_index)
            .filter(|i| !existing.contains(i))
            .collect();

        for &gap in &gaps {
            warn!(
                "Chunk {} ({}) is missing but a later chunk exists; it will not be re-rendered",
                gap + 1,
                chunks[gap].file_name()
            );
        }

        debug!(
            "Resume scan: {} chunks on disk, resuming at chunk {}",
            existing.len(),
            resume_index + 1
        );

        Self {
            resume_index,
            completed: existing,
            gaps,
        }
    }

    /// Number of chunks this run will skip
    pub fn skipped(&self) -> usize {
        self.completed.len()
    }

    /// True when no chunk needs rendering
    pub fn is_complete(&self, total_chunks: usize) -> bool {
        self.resume_index >= total_chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::chunk::partition;
    use tempfile::tempdir;

    fn write_chunks(dir: &Path, chunks: &[ChunkRange], indices: &[usize]) {
        for &i in indices {
            std::fs::write(dir.join(chunks[i].file_name()), b"chunk").unwrap();
        }
    }

    #[test]
    fn test_fresh_directory() {
        let dir = tempdir().unwrap();
        let chunks = partition(30, 100, 1000).unwrap();

        let state = ResumeState::scan(dir.path(), &chunks);
        assert_eq!(state.resume_index, 0);
        assert!(state.completed.is_empty());
        assert!(state.gaps.is_empty());
        assert!(!state.is_complete(chunks.len()));
    }

    #[test]
    fn test_contiguous_prefix_is_skipped() {
        let dir = tempdir().unwrap();
        let chunks = partition(30, 200, 1000).unwrap();
        write_chunks(dir.path(), &chunks, &[0, 1, 2]);

        let state = ResumeState::scan(dir.path(), &chunks);
        assert_eq!(state.resume_index, 3);
        assert_eq!(state.completed, vec![0, 1, 2]);
        assert_eq!(state.skipped(), 3);
        assert!(state.gaps.is_empty());
    }

    #[test]
    fn test_all_chunks_present() {
        let dir = tempdir().unwrap();
        let chunks = partition(30, 100, 1000).unwrap();
        write_chunks(dir.path(), &chunks, &[0, 1, 2]);

        let state = ResumeState::scan(dir.path(), &chunks);
        assert!(state.is_complete(chunks.len()));
    }

    #[test]
    fn test_gap_before_last_existing_chunk() {
        let dir = tempdir().unwrap();
        let chunks = partition(30, 200, 1000).unwrap();
        write_chunks(dir.path(), &chunks, &[0, 2]);

        let state = ResumeState::scan(dir.path(), &chunks);
        assert_eq!(state.resume_index, 3);
        assert_eq!(state.completed, vec![0, 2]);
        assert_eq!(state.gaps, vec![1]);
    }

    #[test]
    fn test_files_from_other_plans_are_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("chunk_1_500.mp4"), b"old").unwrap();
        let chunks = partition(30, 100, 1000).unwrap();

        let state = ResumeState::scan(dir.path(), &chunks);
        assert_eq!(state.resume_index, 0);
    }
}
