use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Elapsed-time based estimate of the remaining render time
#[derive(Debug, Clone)]
pub struct RenderProgress {
    started: Instant,
    total_chunks: usize,
    rendered: usize,
}

impl RenderProgress {
    pub fn start(total_chunks: usize) -> Self {
        Self {
            started: Instant::now(),
            total_chunks,
            rendered: 0,
        }
    }

    /// Record a finished chunk; returns the estimated time left
    pub fn chunk_done(&mut self, chunk_index: usize) -> Duration {
        self.rendered += 1;
        let remaining = self.total_chunks.saturating_sub(chunk_index + 1);
        estimate_remaining(self.started.elapsed(), self.rendered, remaining)
    }

    pub fn rendered(&self) -> usize {
        self.rendered
    }
}

/// Average time per chunk rendered so far, times the chunks still to go
pub fn estimate_remaining(elapsed: Duration, rendered: usize, remaining: usize) -> Duration {
    if rendered == 0 {
        return Duration::ZERO;
    }
    elapsed.div_f64(rendered as f64).mul_f64(remaining as f64)
}

/// Minutes with two decimals, e.g. `3.25`
pub fn format_minutes(remaining: Duration) -> String {
    format!("{:.2}", remaining.as_secs_f64() / 60.0)
}

/// Wall-clock time at which the remaining work should finish
pub fn projected_finish(remaining: Duration) -> DateTime<Local> {
    let remaining =
        chrono::Duration::from_std(remaining).unwrap_or_else(|_| chrono::Duration::zero());
    Local::now() + remaining
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_scales_with_average() {
        let eta = estimate_remaining(Duration::from_secs(60), 2, 4);
        assert_eq!(eta, Duration::from_secs(120));
    }

    #[test]
    fn test_estimate_without_rendered_chunks() {
        assert_eq!(estimate_remaining(Duration::from_secs(5), 0, 3), Duration::ZERO);
    }

    #[test]
    fn test_last_chunk_has_no_remaining_time() {
        let mut progress = RenderProgress::start(3);
        assert_eq!(progress.chunk_done(2), Duration::ZERO);
        assert_eq!(progress.rendered(), 1);
    }

    #[test]
    fn test_minutes_format() {
        assert_eq!(format_minutes(Duration::from_secs(90)), "1.50");
        assert_eq!(format_minutes(Duration::ZERO), "0.00");
    }

    #[test]
    fn test_projected_finish_is_in_the_future() {
        let before = Local::now();
        assert!(projected_finish(Duration::from_secs(600)) > before);
    }
}
