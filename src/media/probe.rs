use crate::error::{ProbeError, Result};

/// Stream information of the source video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    /// Whole frames per second, rounded down
    pub frame_rate: u64,

    /// Container duration in whole seconds, rounded down
    pub duration_secs: u64,

    /// Whether the source carries at least one audio stream
    pub has_audio: bool,
}

impl VideoInfo {
    /// Number of frames that can be replaced, `None` if the product overflows
    pub fn total_frames(&self) -> Option<u64> {
        self.frame_rate.checked_mul(self.duration_secs)
    }

    /// Display duration of a single frame in seconds
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.frame_rate as f64
    }
}

fn first_line(raw: &str) -> Option<&str> {
    raw.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Parse an `r_frame_rate` value such as `30000/1001` into whole frames per second
pub fn parse_frame_rate(raw: &str) -> Result<u64> {
    let line = first_line(raw).ok_or_else(|| ProbeError::InvalidFrameRate {
        raw: raw.to_string(),
    })?;
    let invalid = || ProbeError::InvalidFrameRate { raw: line.to_string() };

    let (num, den) = match line.split_once('/') {
        Some((num, den)) => (num.trim(), den.trim()),
        None => (line, "1"),
    };
    let num: u64 = num.parse().map_err(|_| invalid())?;
    let den: u64 = den.parse().map_err(|_| invalid())?;

    if den == 0 {
        return Err(ProbeError::ZeroDenominator {
            raw: line.to_string(),
        }
        .into());
    }

    Ok(num / den)
}

/// Parse a container duration in seconds, truncating the fractional part
pub fn parse_duration(raw: &str) -> Result<u64> {
    let line = first_line(raw).ok_or_else(|| ProbeError::InvalidDuration {
        raw: raw.to_string(),
    })?;
    let secs: f64 = line
        .parse()
        .map_err(|_| ProbeError::InvalidDuration { raw: line.to_string() })?;

    // u64::MAX rounds up to 2^64 as f64, so anything at or above it cannot be cast
    if !secs.is_finite() || secs < 0.0 || secs >= u64::MAX as f64 {
        return Err(ProbeError::InvalidDuration {
            raw: line.to_string(),
        }
        .into());
    }

    Ok(secs.floor() as u64)
}

/// True when an audio stream listing contains at least one entry
pub fn parse_has_audio(raw: &str) -> bool {
    raw.lines().any(|line| line.trim() == "audio")
}
