//! Tempo re-rendering.

use std::path::Path;

use crate::error::{Result, StudioError};
use crate::media::MediaTools;

/// Re-render a clip at a different tempo without changing pitch.
///
/// Uses ffmpeg's atempo filter, which only accepts factors in 0.5..=2.0.
/// Typical use is slowing clips slightly (e.g. 0.9) for listening practice.
pub fn adjust_tempo(
    tools: &MediaTools,
    input: &Path,
    output: &Path,
    factor: f64,
) -> Result<()> {
    if !(0.5..=2.0).contains(&factor) {
        return Err(StudioError::AudioProcessing(format!(
            "atempo factor {} is outside the supported 0.5..=2.0 range",
            factor
        )));
    }

    let filter = format!("atempo={}", factor);
    let input_str = input.to_string_lossy();
    let output_str = output.to_string_lossy();
    tools.run_ffmpeg(&[
        "-y",
        "-i",
        &input_str,
        "-filter:a",
        &filter,
        "-vn",
        &output_str,
    ])
}
