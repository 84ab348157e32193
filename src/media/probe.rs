//! Clip duration probing.

use std::path::Path;

use log::warn;

use crate::media::MediaTools;

/// Measure a clip's duration in seconds via ffprobe.
///
/// Probing is best-effort: any failure (spawn, exit status, unparseable
/// output) logs a warning and yields `0.0`, which downstream pause logic
/// treats as "unknown". This is the only recoverable failure in the
/// pipeline.
pub fn duration_seconds(tools: &MediaTools, path: &Path) -> f64 {
    let path_str = path.to_string_lossy();
    let result = tools.run_ffprobe(&[
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "default=noprint_wrappers=1:nokey=1",
        &path_str,
    ]);

    match result {
        Ok(stdout) => match stdout.trim().parse::<f64>() {
            Ok(duration) => duration,
            Err(_) => {
                warn!(
                    "ffprobe returned unparseable duration for {}: {:?}",
                    path.display(),
                    stdout.trim()
                );
                0.0
            }
        },
        Err(e) => {
            warn!("duration probe failed for {}: {}", path.display(), e);
            0.0
        }
    }
}
