//! Silence clip synthesis.

use std::path::Path;

use crate::error::Result;
use crate::media::MediaTools;

/// Synthesize a zero-amplitude MP3 of the requested duration.
///
/// The clip is encoded with the same codec family and sample layout as the
/// speech clips (44.1 kHz mono libmp3lame) so the stream-copy concatenation
/// downstream stays valid. Failure is fatal to the run; there is no
/// substitute for missing silence.
pub fn make_silence(tools: &MediaTools, duration_seconds: f64, output: &Path) -> Result<()> {
    let source = format!("aevalsrc=0:d={:.3}", duration_seconds);
    let output_str = output.to_string_lossy();
    tools.run_ffmpeg(&[
        "-y",
        "-f",
        "lavfi",
        "-i",
        &source,
        "-ar",
        "44100",
        "-ac",
        "1",
        "-c:a",
        "libmp3lame",
        "-q:a",
        "2",
        &output_str,
    ])
}
