//! Pause policy: silence duration inserted after a clip.

use crate::tasks::MixLogic;

/// Floor for the listen-and-repeat response gap, seconds.
const LISTEN_REPEAT_FLOOR: f64 = 2.0;

/// Silence to insert after a clip under the given pause rule.
///
/// `preceding_clip_duration` is only consulted by [`MixLogic::ListenRepeat`];
/// a failed duration probe is passed as `None` and degrades to the 2s floor.
/// The assembler never inserts a pause after the final clip.
pub fn pause_after(logic: MixLogic, preceding_clip_duration: Option<f64>) -> f64 {
    match logic {
        MixLogic::Standard => 0.5,
        MixLogic::Fast => 0.1,
        MixLogic::ListenRepeat => {
            let duration = preceding_clip_duration.unwrap_or(0.0);
            (duration * 1.5).max(LISTEN_REPEAT_FLOOR)
        }
        MixLogic::Interview => 5.0,
    }
}
