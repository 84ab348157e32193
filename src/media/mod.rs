//! External media-tool plumbing: ffmpeg/ffprobe discovery, duration
//! probing, silence synthesis, tempo re-rendering and the final stream-copy
//! concatenation.

pub mod concat;
pub mod ffmpeg;
pub mod probe;
pub mod silence;
pub mod tempo;

pub use concat::{assemble, build_plan, PlanEntry};
pub use ffmpeg::MediaTools;
