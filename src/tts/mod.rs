//! Speech synthesis capability.
//!
//! The pipeline consumes synthesis through the [`SpeechSynthesizer`] trait so
//! the provider can be swapped (or mocked in tests) without touching the
//! assembly logic.

pub mod elevenlabs;

pub use elevenlabs::ElevenLabsClient;

use async_trait::async_trait;

use crate::error::Result;

/// One synthesis request: a line of text bound to a voice and its settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    /// Provider voice identity.
    pub voice_id: String,
    pub stability: f32,
    pub similarity: f32,
}

/// Backend that turns text into audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize one request to encoded audio (MP3). An empty result is an
    /// error; callers rely on every row producing playable audio.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>>;
}
